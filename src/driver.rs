//! Fixed-cadence host loop.
//!
//! The core never sleeps; a [`Driver`] owns the cadence, asks a [`Clock`] to wait
//! for each deadline and hands every frame to a [`FrameSink`].

use crate::core::{Body, ParticleField, DIM};
use crate::error::{Error, Result};
use std::time::{Duration, Instant};

/// Time source for the driver. `now` is measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&mut self) -> Duration;
    /// Block until `now() >= deadline`. Returns immediately for past deadlines.
    fn sleep_until(&mut self, deadline: Duration);
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&mut self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Clock that only moves when slept on, for headless runs and tests.
///
/// `cost` is added on every `now()` call to stand in for time spent working.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Duration,
    cost: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost(cost: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            cost,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.now
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now += self.cost;
        self.now
    }

    fn sleep_until(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}

/// Receives each frame after its tick.
pub trait FrameSink {
    fn frame(&mut self, tick: u64, bodies: &[Body]) -> Result<()>;
}

/// Records every frame.
impl FrameSink for Vec<Vec<Body>> {
    fn frame(&mut self, _tick: u64, bodies: &[Body]) -> Result<()> {
        self.push(bodies.to_vec());
        Ok(())
    }
}

/// Discards frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn frame(&mut self, _tick: u64, _bodies: &[Body]) -> Result<()> {
        Ok(())
    }
}

/// Totals for one [`Driver::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub contacts: usize,
    pub bounces: [usize; DIM],
    /// Ticks that finished after their deadline.
    pub overruns: u64,
    pub elapsed: Duration,
}

/// Steps a [`ParticleField`] at a fixed cadence.
#[derive(Debug)]
pub struct Driver {
    field: ParticleField,
    cadence: Duration,
}

impl Driver {
    pub fn new(field: ParticleField, cadence: Duration) -> Result<Self> {
        if cadence.is_zero() {
            return Err(Error::InvalidParam("cadence must be > 0".into()));
        }
        Ok(Self { field, cadence })
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn into_field(self) -> ParticleField {
        self.field
    }

    /// Run `ticks` steps, one per cadence interval.
    ///
    /// Deadlines are `start + k * cadence`, so sleeping never accumulates drift. A
    /// tick that finishes late is not made up for: the schedule restarts from the
    /// current time. Stops at the first sink error.
    pub fn run<C, S>(&mut self, ticks: u64, clock: &mut C, sink: &mut S) -> Result<RunSummary>
    where
        C: Clock + ?Sized,
        S: FrameSink + ?Sized,
    {
        let start = clock.now();
        let mut deadline = start;
        let mut summary = RunSummary::default();
        log::info!(
            "driver: {} ticks of {} bodies every {:?}",
            ticks,
            self.field.len(),
            self.cadence
        );

        for _ in 0..ticks {
            deadline += self.cadence;
            let step = self.field.tick();
            summary.ticks += 1;
            summary.contacts += step.contacts.len();
            for (total, n) in summary.bounces.iter_mut().zip(step.bounces) {
                *total += n;
            }
            sink.frame(self.field.ticks(), self.field.bodies())?;

            let now = clock.now();
            if now > deadline {
                log::debug!(
                    "tick {} overran its deadline by {:?}",
                    self.field.ticks(),
                    now - deadline
                );
                summary.overruns += 1;
                deadline = now;
            } else {
                clock.sleep_until(deadline);
            }
        }

        summary.elapsed = clock.now().saturating_sub(start);
        log::info!(
            "driver: done after {:?}, {} contacts, {} overruns",
            summary.elapsed,
            summary.contacts,
            summary.overruns
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bounds;

    fn field() -> Result<ParticleField> {
        ParticleField::new(8, Bounds::new(400.0, 300.0)?, Some(99))
    }

    #[test]
    fn zero_cadence_rejected() -> Result<()> {
        assert!(Driver::new(field()?, Duration::ZERO).is_err());
        Ok(())
    }

    #[test]
    fn runs_on_fixed_deadlines() -> Result<()> {
        let mut driver = Driver::new(field()?, Duration::from_millis(30))?;
        let mut clock = ManualClock::new();
        let mut frames: Vec<Vec<Body>> = Vec::new();
        let summary = driver.run(10, &mut clock, &mut frames)?;

        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.overruns, 0);
        assert_eq!(frames.len(), 10);
        assert_eq!(clock.elapsed(), Duration::from_millis(300));
        assert_eq!(driver.field().ticks(), 10);
        assert_eq!(frames.last().map(Vec::as_slice), Some(driver.field().bodies()));
        Ok(())
    }

    #[test]
    fn overruns_do_not_trigger_catch_up() -> Result<()> {
        let mut driver = Driver::new(field()?, Duration::from_millis(10))?;
        // every clock read costs 25ms, so every tick is late
        let mut clock = ManualClock::with_cost(Duration::from_millis(25));
        let summary = driver.run(4, &mut clock, &mut NullSink)?;
        assert_eq!(summary.ticks, 4);
        assert_eq!(summary.overruns, 4);
        assert_eq!(driver.field().ticks(), 4);
        Ok(())
    }

    #[test]
    fn frames_match_pure_steps() -> Result<()> {
        let start = field()?;
        let mut expected = start.bodies().to_vec();
        let bounds = start.bounds();
        let mut driver = Driver::new(start, Duration::from_millis(30))?;
        let mut frames: Vec<Vec<Body>> = Vec::new();
        driver.run(5, &mut ManualClock::new(), &mut frames)?;
        for frame in &frames {
            expected = crate::core::step(&expected, bounds);
            assert_eq!(frame, &expected);
        }
        Ok(())
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn frame(&mut self, tick: u64, _bodies: &[Body]) -> Result<()> {
            if tick == 3 {
                return Err(Error::Io(std::io::Error::other("sink closed")));
            }
            Ok(())
        }
    }

    #[test]
    fn sink_errors_stop_the_run() -> Result<()> {
        let mut driver = Driver::new(field()?, Duration::from_millis(30))?;
        let err = driver
            .run(10, &mut ManualClock::new(), &mut FailingSink)
            .unwrap_err();
        assert!(err.to_string().contains("sink closed"));
        assert_eq!(driver.field().ticks(), 3);
        Ok(())
    }
}
