use crate::config::FieldConfig;
use crate::core::body::{Body, Bounds, DIM};
use crate::core::collision::{self, Contact};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::ops::Range;

/// Diameter range used for freshly spawned bodies.
pub const SIZE_RANGE: Range<f64> = 30.0..50.0;

/// Bound on each initial velocity component: components are drawn from `[-SPEED, SPEED)`.
pub const SPEED: f64 = 2.0;

/// Body count of the stock background animation.
pub const DEFAULT_COUNT: usize = 20;

/// Sampling ranges for [`create_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spawn {
    /// Diameters are drawn uniformly from this half-open range.
    pub size: Range<f64>,
    /// Velocity components are drawn uniformly from `[-speed, speed)`; zero spawns at rest.
    pub speed: f64,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            size: SIZE_RANGE,
            speed: SPEED,
        }
    }
}

impl Spawn {
    pub fn validate(&self) -> Result<()> {
        let Range { start, end } = self.size;
        if !start.is_finite() || !end.is_finite() || start <= 0.0 {
            return Err(Error::InvalidParam(
                "size range must be finite with a minimum > 0".into(),
            ));
        }
        if start >= end {
            return Err(Error::InvalidParam("size range must be non-empty".into()));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        Ok(())
    }
}

/// Spawn `n` bodies with the stock ranges: size in `[30, 50)`, velocity components in `[-2, 2)`.
///
/// Positions are uniform over `[0, width) x [0, height)` and may overhang the
/// right/bottom edge by up to one diameter until the first [`step`].
///
/// Errors: `Error::InvalidParam` if `n == 0` or `bounds` is degenerate.
pub fn create<R: Rng + ?Sized>(n: usize, bounds: Bounds, rng: &mut R) -> Result<Vec<Body>> {
    create_with(n, bounds, &Spawn::default(), rng)
}

/// Like [`create`], with explicit sampling ranges.
pub fn create_with<R: Rng + ?Sized>(
    n: usize,
    bounds: Bounds,
    spawn: &Spawn,
    rng: &mut R,
) -> Result<Vec<Body>> {
    if n == 0 {
        return Err(Error::InvalidParam("count must be > 0".into()));
    }
    bounds.validate()?;
    spawn.validate()?;

    let mut bodies = Vec::with_capacity(n);
    for _ in 0..n {
        let position = [
            rng.random_range(0.0..bounds.width),
            rng.random_range(0.0..bounds.height),
        ];
        let size = rng.random_range(spawn.size.clone());
        let mut velocity = [0.0_f64; DIM];
        if spawn.speed > 0.0 {
            velocity
                .iter_mut()
                .for_each(|v| *v = rng.random_range(-spawn.speed..spawn.speed));
        }
        bodies.push(Body::new(position, size, velocity)?);
    }
    Ok(bodies)
}

/// Outcome of one tick, with diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Updated bodies, same length and order as the input.
    pub bodies: Vec<Body>,
    /// Pairs resolved this tick, in resolution order.
    pub contacts: Vec<Contact>,
    /// Edge reflections this tick, per axis.
    pub bounces: [usize; DIM],
}

/// Advance every body by one tick.
///
/// Pure: the input is not modified and identical inputs give identical outputs.
pub fn step(bodies: &[Body], bounds: Bounds) -> Vec<Body> {
    step_report(bodies, bounds).bodies
}

/// [`step`], also reporting which pairs collided and how many edge reflections occurred.
///
/// Order of work within the tick:
/// 1. move each body by its velocity, reflecting and clamping at the edges;
/// 2. scan pairs `(i, j)`, `i < j`, over the moved positions and exchange
///    velocities of overlapping pairs, in order, on a tick-local buffer.
///
/// Positions are never corrected on collision.
pub fn step_report(bodies: &[Body], bounds: Bounds) -> Step {
    let mut bounces = [0usize; DIM];
    let mut next: Vec<Body> = bodies
        .iter()
        .map(|b| integrate(b, &bounds, &mut bounces))
        .collect();
    let contacts = collision::resolve_all(&mut next);
    log::debug!(
        "step: {} bodies, {} contacts, bounces x={} y={}",
        next.len(),
        contacts.len(),
        bounces[0],
        bounces[1]
    );
    Step {
        bodies: next,
        contacts,
        bounces,
    }
}

/// Move one body and reflect it at the viewport edges.
///
/// The out-of-range test uses the pre-flip velocity; the stored velocity is the
/// flipped one, so the next tick carries the body back inside.
fn integrate(body: &Body, bounds: &Bounds, bounces: &mut [usize; DIM]) -> Body {
    let mut out = *body;
    for k in 0..DIM {
        let hi = bounds.extent(k) - body.size;
        let mut x = body.position[k] + body.velocity[k];
        if x < 0.0 || x > hi {
            out.velocity[k] = -body.velocity[k];
            // not f64::clamp: hi < 0 when the body is wider than the viewport
            x = x.min(hi).max(0.0);
            bounces[k] += 1;
        }
        out.position[k] = x;
    }
    out
}

/// A running particle field: the body list, the viewport and a tick counter.
///
/// Thin stateful shell over [`step`] for hosts that would rather hold an object
/// than thread the body list through their own loop.
#[derive(Debug, Clone)]
pub struct ParticleField {
    bodies: Vec<Body>,
    bounds: Bounds,
    ticks: u64,
}

impl ParticleField {
    /// Spawn `count` bodies with the stock ranges inside `bounds`.
    ///
    /// `seed` makes the initial field reproducible; `None` draws a seed from the thread RNG.
    pub fn new(count: usize, bounds: Bounds, seed: Option<u64>) -> Result<Self> {
        Self::with_spawn(count, bounds, &Spawn::default(), seed)
    }

    /// Spawn a field with explicit sampling ranges.
    pub fn with_spawn(
        count: usize,
        bounds: Bounds,
        spawn: &Spawn,
        seed: Option<u64>,
    ) -> Result<Self> {
        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };
        let bodies = create_with(count, bounds, spawn, &mut rng)?;
        log::info!(
            "spawned {} bodies in {}x{} (seed {:?})",
            count,
            bounds.width,
            bounds.height,
            seed
        );
        warn_oversized(&bodies, &bounds);
        Ok(Self {
            bodies,
            bounds,
            ticks: 0,
        })
    }

    /// Build a field from a [`FieldConfig`].
    pub fn from_config(cfg: &FieldConfig) -> Result<Self> {
        cfg.validate()?;
        Self::with_spawn(cfg.count, cfg.bounds()?, &cfg.spawn(), cfg.seed)
    }

    /// Adopt an existing body list (restored or hand-built).
    pub fn from_bodies(bodies: Vec<Body>, bounds: Bounds) -> Result<Self> {
        if bodies.is_empty() {
            return Err(Error::InvalidParam("body list must not be empty".into()));
        }
        bounds.validate()?;
        for (i, b) in bodies.iter().enumerate() {
            b.validate()
                .map_err(|e| Error::InvalidParam(format!("body {i}: {e}")))?;
        }
        warn_oversized(&bodies, &bounds);
        Ok(Self {
            bodies,
            bounds,
            ticks: 0,
        })
    }

    /// Advance one tick with the current bounds.
    pub fn tick(&mut self) -> Step {
        let report = step_report(&self.bodies, self.bounds);
        self.bodies.clone_from(&report.bodies);
        self.ticks += 1;
        report
    }

    /// Advance `n` ticks, returning the total number of contacts resolved.
    pub fn advance(&mut self, n: u64) -> usize {
        (0..n).map(|_| self.tick().contacts.len()).sum()
    }

    /// Replace the viewport (host resize). Bodies are brought inside on the next tick.
    pub fn resize(&mut self, bounds: Bounds) -> Result<()> {
        bounds.validate()?;
        log::info!("resize to {}x{}", bounds.width, bounds.height);
        warn_oversized(&self.bodies, &bounds);
        self.bounds = bounds;
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access for hosts that edit velocities between ticks.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Ticks applied since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.bodies.iter().map(|b| b.position).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.bodies.iter().map(|b| b.velocity).collect()
    }

    pub fn centers(&self) -> Vec<[f64; DIM]> {
        self.bodies.iter().map(Body::center).collect()
    }

    /// Total kinetic energy with unit masses (diagnostic; not conserved by the exchange rule).
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}

fn warn_oversized(bodies: &[Body], bounds: &Bounds) {
    let n = bodies
        .iter()
        .filter(|b| b.size > bounds.width || b.size > bounds.height)
        .count();
    if n > 0 {
        log::warn!(
            "{n} bodies are larger than the {}x{} viewport and will be pinned to its origin",
            bounds.width,
            bounds.height
        );
    }
}
