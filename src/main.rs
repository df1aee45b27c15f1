use particle_field::core::Body;
use particle_field::driver::{Clock, Driver, FrameSink, ManualClock, SystemClock};
use particle_field::{FieldConfig, ParticleField};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Headless particle field host: steps the field and writes every frame as CSV.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// YAML field config; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 100)]
    ticks: u64,

    /// Seed, overriding the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Sleep at the configured cadence instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Print the effective config as YAML to stderr before running
    #[arg(long)]
    dump_config: bool,

    /// CSV output path; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// `tick,index,x,y,size,vx,vy` rows.
struct CsvSink<W: Write> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "tick,index,x,y,size,vx,vy")?;
        Ok(Self { out })
    }
}

impl<W: Write> FrameSink for CsvSink<W> {
    fn frame(&mut self, tick: u64, bodies: &[Body]) -> particle_field::error::Result<()> {
        for (i, b) in bodies.iter().enumerate() {
            writeln!(
                self.out,
                "{},{},{},{},{},{},{}",
                tick, i, b.position[0], b.position[1], b.size, b.velocity[0], b.velocity[1]
            )?;
        }
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<FieldConfig> {
    let mut cfg = match &args.config {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FieldConfig::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = load_config(&args)?;
    if args.dump_config {
        eprint!("{}", cfg.to_yaml_string()?);
    }

    let field = ParticleField::from_config(&cfg)?;
    let mut driver = Driver::new(field, cfg.cadence())?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut sink = CsvSink::new(out)?;

    let mut clock: Box<dyn Clock> = if args.realtime {
        Box::new(SystemClock::new())
    } else {
        Box::new(ManualClock::new())
    };

    let summary = driver.run(args.ticks, clock.as_mut(), &mut sink)?;
    sink.out.flush()?;
    log::info!(
        "{} ticks, {} contacts, bounces x={} y={}, kinetic energy {:.3}",
        summary.ticks,
        summary.contacts,
        summary.bounces[0],
        summary.bounces[1],
        driver.field().kinetic_energy()
    );
    Ok(())
}
