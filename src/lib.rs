//! Ambient 2D particle field.
//!
//! Circular bodies drift across a viewport, reflect at its edges and exchange
//! velocities when they overlap. The core is a pure step function; timing and
//! drawing belong to the host.
//!
//! ```
//! use particle_field::core::{create, step, Bounds};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! # fn main() -> particle_field::error::Result<()> {
//! let bounds = Bounds::new(1000.0, 800.0)?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut bodies = create(20, bounds, &mut rng)?;
//! for _ in 0..100 {
//!     bodies = step(&bodies, bounds);
//! }
//! assert!(bodies.iter().all(|b| bounds.contains(b)));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod driver;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::config::FieldConfig;
pub use crate::core::{create, step, Body, Bounds, ParticleField};
pub use crate::driver::{Clock, Driver, FrameSink, ManualClock, SystemClock};
