//! Particle field core: bodies, the pure per-tick step and collision resolution.
//!
//! Nothing in here keeps time or renders; hosts call [`step`] (or
//! [`ParticleField::tick`]) at their own cadence.

pub mod body;
pub mod collision;
pub mod field;

pub use body::{Body, Bounds, DIM};
pub use collision::Contact;
pub use field::{create, create_with, step, step_report, ParticleField, Spawn, Step};
