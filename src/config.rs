//! Field settings loaded from YAML.
//!
//! Every key is optional and falls back to the stock background animation:
//!
//! ```yaml
//! count: 20          # bodies in the field
//! width: 1000.0      # viewport, pixels
//! height: 800.0
//! size_min: 30.0     # diameters drawn from [size_min, size_max)
//! size_max: 50.0
//! speed: 2.0         # velocity components drawn from [-speed, speed)
//! seed: 42           # omit for a fresh field each run
//! tick_ms: 30        # host cadence
//! ```

use crate::core::body::Bounds;
use crate::core::field::{Spawn, DEFAULT_COUNT, SIZE_RANGE, SPEED};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    pub count: usize,
    pub width: f64,
    pub height: f64,
    pub size_min: f64,
    pub size_max: f64,
    pub speed: f64,
    pub seed: Option<u64>,
    pub tick_ms: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            width: 1000.0,
            height: 800.0,
            size_min: SIZE_RANGE.start,
            size_max: SIZE_RANGE.end,
            speed: SPEED,
            seed: None,
            tick_ms: 30,
        }
    }
}

impl FieldConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: FieldConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loaded config from {}", path.as_ref().display());
        Self::from_yaml_str(&text)
    }

    /// The effective settings as YAML, readable back by [`FieldConfig::from_yaml_str`].
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidParam("count must be > 0".into()));
        }
        if self.tick_ms == 0 {
            return Err(Error::InvalidParam("tick_ms must be > 0".into()));
        }
        self.bounds()?;
        self.spawn().validate()
    }

    pub fn bounds(&self) -> Result<Bounds> {
        Bounds::new(self.width, self.height)
    }

    pub fn spawn(&self) -> Spawn {
        Spawn {
            size: self.size_min..self.size_max,
            speed: self.speed,
        }
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
