use crate::error::{Error, Result};

/// Fixed spatial dimension (2D viewport).
pub const DIM: usize = 2;

/// A circular body drifting across the viewport.
///
/// Fields:
/// - `position`: top-left corner of the body's bounding square, in viewport pixels
/// - `size`: diameter (> 0), fixed for the body's lifetime
/// - `velocity`: displacement per tick [vx, vy]
///
/// Bodies carry no identifier; a body is addressed by its index in the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left anchored position (x, y).
    pub position: [f64; DIM],
    /// Diameter (> 0).
    pub size: f64,
    /// Velocity (vx, vy) in pixels per tick.
    pub velocity: [f64; DIM],
}

impl Body {
    /// Create a new body after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `size` is non-positive or any component is NaN/inf.
    pub fn new(position: [f64; DIM], size: f64, velocity: [f64; DIM]) -> Result<Self> {
        let body = Self {
            position,
            size,
            velocity,
        };
        body.validate()?;
        Ok(body)
    }

    /// Check the body's invariants without constructing a new one.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(Error::InvalidParam("size must be finite and > 0".into()));
        }
        if !self.position.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !self.velocity.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(())
    }

    /// Half the diameter.
    #[inline]
    pub fn radius(&self) -> f64 {
        0.5 * self.size
    }

    /// Center of the circle: position + size/2 on each axis.
    #[inline]
    pub fn center(&self) -> [f64; DIM] {
        let r = self.radius();
        [self.position[0] + r, self.position[1] + r]
    }

    /// Magnitude of the velocity vector.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity[0].hypot(self.velocity[1])
    }

    /// Direction of travel, `atan2(vy, vx)`.
    #[inline]
    pub fn heading(&self) -> f64 {
        self.velocity[1].atan2(self.velocity[0])
    }

    /// Kinetic energy with unit mass: 1/2 |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.velocity.iter().map(|&c| c * c).sum();
        0.5 * vsq
    }
}

/// The viewport rectangle bodies are confined to.
///
/// The origin is the top-left corner; a body of diameter `size` fits when its
/// position lies in `[0, width - size] x [0, height - size]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Horizontal extent in pixels (> 0).
    pub width: f64,
    /// Vertical extent in pixels (> 0).
    pub height: f64,
}

impl Bounds {
    /// Create validated bounds.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if either side is non-positive or NaN/inf.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let b = Self { width, height };
        b.validate()?;
        Ok(b)
    }

    /// Both sides must be finite and > 0.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(Error::InvalidParam("width must be finite and > 0".into()));
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(Error::InvalidParam("height must be finite and > 0".into()));
        }
        Ok(())
    }

    /// Side length along `axis` (0 = x, 1 = y).
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        if axis == 0 {
            self.width
        } else {
            self.height
        }
    }

    /// Whether `body` sits inside the size-aware range on both axes.
    pub fn contains(&self, body: &Body) -> bool {
        (0..DIM).all(|k| {
            let hi = (self.extent(k) - body.size).max(0.0);
            (0.0..=hi).contains(&body.position[k])
        })
    }
}
