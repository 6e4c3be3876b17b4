//! Rectangular field domain and its mapping to canvas pixels.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::prng::Xorshift64;

/// The (x, y) rectangle a vector field is visualized over.
///
/// Fields are public for serialization; call [`FieldBounds::validate`] (or
/// build through [`FieldBounds::new`]) before using bounds for simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for FieldBounds {
    fn default() -> Self {
        Self {
            x_min: -5.0,
            x_max: 5.0,
            y_min: -5.0,
            y_max: 5.0,
        }
    }
}

impl FieldBounds {
    /// Creates validated bounds.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, EngineError> {
        let bounds = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks that all values are finite and each min is strictly below its max.
    pub fn validate(&self) -> Result<(), EngineError> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(EngineError::InvalidBounds {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// A point drawn uniformly from the rectangle.
    pub fn random_point(&self, rng: &mut Xorshift64) -> DVec2 {
        DVec2::new(
            rng.next_range(self.x_min, self.x_max),
            rng.next_range(self.y_min, self.y_max),
        )
    }

    /// Maps a field point to canvas pixels. The y axis is flipped so `y_max`
    /// is the top row.
    pub fn to_pixel(&self, p: DVec2, width: usize, height: usize) -> DVec2 {
        DVec2::new(
            (p.x - self.x_min) / self.width() * width as f64,
            (self.y_max - p.y) / self.height() * height as f64,
        )
    }

    /// Inverse of [`to_pixel`](Self::to_pixel).
    pub fn from_pixel(&self, px: DVec2, width: usize, height: usize) -> DVec2 {
        DVec2::new(
            self.x_min + px.x / width as f64 * self.width(),
            self.y_max - px.y / height as f64 * self.height(),
        )
    }
}
