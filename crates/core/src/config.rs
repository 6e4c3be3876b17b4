//! Simulation configuration.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change. `params` is a free-form object of particle lifecycle overrides
//! interpreted by the particle engine.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::bounds::FieldBounds;
use crate::color::Srgb;
use crate::error::EngineError;
use crate::scheme::ColorScheme;

pub const DEFAULT_DX: &str = "a*x*(1-x)*(x-1) -y + 2.1";
pub const DEFAULT_DY: &str = "b*y*(1-y)*(1-x)";

/// Largest canvas, in pixels, a simulation will render into.
pub const MAX_PIXELS: usize = 1 << 26;

/// Rejects a zero, overflowing or oversized canvas.
pub fn check_dimensions(width: usize, height: usize) -> Result<(), EngineError> {
    let invalid = || EngineError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    let pixels = width.checked_mul(height).ok_or_else(invalid)?;
    if pixels > MAX_PIXELS {
        return Err(invalid());
    }
    Ok(())
}

/// How a simulation must react to a new configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Unchanged,
    /// Only the canvas size differs; particles keep their field positions.
    Resize,
    /// Anything else: rebuild the field and respawn every particle.
    Restart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub dx: String,
    pub dy: String,
    pub a: f64,
    pub b: f64,
    pub bounds: FieldBounds,
    pub width: usize,
    pub height: usize,
    pub trace: bool,
    pub scheme: ColorScheme,
    pub background: Srgb,
    pub seed: u64,
    pub params: Value,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dx: DEFAULT_DX.to_string(),
            dy: DEFAULT_DY.to_string(),
            a: 4.0,
            b: 1.5,
            bounds: FieldBounds::default(),
            width: 800,
            height: 600,
            trace: false,
            scheme: ColorScheme::Rainbow,
            background: Srgb {
                r: 0.0,
                g: 0.0,
                b: 20.0 / 255.0,
            },
            seed: 42,
            params: json!({}),
        }
    }
}

impl SimulationConfig {
    /// Checks everything a simulation needs before it can tick.
    ///
    /// Expression text is not checked here: a bad equation is a per-tick
    /// field failure, not a configuration error.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.bounds.validate()?;
        check_dimensions(self.width, self.height)?;
        for (name, value) in [("a", self.a), ("b", self.b)] {
            if !value.is_finite() {
                return Err(EngineError::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        if !(self.params.is_object() || self.params.is_null()) {
            return Err(EngineError::InvalidParameter {
                name: "params".to_string(),
                reason: format!("expected a JSON object, got {}", self.params),
            });
        }
        Ok(())
    }

    /// Classifies the move from `self` to `next`.
    pub fn change_to(&self, next: &SimulationConfig) -> ConfigChange {
        let same_size = self.width == next.width && self.height == next.height;
        let resized = SimulationConfig {
            width: next.width,
            height: next.height,
            ..self.clone()
        };
        if resized != *next {
            ConfigChange::Restart
        } else if same_size {
            ConfigChange::Unchanged
        } else {
            ConfigChange::Resize
        }
    }
}
