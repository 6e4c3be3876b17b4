//! Particle lifecycle parameters.

use flowfield_core::error::EngineError;
use flowfield_core::params::{param_f64, param_u32, param_usize};
use serde_json::{json, Value};

/// Size of the live population.
const DEFAULT_PARTICLE_COUNT: usize = 8000;
/// Age in ticks after which a particle is due for recycling.
const DEFAULT_MAX_AGE: u32 = 300;
/// Upper bound (exclusive) for a particle's random fade-in age.
const DEFAULT_FADE_IN: u32 = 30;
/// Ticks before `max_age` over which alpha falls to zero.
const DEFAULT_FADE_OUT: u32 = 30;
/// Recycling happens for index `i` only on ticks where `tick % stride == i % stride`.
const DEFAULT_RECYCLE_STRIDE: u32 = 10;
/// Alpha at or below which a particle is due for recycling.
const DEFAULT_RECYCLE_ALPHA: f64 = 0.01;
/// Alpha multiplier per consecutive tick spent outside the bounds.
const DEFAULT_EXIT_DECAY: f64 = 0.95;
/// Integration step in field units.
const DEFAULT_DT: f64 = 0.01;
/// Numerator of the speed damping factor `step_scale / (1 + |v|)`.
const DEFAULT_STEP_SCALE: f64 = 2.0;
/// Traced particles kept while trace mode is on.
const DEFAULT_TRACE_COUNT: usize = 20;
/// History points kept per traced particle.
const DEFAULT_TRACE_LENGTH: usize = 100;

/// Largest live population accepted from a config.
pub const MAX_PARTICLE_COUNT: usize = 1_000_000;
/// Largest traced population accepted from a config.
pub const MAX_TRACE_COUNT: usize = 10_000;
/// Longest per-particle trace history accepted from a config.
pub const MAX_TRACE_LENGTH: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub particle_count: usize,
    pub max_age: u32,
    pub fade_in: u32,
    pub fade_out: u32,
    pub recycle_stride: u32,
    pub recycle_alpha: f64,
    pub exit_decay: f64,
    pub dt: f64,
    pub step_scale: f64,
    pub trace_count: usize,
    pub trace_length: usize,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            max_age: DEFAULT_MAX_AGE,
            fade_in: DEFAULT_FADE_IN,
            fade_out: DEFAULT_FADE_OUT,
            recycle_stride: DEFAULT_RECYCLE_STRIDE,
            recycle_alpha: DEFAULT_RECYCLE_ALPHA,
            exit_decay: DEFAULT_EXIT_DECAY,
            dt: DEFAULT_DT,
            step_scale: DEFAULT_STEP_SCALE,
            trace_count: DEFAULT_TRACE_COUNT,
            trace_length: DEFAULT_TRACE_LENGTH,
        }
    }
}

impl ParticleParams {
    /// Reads overrides from a JSON object; missing keys keep their defaults.
    /// The result is validated.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let parsed = Self {
            particle_count: param_usize(params, "particle_count", DEFAULT_PARTICLE_COUNT)?,
            max_age: param_u32(params, "max_age", DEFAULT_MAX_AGE)?,
            fade_in: param_u32(params, "fade_in", DEFAULT_FADE_IN)?,
            fade_out: param_u32(params, "fade_out", DEFAULT_FADE_OUT)?,
            recycle_stride: param_u32(params, "recycle_stride", DEFAULT_RECYCLE_STRIDE)?,
            recycle_alpha: param_f64(params, "recycle_alpha", DEFAULT_RECYCLE_ALPHA)?,
            exit_decay: param_f64(params, "exit_decay", DEFAULT_EXIT_DECAY)?,
            dt: param_f64(params, "dt", DEFAULT_DT)?,
            step_scale: param_f64(params, "step_scale", DEFAULT_STEP_SCALE)?,
            trace_count: param_usize(params, "trace_count", DEFAULT_TRACE_COUNT)?,
            trace_length: param_usize(params, "trace_length", DEFAULT_TRACE_LENGTH)?,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |name: &str, reason: String| {
            Err(EngineError::InvalidParameter {
                name: name.to_string(),
                reason,
            })
        };
        for (name, value, max) in [
            ("particle_count", self.particle_count, MAX_PARTICLE_COUNT),
            ("trace_count", self.trace_count, MAX_TRACE_COUNT),
            ("trace_length", self.trace_length, MAX_TRACE_LENGTH),
        ] {
            if value > max {
                return fail(name, format!("must be at most {max}, got {value}"));
            }
        }
        if self.fade_out > self.max_age {
            return fail(
                "fade_out",
                format!("must not exceed max_age ({}), got {}", self.max_age, self.fade_out),
            );
        }
        if self.recycle_stride == 0 {
            return fail("recycle_stride", "must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.recycle_alpha) {
            return fail("recycle_alpha", format!("must be in [0, 1], got {}", self.recycle_alpha));
        }
        if !(0.0..=1.0).contains(&self.exit_decay) {
            return fail("exit_decay", format!("must be in [0, 1], got {}", self.exit_decay));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return fail("dt", format!("must be finite and positive, got {}", self.dt));
        }
        if !self.step_scale.is_finite() || self.step_scale < 0.0 {
            return fail(
                "step_scale",
                format!("must be finite and non-negative, got {}", self.step_scale),
            );
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "particle_count": self.particle_count,
            "max_age": self.max_age,
            "fade_in": self.fade_in,
            "fade_out": self.fade_out,
            "recycle_stride": self.recycle_stride,
            "recycle_alpha": self.recycle_alpha,
            "exit_decay": self.exit_decay,
            "dt": self.dt,
            "step_scale": self.step_scale,
            "trace_count": self.trace_count,
            "trace_length": self.trace_length,
        })
    }

    pub fn schema() -> Value {
        json!({
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "min": 0,
                "max": MAX_PARTICLE_COUNT,
                "description": "Live particles, spawned once and recycled in place"
            },
            "max_age": {
                "type": "integer",
                "default": DEFAULT_MAX_AGE,
                "min": 0,
                "description": "Age in ticks after which a particle is recycled"
            },
            "fade_in": {
                "type": "integer",
                "default": DEFAULT_FADE_IN,
                "min": 0,
                "description": "Exclusive upper bound of each particle's random fade-in age"
            },
            "fade_out": {
                "type": "integer",
                "default": DEFAULT_FADE_OUT,
                "min": 0,
                "description": "Ticks before max_age over which alpha falls to zero"
            },
            "recycle_stride": {
                "type": "integer",
                "default": DEFAULT_RECYCLE_STRIDE,
                "min": 1,
                "description": "Recycle particle i only on ticks where tick % stride == i % stride"
            },
            "recycle_alpha": {
                "type": "number",
                "default": DEFAULT_RECYCLE_ALPHA,
                "min": 0.0,
                "max": 1.0,
                "description": "Alpha at or below which a particle is recycled"
            },
            "exit_decay": {
                "type": "number",
                "default": DEFAULT_EXIT_DECAY,
                "min": 0.0,
                "max": 1.0,
                "description": "Alpha multiplier per consecutive tick outside the bounds"
            },
            "dt": {
                "type": "number",
                "default": DEFAULT_DT,
                "min": 0.0,
                "description": "Integration step in field units"
            },
            "step_scale": {
                "type": "number",
                "default": DEFAULT_STEP_SCALE,
                "min": 0.0,
                "description": "Speed damping numerator: step = v * step_scale / (1 + |v|) * dt"
            },
            "trace_count": {
                "type": "integer",
                "default": DEFAULT_TRACE_COUNT,
                "min": 0,
                "max": MAX_TRACE_COUNT,
                "description": "Traced particles while trace mode is on"
            },
            "trace_length": {
                "type": "integer",
                "default": DEFAULT_TRACE_LENGTH,
                "min": 0,
                "max": MAX_TRACE_LENGTH,
                "description": "History points kept per traced particle"
            }
        })
    }
}
