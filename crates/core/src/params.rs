//! Typed lookups into a JSON parameter object.
//!
//! A missing key (or `null`) yields the default. A key present with the
//! wrong type or an out-of-range value is reported as
//! [`EngineError::InvalidParameter`] rather than silently ignored, so a typo
//! like `"max_age": "300"` in a config file surfaces instead of vanishing.

use serde_json::Value;

use crate::error::EngineError;

fn lookup<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn invalid(name: &str, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// A finite number. Integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> Result<f64, EngineError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v
            .as_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| invalid(name, format!("expected a finite number, got {v}"))),
    }
}

/// A non-negative integer that fits in `u32`.
pub fn param_u32(params: &Value, name: &str, default: u32) -> Result<u32, EngineError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid(name, format!("expected an integer in 0..={}, got {v}", u32::MAX))),
    }
}

/// A non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> Result<usize, EngineError> {
    match lookup(params, name) {
        None => Ok(default),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid(name, format!("expected a non-negative integer, got {v}"))),
    }
}
