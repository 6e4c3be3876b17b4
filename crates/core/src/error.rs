//! Error types for flowfield.
//!
//! [`EngineError`] covers configuration and I/O failures, the only
//! conditions that stop a simulation. [`FieldError`] covers per-tick field
//! failures, which are reported to the user while ticking continues.

use std::fmt;

use thiserror::Error;

use crate::expr::ExprError;

/// Errors that prevent a simulation from starting or continuing.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bounds with `min >= max` on some axis, or a non-finite bound.
    #[error("invalid bounds: x [{x_min}, {x_max}], y [{y_min}, {y_max}] (each min must be below its max)")]
    InvalidBounds {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },

    /// Canvas width or height was zero.
    #[error("invalid dimensions: width and height must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// A numeric setting outside its usable range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Color scheme name not recognized.
    #[error("unknown color scheme: {0}")]
    UnknownColorScheme(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

/// Which of the two field equations an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Dx,
    Dy,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Dx => f.write_str("dx/dt"),
            Component::Dy => f.write_str("dy/dt"),
        }
    }
}

/// A failure observed while querying the vector field.
///
/// The `Display` form is the status text shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// One equation failed to evaluate at some point.
    #[error("invalid expression for {component}: \"{expr}\" ({source})")]
    Expression {
        component: Component,
        expr: String,
        #[source]
        source: ExprError,
    },

    /// No particle got a finite velocity this tick.
    #[error("no valid particles, check your equations")]
    FieldInvalid,
}

impl FieldError {
    /// The underlying expression error, if any.
    pub fn expr_error(&self) -> Option<&ExprError> {
        match self {
            FieldError::Expression { source, .. } => Some(source),
            FieldError::FieldInvalid => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bounds_lists_all_four_values() {
        let err = EngineError::InvalidBounds {
            x_min: 5.0,
            x_max: -5.0,
            y_min: -1.0,
            y_max: 2.5,
        };
        let msg = err.to_string();
        for part in ["5", "-5", "-1", "2.5"] {
            assert!(msg.contains(part), "missing {part} in: {msg}");
        }
    }

    #[test]
    fn invalid_dimensions_shows_size() {
        let msg = EngineError::InvalidDimensions {
            width: 0,
            height: 480,
        }
        .to_string();
        assert!(msg.contains("0x480"), "got: {msg}");
    }

    #[test]
    fn invalid_parameter_names_the_parameter() {
        let msg = EngineError::InvalidParameter {
            name: "dt".into(),
            reason: "must be finite".into(),
        }
        .to_string();
        assert!(msg.contains("dt") && msg.contains("finite"), "got: {msg}");
    }

    #[test]
    fn expression_error_names_component_and_text() {
        let err = FieldError::Expression {
            component: Component::Dy,
            expr: "x +".into(),
            source: ExprError::UnexpectedEnd,
        };
        let msg = err.to_string();
        assert!(msg.contains("dy/dt"), "got: {msg}");
        assert!(msg.contains("x +"), "got: {msg}");
        assert!(msg.contains("unexpected end"), "got: {msg}");
        assert_eq!(err.expr_error(), Some(&ExprError::UnexpectedEnd));
    }

    #[test]
    fn field_invalid_has_user_message() {
        let msg = FieldError::FieldInvalid.to_string();
        assert!(msg.contains("no valid particles"), "got: {msg}");
        assert!(FieldError::FieldInvalid.expr_error().is_none());
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
        assert_send_sync::<FieldError>();
    }
}
