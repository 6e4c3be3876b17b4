//! The `Engine` trait the simulation loop drives, and the per-tick report.
//!
//! The trait is object-safe so a loop can own a `Box<dyn Engine>` and tests
//! can substitute a mock.

use serde_json::Value;

use crate::error::{EngineError, FieldError};
use crate::snapshot::Snapshot;

/// Outcome of one tick's field queries over the live population.
///
/// Traced particles are not counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Particles whose velocity query succeeded.
    pub successes: usize,
    /// Particles whose velocity query failed.
    pub failures: usize,
    /// The first failure seen this tick.
    pub first_error: Option<FieldError>,
}

impl TickReport {
    pub fn record_success(&mut self) {
        self.successes += 1;
    }

    pub fn record_failure(&mut self, err: FieldError) {
        self.failures += 1;
        if self.first_error.is_none() {
            self.first_error = Some(err);
        }
    }

    /// True when particles were queried and none got a velocity.
    pub fn field_invalid(&self) -> bool {
        self.successes == 0 && self.failures > 0
    }

    /// True when every query succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }

    /// The error to surface for this tick, if any.
    pub fn error(&self) -> Option<FieldError> {
        if self.field_invalid() {
            Some(FieldError::FieldInvalid)
        } else {
            self.first_error.clone()
        }
    }

    /// Human-readable status line, `None` on a clean tick.
    ///
    /// A field-invalid tick names the expression failure behind it.
    pub fn status_message(&self) -> Option<String> {
        match (self.field_invalid(), &self.first_error) {
            (true, Some(cause)) => Some(format!("{}: {cause}", FieldError::FieldInvalid)),
            (_, Some(err)) => Some(err.to_string()),
            (true, None) => Some(FieldError::FieldInvalid.to_string()),
            (false, None) => None,
        }
    }
}

/// A steppable particle simulation that renders into a [`Snapshot`].
pub trait Engine: Send {
    /// Advance one tick. Field failures are reported, never fatal.
    fn step(&mut self) -> TickReport;

    /// The view produced by the most recent tick.
    fn snapshot(&self) -> &Snapshot;

    /// Change the canvas size without touching simulation state.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), EngineError>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing the parameters, their types, ranges and defaults.
    fn param_schema(&self) -> Value;

    /// Forget accumulated trace history. No-op for engines without traces.
    fn clear_traces(&mut self) {}
}
