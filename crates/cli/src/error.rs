//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: configuration error (bad bounds, size or parameters)
//! - 11: I/O error (config file read, PNG write)
//! - 12: input error (bad scheme or color flag, bad JSON params)
//! - 13: serialization error
//! - 14: expression error (eval failure, or no particle could move)

use std::fmt;

use flowfield_core::{EngineError, ExprError};

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// Configuration rejected by the engine (bounds, size, parameters).
    Engine(EngineError),
    /// Reading a config file or writing the PNG failed.
    Io(String),
    /// A flag or config value could not be parsed.
    Input(String),
    /// JSON output could not be produced.
    Serialization(String),
    /// An expression failed to evaluate, or no particle could move.
    Expression(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
            CliError::Expression(_) => 14,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg)
            | CliError::Input(msg)
            | CliError::Serialization(msg)
            | CliError::Expression(msg) => f.write_str(msg),
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            EngineError::InvalidColor(_) | EngineError::UnknownColorScheme(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Engine(other),
        }
    }
}

impl From<ExprError> for CliError {
    fn from(e: ExprError) -> Self {
        CliError::Expression(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
