#![deny(unsafe_code)]
//! Core types and traits for the flowfield particle visualizer.
//!
//! Provides the expression evaluator, the `FieldSource` trait with its
//! `VectorField` implementation, `FieldBounds`, colors and color schemes,
//! the `Xorshift64` PRNG, `SimulationConfig`, the `Engine` trait and the
//! `Snapshot` handed to renderers.

pub mod bounds;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod field_source;
pub mod params;
pub mod prng;
pub mod scheme;
pub mod snapshot;

pub use bounds::FieldBounds;
pub use color::{Rgba, Srgb};
pub use config::{ConfigChange, SimulationConfig};
pub use engine::{Engine, TickReport};
pub use error::{Component, EngineError, FieldError};
pub use expr::{evaluate, Bindings, ExprError, Expression};
pub use field_source::{FieldSource, Velocity, VectorField};
pub use prng::Xorshift64;
pub use scheme::{ColorMap, ColorScheme};
pub use snapshot::{Snapshot, Sprite};
