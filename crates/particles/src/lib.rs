#![deny(unsafe_code)]
//! Particle engine for flowfield.
//!
//! A fixed population of particles is advected through a [`FieldSource`]
//! with a speed-damped forward Euler step in field coordinates. Each
//! particle fades in, holds, and fades out over its life, and decays while
//! outside the bounds. Expired particles are reborn in place, a tenth of
//! the population per tick, so the picture never pulses.
//!
//! [`FlowEngine`] wraps the population with a [`VectorField`] and a color
//! map and implements the core [`Engine`] trait.
//!
//! [`FieldSource`]: flowfield_core::FieldSource
//! [`VectorField`]: flowfield_core::VectorField
//! [`Engine`]: flowfield_core::Engine

pub mod engine;
pub mod flow;
pub mod params;
pub mod particle;

pub use engine::{ParticleEngine, RenderSample};
pub use flow::FlowEngine;
pub use params::ParticleParams;
pub use particle::{Particle, TracedParticle};
