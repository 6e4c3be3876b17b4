#![deny(unsafe_code)]
//! Runtime for flowfield: the simulation loop, frame pacing, a CPU raster
//! renderer and PNG snapshots.
//!
//! The loop owns a `Box<dyn Engine>` and hands each tick's [`Snapshot`] to
//! a [`Renderer`]. The CLI and any other host share this crate instead of
//! re-implementing the start/stop/restart rules.

pub mod raster;
pub mod schedule;
pub mod sim;

#[cfg(feature = "png")]
pub mod png;

use flowfield_core::snapshot::Snapshot;

pub use raster::{Frame, RasterRenderer};
pub use schedule::{FixedRate, FrameScheduler, Unthrottled};
pub use sim::{CancelHandle, EngineFactory, SimulationLoop};

/// Consumes one snapshot per tick. Snapshots are read-only.
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot);
}

impl<F> Renderer for F
where
    F: FnMut(&Snapshot),
{
    fn render(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}
