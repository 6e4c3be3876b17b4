//! The simulation loop: owns the engine, ticks it, and hands each snapshot
//! to a renderer.
//!
//! Lifecycle:
//! - [`SimulationLoop::start`] validates the configuration and builds a
//!   fresh engine. A configuration error leaves the loop idle.
//! - [`SimulationLoop::tick`] advances one tick while running.
//! - [`SimulationLoop::stop`] (or [`CancelHandle::cancel`] from any thread)
//!   ends ticking. Stopping twice is a no-op.
//! - [`SimulationLoop::reconfigure`] applies a new configuration: a pure
//!   canvas resize keeps the population, anything else restarts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flowfield_core::config::{ConfigChange, SimulationConfig};
use flowfield_core::engine::{Engine, TickReport};
use flowfield_core::error::EngineError;
use flowfield_core::snapshot::Snapshot;
use flowfield_particles::FlowEngine;

use crate::schedule::FrameScheduler;
use crate::Renderer;

/// Builds an engine for a validated configuration.
pub type EngineFactory =
    Box<dyn Fn(&SimulationConfig) -> Result<Box<dyn Engine>, EngineError> + Send>;

/// Cloneable stop flag for a [`SimulationLoop`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SimulationLoop {
    config: SimulationConfig,
    factory: EngineFactory,
    engine: Option<Box<dyn Engine>>,
    /// Set by `start`, cleared by `stop`. A config error while set leaves
    /// the loop idle until a valid config arrives.
    wanted: bool,
    cancel: CancelHandle,
    status: Option<String>,
    ticks: u64,
}

impl SimulationLoop {
    /// A stopped loop that will run a [`FlowEngine`].
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_factory(
            config,
            Box::new(|c: &SimulationConfig| {
                FlowEngine::from_config(c).map(|e| Box::new(e) as Box<dyn Engine>)
            }),
        )
    }

    pub fn with_factory(config: SimulationConfig, factory: EngineFactory) -> Self {
        Self {
            config,
            factory,
            engine: None,
            wanted: false,
            cancel: CancelHandle::default(),
            status: None,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_some() && !self.cancel.is_cancelled()
    }

    /// The most recent field or configuration error, cleared by the next
    /// fully successful tick.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Ticks completed since the engine was last rebuilt.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn engine(&self) -> Option<&dyn Engine> {
        self.engine.as_deref()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.engine.as_ref().map(|e| e.snapshot())
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Starts ticking with a fresh engine. A running loop is left alone;
    /// one cancelled through its handle is rebuilt.
    pub fn start(&mut self) -> Result<(), EngineError> {
        let cancelled = self.cancel.is_cancelled();
        self.wanted = true;
        self.cancel.reset();
        if self.engine.is_some() && !cancelled {
            return Ok(());
        }
        self.rebuild()
    }

    /// Stops ticking and drops the engine.
    pub fn stop(&mut self) {
        self.wanted = false;
        self.cancel.cancel();
        if self.engine.take().is_some() {
            log::info!("simulation stopped after {} ticks", self.ticks);
        }
    }

    /// Applies a new configuration.
    ///
    /// While running, returns what the loop did: nothing, a resize that
    /// keeps the population, or a restart. While stopped, the config is
    /// stored and the kind of change is returned. An invalid configuration
    /// is stored, stops the engine and is returned as an error; the loop
    /// resumes once a valid one is applied.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<ConfigChange, EngineError> {
        let change = self.config.change_to(&config);
        self.config = config;
        if let Err(err) = self.config.validate() {
            self.idle_on(&err);
            return Err(err);
        }
        if !self.wanted {
            return Ok(change);
        }
        let (width, height) = (self.config.width, self.config.height);
        match (change, self.engine.as_mut()) {
            (ConfigChange::Unchanged, Some(_)) => return Ok(ConfigChange::Unchanged),
            (ConfigChange::Resize, Some(engine)) => {
                engine.resize(width, height)?;
                log::info!("canvas resized to {width}x{height}, keeping particles");
                return Ok(ConfigChange::Resize);
            }
            _ => {}
        }
        log::info!("configuration changed, restarting simulation");
        self.rebuild()?;
        Ok(ConfigChange::Restart)
    }

    /// Forgets accumulated traces without restarting.
    pub fn clear_traces(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.clear_traces();
        }
    }

    /// Advances one tick and renders it. Returns `None` when not running.
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Option<TickReport> {
        if self.cancel.is_cancelled() && self.engine.is_some() {
            self.stop();
        }
        let engine = self.engine.as_mut()?;
        let report = engine.step();
        renderer.render(engine.snapshot());
        self.ticks += 1;
        self.update_status(report.status_message());
        Some(report)
    }

    /// Runs up to `ticks` ticks back to back. Returns how many ran.
    pub fn run_for<R: Renderer + ?Sized>(&mut self, ticks: u64, renderer: &mut R) -> u64 {
        let mut done = 0;
        while done < ticks && self.tick(renderer).is_some() {
            done += 1;
        }
        done
    }

    /// Ticks on the scheduler's cadence until stopped or cancelled.
    pub fn run<R, S>(&mut self, renderer: &mut R, scheduler: &mut S) -> u64
    where
        R: Renderer + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        let mut done = 0;
        while self.is_running() {
            scheduler.wait_next();
            if self.tick(renderer).is_none() {
                break;
            }
            done += 1;
        }
        done
    }

    fn rebuild(&mut self) -> Result<(), EngineError> {
        self.engine = None;
        self.ticks = 0;
        let built = self
            .config
            .validate()
            .and_then(|()| (self.factory)(&self.config));
        match built {
            Ok(engine) => {
                log::info!(
                    "simulation started: dx = {:?}, dy = {:?}, a = {}, b = {}",
                    self.config.dx,
                    self.config.dy,
                    self.config.a,
                    self.config.b
                );
                self.engine = Some(engine);
                self.status = None;
                Ok(())
            }
            Err(err) => {
                self.idle_on(&err);
                Err(err)
            }
        }
    }

    fn idle_on(&mut self, err: &EngineError) {
        log::warn!("configuration error, simulation idle: {err}");
        self.engine = None;
        self.status = Some(err.to_string());
    }

    fn update_status(&mut self, next: Option<String>) {
        match (&self.status, &next) {
            (None, Some(msg)) => log::warn!("{msg}"),
            (Some(old), Some(msg)) if old != msg => log::warn!("{msg}"),
            (Some(_), None) => log::info!("field evaluates cleanly again"),
            _ => {}
        }
        self.status = next;
    }
}
