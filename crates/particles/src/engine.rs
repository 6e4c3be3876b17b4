//! The particle population and its per-tick update.

use flowfield_core::bounds::FieldBounds;
use flowfield_core::engine::TickReport;
use flowfield_core::error::EngineError;
use flowfield_core::field_source::{FieldSource, Velocity};
use flowfield_core::prng::Xorshift64;
use glam::DVec2;

use crate::params::ParticleParams;
use crate::particle::{displacement, Particle, TracedParticle};

/// What a renderer needs from one live particle after a tick, in field space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSample {
    pub pos: DVec2,
    pub alpha: f64,
    pub velocity: Velocity,
}

/// Owns the live and traced particles and advances them through a field.
///
/// The live population is spawned once in [`new`](Self::new) and never
/// resized; expired particles are reborn in place. Every random draw comes
/// from the engine's own seeded generator.
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    params: ParticleParams,
    bounds: FieldBounds,
    rng: Xorshift64,
    particles: Vec<Particle>,
    traced: Vec<TracedParticle>,
    trace_enabled: bool,
    samples: Vec<RenderSample>,
    tick: u64,
}

impl ParticleEngine {
    pub fn new(bounds: FieldBounds, params: ParticleParams, seed: u64) -> Result<Self, EngineError> {
        bounds.validate()?;
        params.validate()?;
        let mut rng = Xorshift64::new(seed);
        let particles: Vec<Particle> = (0..params.particle_count)
            .map(|_| Particle::spawn(&bounds, &params, &mut rng))
            .collect();
        log::debug!(
            "spawned {} particles in x [{}, {}], y [{}, {}]",
            particles.len(),
            bounds.x_min,
            bounds.x_max,
            bounds.y_min,
            bounds.y_max
        );
        Ok(Self {
            params,
            bounds,
            rng,
            samples: Vec::with_capacity(particles.len()),
            particles,
            traced: Vec::new(),
            trace_enabled: false,
            tick: 0,
        })
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn bounds(&self) -> &FieldBounds {
        &self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn traced(&self) -> &[TracedParticle] {
        &self.traced
    }

    /// Samples from the last [`step`](Self::step), taken before recycling.
    /// Particles whose velocity query failed that tick are absent.
    pub fn samples(&self) -> &[RenderSample] {
        &self.samples
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    /// Turns trace mode on (with a fresh traced population) or off.
    pub fn set_trace(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
        if enabled {
            self.reseed_traces();
        } else {
            self.traced.clear();
        }
    }

    /// Moves the domain. Live particles keep their positions and drift back
    /// in through recycling; traced particles are re-seeded.
    pub fn set_bounds(&mut self, bounds: FieldBounds) -> Result<(), EngineError> {
        bounds.validate()?;
        self.bounds = bounds;
        if self.trace_enabled {
            self.reseed_traces();
        }
        Ok(())
    }

    /// Replaces every traced particle with a new one at a random position.
    pub fn reseed_traces(&mut self) {
        self.traced = (0..self.params.trace_count)
            .map(|_| TracedParticle::new(self.bounds.random_point(&mut self.rng)))
            .collect();
        log::debug!("seeded {} traced particles", self.traced.len());
    }

    /// Empties every trace history; traced particles stay where they are.
    pub fn clear_traces(&mut self) {
        for t in &mut self.traced {
            t.forget();
        }
    }

    /// Advances every particle one tick through `field`.
    ///
    /// A failed velocity query leaves that particle in place and counts as a
    /// failure; the particle still ages. The report covers live particles
    /// only.
    pub fn step(&mut self, field: &dyn FieldSource) -> TickReport {
        let mut report = TickReport::default();
        let params = &self.params;
        let stride = u64::from(params.recycle_stride);
        let phase = self.tick % stride;
        self.samples.clear();

        for (i, p) in self.particles.iter_mut().enumerate() {
            let velocity = match field.velocity_at(p.pos.x, p.pos.y) {
                Ok(v) if v.is_finite() => {
                    report.record_success();
                    Some(v)
                }
                Ok(_) => {
                    report.failures += 1;
                    None
                }
                Err(err) => {
                    log::trace!("particle {i} at ({}, {}): {err}", p.pos.x, p.pos.y);
                    report.record_failure(err);
                    None
                }
            };

            if let Some(v) = velocity {
                p.pos += displacement(v, params);
            }
            p.age = p.age.saturating_add(1);
            p.ticks_outside = if self.bounds.contains(p.pos) {
                0
            } else {
                p.ticks_outside.saturating_add(1)
            };

            let alpha = p.alpha(params);
            if let Some(velocity) = velocity {
                self.samples.push(RenderSample {
                    pos: p.pos,
                    alpha,
                    velocity,
                });
            }

            if p.expired(alpha, params) && i as u64 % stride == phase {
                *p = Particle::reborn(&self.bounds, params, &mut self.rng);
            }
        }

        if self.trace_enabled {
            for t in &mut self.traced {
                t.remember(params.trace_length);
                if let Ok(v) = field.velocity_at(t.pos.x, t.pos.y) {
                    if v.is_finite() {
                        t.pos += displacement(v, params);
                    }
                }
            }
        }

        self.tick += 1;
        report
    }
}
