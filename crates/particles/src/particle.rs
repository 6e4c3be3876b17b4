//! Particle state and the per-particle lifecycle rules.

use std::collections::VecDeque;

use flowfield_core::bounds::FieldBounds;
use flowfield_core::field_source::Velocity;
use flowfield_core::prng::Xorshift64;
use glam::DVec2;

use crate::params::ParticleParams;

/// A live particle. Positions are in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub age: u32,
    /// Age at which fade-in completes, drawn from `[0, fade_in)`.
    pub fade_in_age: u32,
    /// Consecutive ticks spent outside the bounds, 0 while inside.
    pub ticks_outside: u32,
}

impl Particle {
    /// Initial spawn: uniform position and a uniform age in `[0, max_age)`,
    /// so the population does not expire all at once.
    pub fn spawn(bounds: &FieldBounds, params: &ParticleParams, rng: &mut Xorshift64) -> Self {
        let mut p = Self::reborn(bounds, params, rng);
        p.age = rng.next_below(params.max_age);
        p
    }

    /// A fresh particle at age 0.
    pub fn reborn(bounds: &FieldBounds, params: &ParticleParams, rng: &mut Xorshift64) -> Self {
        Self {
            pos: bounds.random_point(rng),
            age: 0,
            fade_in_age: rng.next_below(params.fade_in),
            ticks_outside: 0,
        }
    }

    /// Alpha from age alone, before any exit decay.
    pub fn age_alpha(&self, params: &ParticleParams) -> f64 {
        lifecycle_alpha(self.age, self.fade_in_age, params.max_age, params.fade_out)
    }

    /// Display alpha: the age schedule times `exit_decay` per tick outside.
    pub fn alpha(&self, params: &ParticleParams) -> f64 {
        let decay = params
            .exit_decay
            .powi(i32::try_from(self.ticks_outside).unwrap_or(i32::MAX));
        (self.age_alpha(params) * decay).clamp(0.0, 1.0)
    }

    /// Due for recycling: too old or faded out.
    pub fn expired(&self, alpha: f64, params: &ParticleParams) -> bool {
        self.age > params.max_age || alpha <= params.recycle_alpha
    }
}

/// Piecewise-linear age schedule.
///
/// Ramps 0 to 1 over `[0, fade_in_age]`, holds 1, then ramps to 0 over the
/// last `fade_out` ticks before `max_age`. A zero-length ramp is a step.
pub fn lifecycle_alpha(age: u32, fade_in_age: u32, max_age: u32, fade_out: u32) -> f64 {
    let alpha = if age <= fade_in_age {
        if fade_in_age == 0 {
            1.0
        } else {
            f64::from(age) / f64::from(fade_in_age)
        }
    } else if age > max_age.saturating_sub(fade_out) {
        if fade_out == 0 {
            0.0
        } else {
            (f64::from(max_age) - f64::from(age)) / f64::from(fade_out)
        }
    } else {
        1.0
    };
    alpha.clamp(0.0, 1.0)
}

/// Displacement for one tick: `v * step_scale / (1 + |v|) * dt`.
///
/// The damping keeps fast regions from flinging particles across the domain.
pub fn displacement(v: Velocity, params: &ParticleParams) -> DVec2 {
    let scale = params.step_scale / (1.0 + v.magnitude());
    v.as_vec() * (scale * params.dt)
}

/// A particle drawn with its recent path. Never ages or recycles.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedParticle {
    pub pos: DVec2,
    history: VecDeque<DVec2>,
}

impl TracedParticle {
    /// A traced particle at `pos` with an empty history.
    pub fn new(pos: DVec2) -> Self {
        Self {
            pos,
            history: VecDeque::new(),
        }
    }

    /// Prior positions, oldest first.
    pub fn history(&self) -> &VecDeque<DVec2> {
        &self.history
    }

    /// Records the current position, dropping the oldest beyond `limit`.
    pub fn remember(&mut self, limit: usize) {
        if limit == 0 {
            self.history.clear();
            return;
        }
        while self.history.len() >= limit {
            self.history.pop_front();
        }
        self.history.push_back(self.pos);
    }

    pub fn forget(&mut self) {
        self.history.clear();
    }
}
