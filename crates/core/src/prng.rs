//! Seedable Xorshift64 generator used for particle spawning.
//!
//! Every random draw in a simulation (spawn positions, initial ages,
//! fade-in thresholds, respawns) comes from one generator owned by the
//! engine, so a run is reproducible from its seed alone.

use serde::{Deserialize, Serialize};

/// Xorshift64 with shifts (13, 7, 17).
///
/// A zero seed is replaced by a fixed non-zero constant because zero is a
/// fixed point of the recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const ZERO_SEED_REPLACEMENT: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        self.state = s;
        s
    }

    /// Uniform in [0, 1), built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        let v = min + self.next_f64() * (max - min);
        // rounding can land exactly on max for wide ranges
        if v < max {
            v
        } else {
            min
        }
    }

    /// Uniform integer in [0, bound). Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        ((self.next_u64() >> 32) % u64::from(bound)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_draw_for_seed_42_is_stable() {
        // Changing this value changes every seeded render.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_still_produces_values() {
        let mut rng = Xorshift64::new(0);
        assert!((0..8).all(|_| rng.next_u64() != 0));
    }

    #[test]
    fn equal_seeds_give_equal_streams() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        for _ in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn next_below_covers_every_fade_in_value() {
        let mut rng = Xorshift64::new(77);
        let mut seen = [false; 30];
        for _ in 0..5000 {
            seen[rng.next_below(30) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "some value in [0, 30) never drawn");
    }

    #[test]
    fn next_below_zero_bound_is_zero() {
        let mut rng = Xorshift64::new(5);
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn state_survives_json() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..10 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        assert_eq!(rng.next_u64(), restored.next_u64());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_range_is_half_open(
                seed: u64,
                min in -1e6_f64..1e6,
                span in 1e-6_f64..1e6,
            ) {
                let max = min + span;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..64 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} not in [{min}, {max})");
                }
            }

            #[test]
            fn next_below_is_below(seed: u64, bound in 1_u32..100_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..64 {
                    prop_assert!(rng.next_below(bound) < bound);
                }
            }
        }
    }
}
