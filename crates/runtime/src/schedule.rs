//! Frame pacing for free-running loops.

use std::thread;
use std::time::{Duration, Instant};

use flowfield_core::error::EngineError;

/// Decides when the next tick may fire.
pub trait FrameScheduler {
    /// Blocks until the next frame is due.
    fn wait_next(&mut self);
}

/// Ticks as fast as the loop can go.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

impl FrameScheduler for Unthrottled {
    fn wait_next(&mut self) {}
}

/// Ticks at a fixed rate. A late frame does not cause a burst of catch-up
/// frames; the schedule restarts from now.
#[derive(Debug, Clone)]
pub struct FixedRate {
    period: Duration,
    next: Option<Instant>,
}

impl FixedRate {
    pub fn new(fps: f64) -> Result<Self, EngineError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(EngineError::InvalidParameter {
                name: "fps".to_string(),
                reason: format!("must be finite and positive, got {fps}"),
            });
        }
        Ok(Self {
            period: Duration::from_secs_f64(1.0 / fps),
            next: None,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameScheduler for FixedRate {
    fn wait_next(&mut self) {
        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            thread::sleep(due - now);
            self.next = Some(due + self.period);
        } else {
            self.next = Some(now + self.period);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rate_rejects_bad_fps() {
        assert!(FixedRate::new(0.0).is_err());
        assert!(FixedRate::new(-30.0).is_err());
        assert!(FixedRate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn fixed_rate_period_matches_fps() {
        let s = FixedRate::new(50.0).unwrap();
        assert_eq!(s.period(), Duration::from_millis(20));
    }

    #[test]
    fn fixed_rate_spaces_frames() {
        let mut s = FixedRate::new(200.0).unwrap();
        let start = Instant::now();
        for _ in 0..4 {
            s.wait_next();
        }
        // first frame is immediate, the next three wait 5 ms each
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn unthrottled_never_blocks() {
        let mut s = Unthrottled;
        let start = Instant::now();
        for _ in 0..1000 {
            s.wait_next();
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
