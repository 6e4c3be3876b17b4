//! Read-only per-tick view handed to renderers.

use glam::DVec2;

use crate::color::{Rgba, Srgb};

/// One live particle, ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Canvas position in pixels, origin top-left.
    pub pos: DVec2,
    pub alpha: f64,
    pub color: Rgba,
}

/// Everything a renderer needs to draw one tick.
///
/// Positions are already mapped to canvas pixels. `traces` holds one
/// polyline per traced particle: its position history, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub tick: u64,
    pub background: Srgb,
    pub sprites: Vec<Sprite>,
    pub traces: Vec<Vec<DVec2>>,
}

impl Snapshot {
    /// An empty snapshot for a canvas, before the first tick.
    pub fn empty(width: usize, height: usize, background: Srgb) -> Self {
        Self {
            width,
            height,
            tick: 0,
            background,
            sprites: Vec::new(),
            traces: Vec::new(),
        }
    }

    /// Sprites with non-zero alpha.
    pub fn visible(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(|s| s.alpha > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_content() {
        let snap = Snapshot::empty(800, 600, Srgb::BLACK);
        assert_eq!((snap.width, snap.height, snap.tick), (800, 600, 0));
        assert!(snap.sprites.is_empty() && snap.traces.is_empty());
    }

    #[test]
    fn visible_skips_transparent_sprites() {
        let mut snap = Snapshot::empty(10, 10, Srgb::BLACK);
        for alpha in [0.0, 0.5, 1.0] {
            snap.sprites.push(Sprite {
                pos: DVec2::ZERO,
                alpha,
                color: Srgb::WHITE.with_alpha(alpha),
            });
        }
        assert_eq!(snap.visible().count(), 2);
    }
}
