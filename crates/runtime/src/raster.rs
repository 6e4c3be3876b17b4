//! CPU raster renderer.
//!
//! Draws snapshots into an accumulating frame the way a 2D canvas would:
//! each frame is first washed with the background at low opacity, which
//! leaves fading motion trails behind moving particles. This module is
//! always available; PNG output lives in [`crate::png`].

use flowfield_core::color::{Rgba, Srgb};
use flowfield_core::config::check_dimensions;
use flowfield_core::error::EngineError;
use flowfield_core::snapshot::{Snapshot, Sprite};
use glam::DVec2;

use crate::Renderer;

/// Opacity of the background wash applied before each frame.
pub const TRAIL_FADE: f64 = 0.1;
/// Radius of the solid particle dot, in pixels.
pub const DOT_RADIUS: f64 = 1.5;
/// Radius at which the particle glow reaches zero, in pixels.
pub const GLOW_RADIUS: f64 = 4.0;
/// Stroke width of trace polylines, in pixels.
pub const TRACE_WIDTH: f64 = 2.0;
/// Opacity of the white trace stroke.
pub const TRACE_ALPHA: f64 = 0.8;

/// An opaque RGB image with components in [0, 1], row-major from the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Srgb>,
}

impl Frame {
    /// A frame of one color. Fails with `InvalidDimensions` for a zero,
    /// overflowing or oversized canvas.
    pub fn filled(width: usize, height: usize, color: Srgb) -> Result<Self, EngineError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at column `x`, row `y`, or `None` outside the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<Srgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// RGBA8 bytes, alpha always 255. Length is `width * height * 4`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| {
                let [r, g, b] = c.to_rgb8();
                [r, g, b, 255u8]
            })
            .collect()
    }

    /// Source-over blend of `color` into one pixel. Out-of-frame is ignored.
    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = color.a.clamp(0.0, 1.0);
        let px = &mut self.pixels[y as usize * self.width + x as usize];
        px.r += (color.r - px.r) * a;
        px.g += (color.g - px.g) * a;
        px.b += (color.b - px.b) * a;
    }

    /// Pixel rows and columns overlapping `[lo, hi]`, clipped to the frame.
    /// `None` when the box misses the frame entirely.
    fn clip(&self, lo: DVec2, hi: DVec2) -> Option<(i64, i64, i64, i64)> {
        let x0 = lo.x.floor().max(0.0);
        let y0 = lo.y.floor().max(0.0);
        let x1 = hi.x.ceil().min(self.width as f64 - 1.0);
        let y1 = hi.y.ceil().min(self.height as f64 - 1.0);
        if !(x0 <= x1 && y0 <= y1) {
            return None;
        }
        Some((x0 as i64, y0 as i64, x1 as i64, y1 as i64))
    }

    fn wash(&mut self, color: Srgb, alpha: f64) {
        for px in &mut self.pixels {
            px.r += (color.r - px.r) * alpha;
            px.g += (color.g - px.g) * alpha;
            px.b += (color.b - px.b) * alpha;
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        let reach = DVec2::splat(GLOW_RADIUS);
        let Some((x0, y0, x1, y1)) = self.clip(sprite.pos - reach, sprite.pos + reach) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = center.distance(sprite.pos);
                if d <= DOT_RADIUS {
                    self.blend(x, y, sprite.color);
                }
                if d < GLOW_RADIUS {
                    let falloff = 1.0 - d / GLOW_RADIUS;
                    self.blend(
                        x,
                        y,
                        Rgba {
                            a: sprite.color.a * falloff,
                            ..sprite.color
                        },
                    );
                }
            }
        }
    }

    /// Strokes a polyline, covering each pixel at most once.
    fn draw_polyline(&mut self, points: &[DVec2], color: Rgba) {
        let half = TRACE_WIDTH / 2.0;
        let mut covered: Vec<(i64, i64)> = Vec::new();
        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let reach = DVec2::splat(half);
            let Some((x0, y0, x1, y1)) = self.clip(a.min(b) - reach, a.max(b) + reach) else {
                continue;
            };
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                    if distance_to_segment(p, a, b) <= half {
                        covered.push((x, y));
                    }
                }
            }
        }
        covered.sort_unstable();
        covered.dedup();
        for (x, y) in covered {
            self.blend(x, y, color);
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Renders snapshots into an accumulating [`Frame`].
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    frame: Option<Frame>,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self { frame: None }
    }

    /// The frame drawn so far, `None` before the first render.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
}

impl Renderer for RasterRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        let stale = self
            .frame
            .as_ref()
            .map_or(true, |f| f.width != snapshot.width || f.height != snapshot.height);
        if stale {
            self.frame = match Frame::filled(snapshot.width, snapshot.height, snapshot.background) {
                Ok(frame) => Some(frame),
                Err(err) => {
                    log::warn!("skipping frame: {err}");
                    None
                }
            };
        }
        let Some(frame) = self.frame.as_mut() else {
            return;
        };

        frame.wash(snapshot.background, TRAIL_FADE);
        for sprite in snapshot.visible() {
            frame.draw_sprite(sprite);
        }
        let stroke = Srgb::WHITE.with_alpha(TRACE_ALPHA);
        for trace in snapshot.traces.iter().filter(|t| t.len() > 1) {
            frame.draw_polyline(trace, stroke);
        }
    }
}
