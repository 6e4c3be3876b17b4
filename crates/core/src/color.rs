//! Color types for particle rendering.
//!
//! [`Srgb`] is the opaque color used for backgrounds and serialized as
//! `"#rrggbb"`. [`Rgba`] adds the per-particle opacity. Color schemes build
//! colors in HSL, so [`hsl_to_srgb`] is provided here.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// sRGB color with straight (non-premultiplied) alpha, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses `"#rrggbb"` or `"rrggbb"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} in {hex:?}: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// `"#rrggbb"`, components clamped and rounded to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl Rgba {
    pub fn rgb(&self) -> Srgb {
        Srgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

fn to_u8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Converts HSL to sRGB. `hue` is in degrees and may be any finite value
/// (wrapped to [0, 360)); saturation and lightness are clamped to [0, 1].
pub fn hsl_to_srgb(hue: f64, saturation: f64, lightness: f64) -> Srgb {
    let h = if hue.is_finite() {
        hue.rem_euclid(360.0)
    } else {
        0.0
    };
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    Srgb {
        r: r1 + m,
        g: g1 + m,
        b: b1 + m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Srgb, b: Srgb) -> bool {
        (a.r - b.r).abs() < EPS && (a.g - b.g).abs() < EPS && (a.b - b.b).abs() < EPS
    }

    #[test]
    fn hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#000014").unwrap();
        let b = Srgb::from_hex("000014").unwrap();
        assert_eq!(a, b);
        assert!((a.b - 20.0 / 255.0).abs() < EPS);
    }

    #[test]
    fn hex_is_case_insensitive() {
        assert_eq!(
            Srgb::from_hex("#FFaa00").unwrap(),
            Srgb::from_hex("#ffAA00").unwrap()
        );
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("#gg0000").is_err());
        assert!(Srgb::from_hex("#ff00ééé").is_err());
    }

    #[test]
    fn to_hex_round_trips() {
        for hex in ["#000014", "#ffffff", "#4c5caf"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Srgb::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let back: Srgb = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(back, Srgb::BLACK);
        assert!(serde_json::from_str::<Srgb>("\"nope\"").is_err());
    }

    #[test]
    fn hsl_primaries() {
        assert!(close(hsl_to_srgb(0.0, 1.0, 0.5), Srgb { r: 1.0, g: 0.0, b: 0.0 }));
        assert!(close(hsl_to_srgb(120.0, 1.0, 0.5), Srgb { r: 0.0, g: 1.0, b: 0.0 }));
        assert!(close(hsl_to_srgb(240.0, 1.0, 0.5), Srgb { r: 0.0, g: 0.0, b: 1.0 }));
        assert!(close(hsl_to_srgb(180.0, 1.0, 0.5), Srgb { r: 0.0, g: 1.0, b: 1.0 }));
    }

    #[test]
    fn hsl_hue_wraps_like_css() {
        assert!(close(hsl_to_srgb(-120.0, 1.0, 0.5), hsl_to_srgb(240.0, 1.0, 0.5)));
        assert!(close(hsl_to_srgb(480.0, 1.0, 0.5), hsl_to_srgb(120.0, 1.0, 0.5)));
    }

    #[test]
    fn hsl_zero_saturation_is_gray() {
        let c = hsl_to_srgb(77.0, 0.0, 0.25);
        assert!(close(c, Srgb { r: 0.25, g: 0.25, b: 0.25 }));
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let c = Srgb { r: 0.1, g: 0.2, b: 0.3 }.with_alpha(0.4);
        assert_eq!(c.a, 0.4);
        assert_eq!(c.rgb(), Srgb { r: 0.1, g: 0.2, b: 0.3 });
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hsl_output_in_unit_cube(h in -1e4_f64..1e4, s in 0.0_f64..=1.0, l in 0.0_f64..=1.0) {
                let c = hsl_to_srgb(h, s, l);
                for v in [c.r, c.g, c.b] {
                    prop_assert!((-EPS..=1.0 + EPS).contains(&v), "{v} out of range for hsl({h}, {s}, {l})");
                }
            }
        }
    }
}
