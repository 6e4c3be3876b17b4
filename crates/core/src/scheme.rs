//! Built-in particle color schemes.
//!
//! A color map turns a particle's velocity angle (radians), its alpha and
//! its velocity magnitude into an [`Rgba`]. Every built-in scheme is an HSL
//! hue ramp at full saturation and 50% lightness, except `grayscale`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{hsl_to_srgb, Rgba, Srgb};
use crate::error::EngineError;

/// Maps `(angle, alpha, magnitude)` to a particle color.
pub trait ColorMap: Send + Sync {
    fn color(&self, angle: f64, alpha: f64, magnitude: f64) -> Rgba;
}

impl<F> ColorMap for F
where
    F: Fn(f64, f64, f64) -> Rgba + Send + Sync,
{
    fn color(&self, angle: f64, alpha: f64, magnitude: f64) -> Rgba {
        self(angle, alpha, magnitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Ocean,
    Fire,
    #[default]
    Rainbow,
    Grayscale,
    Velocity,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 5] = [
        ColorScheme::Ocean,
        ColorScheme::Fire,
        ColorScheme::Rainbow,
        ColorScheme::Grayscale,
        ColorScheme::Velocity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Ocean => "ocean",
            ColorScheme::Fire => "fire",
            ColorScheme::Rainbow => "rainbow",
            ColorScheme::Grayscale => "grayscale",
            ColorScheme::Velocity => "velocity",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ColorScheme::Ocean => "cyan to blue by direction",
            ColorScheme::Fire => "red to yellow by direction",
            ColorScheme::Rainbow => "full hue wheel by direction",
            ColorScheme::Grayscale => "brightness by direction",
            ColorScheme::Velocity => "hue by speed",
        }
    }

    /// Looks up a scheme by name, case insensitive.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| EngineError::UnknownColorScheme(name.to_string()))
    }

    pub fn list_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.name()).collect()
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorScheme {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl ColorMap for ColorScheme {
    fn color(&self, angle: f64, alpha: f64, magnitude: f64) -> Rgba {
        let rgb = match self {
            ColorScheme::Ocean => hsl_to_srgb(180.0 + angle * 60.0 / PI, 1.0, 0.5),
            ColorScheme::Fire => hsl_to_srgb(angle * 60.0 / PI, 1.0, 0.5),
            ColorScheme::Rainbow => hsl_to_srgb(angle * 180.0 / PI, 1.0, 0.5),
            ColorScheme::Grayscale => {
                // quantized to 8 bits like a CSS rgb() channel
                let level = (angle.sin().abs() * 255.0).floor() / 255.0;
                Srgb {
                    r: level,
                    g: level,
                    b: level,
                }
            }
            ColorScheme::Velocity => hsl_to_srgb(magnitude * 240.0, 1.0, 0.5),
        };
        rgb.with_alpha(alpha.clamp(0.0, 1.0))
    }
}
