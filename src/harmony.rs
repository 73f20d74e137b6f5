//! Color-wheel harmonies around a single color.
//!
//! All schemes rotate hue only; saturation and value are kept.

use std::str::FromStr;

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

use crate::PaletteError;

/// Default spacing between split-complementary and analogous hues, degrees.
pub const DEFAULT_SPACING: f32 = 72.0;

/// `n` hues centred on the complement of `color`, `spacing` degrees apart.
pub fn split_complementary(color: Srgb<u8>, n: usize, spacing: f32) -> Vec<Srgb<u8>> {
    let hsv: Hsv = Hsv::from_color(color.into_format::<f32>());
    let spacing = spacing.rem_euclid(360.0);
    let complement = hsv.hue.into_positive_degrees() + 180.0;
    let start = if n % 2 == 1 {
        complement - (n - 1) as f32 / 2.0 * spacing
    } else {
        complement - spacing / 2.0 - (n as f32 / 2.0 - 1.0) * spacing
    };

    (0..n)
        .map(|i| {
            let hue = (start + i as f32 * spacing).rem_euclid(360.0);
            let rotated = Hsv::new(hue, hsv.saturation, hsv.value);
            Srgb::<f32>::from_color(rotated).into_format::<u8>()
        })
        .collect()
}

/// The color directly opposite on the wheel.
pub fn complementary(color: Srgb<u8>) -> Srgb<u8> {
    split_complementary(color, 1, DEFAULT_SPACING)[0]
}

/// The two colors completing an equilateral triangle.
pub fn triadic(color: Srgb<u8>) -> Vec<Srgb<u8>> {
    split_complementary(color, 2, 120.0)
}

/// The three colors completing a square.
pub fn tetradic(color: Srgb<u8>) -> Vec<Srgb<u8>> {
    split_complementary(color, 3, 90.0)
}

/// Two neighbours of `color`, `spacing` degrees apart from each other.
pub fn analogous(color: Srgb<u8>, spacing: f32) -> Vec<Srgb<u8>> {
    split_complementary(color, 2, 360.0 - spacing)
}

/// Harmony scheme selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Harmony {
    Complementary,
    SplitComplementary,
    Triadic,
    Tetradic,
    Analogous,
}

impl Harmony {
    /// Colors of this scheme, with default spacings.
    pub fn apply(self, color: Srgb<u8>) -> Vec<Srgb<u8>> {
        match self {
            Harmony::Complementary => vec![complementary(color)],
            Harmony::SplitComplementary => split_complementary(color, 2, DEFAULT_SPACING),
            Harmony::Triadic => triadic(color),
            Harmony::Tetradic => tetradic(color),
            Harmony::Analogous => analogous(color, DEFAULT_SPACING),
        }
    }
}

impl FromStr for Harmony {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complementary" | "direct" => Ok(Harmony::Complementary),
            "split_complementary" => Ok(Harmony::SplitComplementary),
            "triadic" => Ok(Harmony::Triadic),
            "tetradic" | "square" => Ok(Harmony::Tetradic),
            "analogous" => Ok(Harmony::Analogous),
            other => Err(PaletteError::invalid("harmony", other)),
        }
    }
}
