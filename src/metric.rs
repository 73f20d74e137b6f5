//! Scoring and ordering of extracted palettes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

use crate::render::parse_hex;
use crate::{PaletteError, Result};

/// Normalized HSV saturation, 0.0-1.0.
pub fn saturation(color: Srgb<u8>) -> f32 {
    let hsv: Hsv = Hsv::from_color(color.into_format::<f32>());
    hsv.saturation
}

/// Normalized HSV value, 0.0-1.0.
pub fn value(color: Srgb<u8>) -> f32 {
    let hsv: Hsv = Hsv::from_color(color.into_format::<f32>());
    hsv.value
}

/// Sum of squared deviations of the channels from their mean; zero for
/// grays, large for vivid colors.
pub fn channel_spread(color: Srgb<u8>) -> f64 {
    let (r, g, b) = (color.red as f64, color.green as f64, color.blue as f64);
    let mean = (r + g + b) / 3.0;
    (r - mean).powi(2) + (g - mean).powi(2) + (b - mean).powi(2)
}

/// Squared Euclidean distance in RGB.
pub fn distance_squared(color: Srgb<u8>, target: Srgb<u8>) -> u32 {
    let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2) as u32;
    d(color.red, target.red) + d(color.green, target.green) + d(color.blue, target.blue)
}

/// Order in which a palette is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Leaf order of the partition tree.
    #[default]
    Area,
    /// Most saturated first.
    Saturation,
    /// Brightest first.
    Value,
    /// Bright and muted first: descending `1 - saturation + value`.
    #[serde(rename = "saturation+value")]
    SaturationValue,
    /// Farthest from gray first.
    #[serde(alias = "distance_from_gray", alias = "eye_catching")]
    StandardDeviation,
    /// Closest to the target first.
    NearestTo([u8; 3]),
}

impl SortBy {
    /// Resolve a metric name; `nearest_to` needs `target`.
    pub fn from_name(name: &str, target: Option<Srgb<u8>>) -> Result<Self> {
        Ok(match name.trim() {
            "area" => SortBy::Area,
            "saturation" => SortBy::Saturation,
            "value" => SortBy::Value,
            "saturation+value" => SortBy::SaturationValue,
            "standard_deviation" | "distance_from_gray" | "eye_catching" => {
                SortBy::StandardDeviation
            }
            "nearest_to" => {
                let t = target.ok_or_else(|| PaletteError::invalid("target", "missing"))?;
                SortBy::NearestTo([t.red, t.green, t.blue])
            }
            other => return Err(PaletteError::invalid("sort_by", other)),
        })
    }

    fn compare(&self, a: Srgb<u8>, b: Srgb<u8>) -> Ordering {
        match *self {
            SortBy::Area => Ordering::Equal,
            SortBy::Saturation => saturation(b).total_cmp(&saturation(a)),
            SortBy::Value => value(b).total_cmp(&value(a)),
            SortBy::SaturationValue => {
                let score = |c| 1.0 - saturation(c) + value(c);
                score(b).total_cmp(&score(a))
            }
            SortBy::StandardDeviation => channel_spread(b).total_cmp(&channel_spread(a)),
            SortBy::NearestTo(t) => {
                let target = Srgb::from(t);
                distance_squared(a, target).cmp(&distance_squared(b, target))
            }
        }
    }
}

/// Accepts the plain names plus `nearest_to:<hex>`.
impl FromStr for SortBy {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some(("nearest_to", hex)) => SortBy::from_name("nearest_to", Some(parse_hex(hex)?)),
            _ => SortBy::from_name(s, None),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::Area => f.write_str("area"),
            SortBy::Saturation => f.write_str("saturation"),
            SortBy::Value => f.write_str("value"),
            SortBy::SaturationValue => f.write_str("saturation+value"),
            SortBy::StandardDeviation => f.write_str("standard_deviation"),
            SortBy::NearestTo([r, g, b]) => write!(f, "nearest_to:#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// Stable sort of `colors` by `sort_by`; equal keys keep leaf order.
pub fn sort_palette(colors: &mut [Srgb<u8>], sort_by: &SortBy) {
    colors.sort_by(|a, b| sort_by.compare(*a, *b));
}

/// Keep the first `top` colors. A `top` larger than the palette keeps all.
pub fn truncate(colors: &mut Vec<Srgb<u8>>, top: Option<usize>) {
    if let Some(top) = top {
        colors.truncate(top);
    }
}
