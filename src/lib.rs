//! # palettely
//!
//! Deterministic dominant-color palettes. The image is shrunk to a small
//! working grid whose pixels are split recursively in RGB space along the
//! direction of greatest color variance; the mean color of every final
//! cluster is one palette entry. The same image and parameters always give
//! the same palette.
//!
//! ```no_run
//! use palettely::{GeneratorConfig, PaletteGenerator, SortBy, to_hex};
//! use std::path::Path;
//!
//! let generator = PaletteGenerator::new(GeneratorConfig {
//!     colors: 12,
//!     sort_by: SortBy::StandardDeviation,
//!     top: Some(5),
//!     ..GeneratorConfig::default()
//! })?;
//! for color in generator.generate(Path::new("photo.jpg"))? {
//!     println!("{}", to_hex(color));
//! }
//! # Ok::<(), palettely::PaletteError>(())
//! ```

use js_sys::Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod generator;
pub mod harmony;
pub mod metric;
pub mod render;
pub mod sample;
pub mod tree;

pub use config::GeneratorConfig;
pub use error::{PaletteError, Result};
pub use generator::PaletteGenerator;
pub use harmony::Harmony;
pub use metric::SortBy;
pub use render::{Terminal, parse_hex, to_hex};
pub use sample::{SampleFilter, Samples};

/// Extract a palette from an encoded image and return it as hex strings
/// (`#rrggbb`) in the configured order.
pub fn extract_palette_bytes(input: &[u8], config: &GeneratorConfig) -> Result<Vec<String>> {
    let generator = PaletteGenerator::new(config.clone())?;
    let colors = generator.generate_from_bytes(input)?;
    Ok(colors.into_iter().map(to_hex).collect())
}

/// Extract a palette from an encoded image.
///
/// `sort_by` takes the metric names understood by [`SortBy`], including
/// `nearest_to:#rrggbb`; it defaults to tree order. The returned array holds
/// `#rrggbb` strings.
#[wasm_bindgen]
pub fn extract_palette(
    input: Vec<u8>,
    n_colors: usize,
    subsampling_size: Option<u32>,
    sort_by: Option<String>,
) -> std::result::Result<Array, JsValue> {
    let sort_by = match sort_by {
        Some(name) => name
            .parse::<SortBy>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => SortBy::default(),
    };
    let config = GeneratorConfig {
        colors: n_colors,
        subsampling_size: subsampling_size.unwrap_or(config::DEFAULT_SUBSAMPLING_SIZE),
        sort_by,
        ..GeneratorConfig::default()
    };

    let palette_hex = extract_palette_bytes(&input, &config)
        .map_err(|e| JsValue::from_str(&format!("Unable to extract palette: {e}")))?;

    let palette_js = Array::new();
    for hex in palette_hex {
        palette_js.push(&JsValue::from_str(&hex));
    }
    Ok(palette_js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn png_bytes(image: RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn extract_palette_bytes_reports_hex_codes() {
        let bytes = png_bytes(RgbImage::from_pixel(30, 30, Rgb([0x12, 0x34, 0x56])));
        let config = GeneratorConfig {
            colors: 4,
            ..GeneratorConfig::default()
        };
        // uniform image: no split possible, one color
        assert_eq!(extract_palette_bytes(&bytes, &config).unwrap(), vec!["#123456"]);
    }

    #[test]
    fn extract_palette_bytes_validates_config() {
        let bytes = png_bytes(RgbImage::new(2, 2));
        let config = GeneratorConfig {
            colors: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            extract_palette_bytes(&bytes, &config),
            Err(PaletteError::InvalidParameter { .. })
        ));
    }
}
