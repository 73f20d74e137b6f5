//! Hex codes, terminal swatches and preview images.

use image::{DynamicImage, Rgb, RgbImage, imageops::FilterType};
use palette::Srgb;

use crate::{PaletteError, Result};

const PREVIEW_WIDTH: u32 = 1024;
const PREVIEW_HEIGHT: u32 = 720;
const PREVIEW_STRIP: u32 = 100;

/// `#rrggbb`, lowercase.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// `#rrggbbaa`; `alpha` is 0.0-1.0 and clamped.
pub fn to_hex_alpha(color: Srgb<u8>, alpha: f32) -> String {
    let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    format!("{}{a:02x}", to_hex(color))
}

/// Parse `rrggbb` with or without a leading `#`.
pub fn parse_hex(s: &str) -> Result<Srgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(PaletteError::invalid("hex color", s));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| PaletteError::invalid("hex color", s))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Capabilities of the attached terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terminal {
    pub truecolor: bool,
    pub columns: usize,
}

impl Default for Terminal {
    fn default() -> Self {
        Self {
            truecolor: false,
            columns: 80,
        }
    }
}

impl Terminal {
    /// Read `COLORTERM` and `COLUMNS` from the environment.
    pub fn detect() -> Self {
        let truecolor = std::env::var("COLORTERM")
            .map(|v| v == "truecolor" || v == "24bit")
            .unwrap_or(false);
        let columns = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|c| *c > 0)
            .unwrap_or(80);
        Self { truecolor, columns }
    }

    /// `n` full blocks, colored when the terminal supports 24-bit color.
    pub fn rgb_box(&self, color: Srgb<u8>, n: usize) -> String {
        let blocks = "\u{2588}".repeat(n);
        if self.truecolor {
            format!(
                "\x1b[38;2;{};{};{}m{blocks}\x1b[0m",
                color.red, color.green, color.blue
            )
        } else {
            blocks
        }
    }

    /// One line of swatches sharing the terminal width.
    pub fn swatch_line(&self, colors: &[Srgb<u8>]) -> String {
        if colors.is_empty() {
            return String::new();
        }
        let n = (self.columns / colors.len()).max(1);
        colors.iter().map(|c| self.rgb_box(*c, n)).collect()
    }
}

/// The source image at 1024×720 with a 100 px strip of palette bands on its
/// right. Bands split the height evenly; the last takes the remainder.
pub fn render_preview(image: &DynamicImage, colors: &[Srgb<u8>]) -> Result<RgbImage> {
    if colors.is_empty() {
        return Err(PaletteError::invalid("palette", "empty"));
    }
    let resized = image::imageops::resize(
        &image.to_rgb8(),
        PREVIEW_WIDTH,
        PREVIEW_HEIGHT,
        FilterType::Triangle,
    );
    let mut out = RgbImage::new(PREVIEW_WIDTH + PREVIEW_STRIP, PREVIEW_HEIGHT);
    image::imageops::replace(&mut out, &resized, 0, 0);

    let band = (PREVIEW_HEIGHT / colors.len() as u32).max(1);
    for y in 0..PREVIEW_HEIGHT {
        let index = ((y / band) as usize).min(colors.len() - 1);
        let c = colors[index];
        for x in PREVIEW_WIDTH..PREVIEW_WIDTH + PREVIEW_STRIP {
            out.put_pixel(x, y, Rgb([c.red, c.green, c.blue]));
        }
    }
    Ok(out)
}
