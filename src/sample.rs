//! Working image samples.
//!
//! The tree builder never touches the decoded source image. It runs on a
//! small fixed-resolution grid of RGB triples produced here.

use image::{DynamicImage, RgbImage, imageops::FilterType};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{PaletteError, Result};

/// Resampling filter used when shrinking an image to the working size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleFilter {
    Nearest,
    Triangle,
    /// Bicubic; the usual default of image libraries for RGB downsizing.
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<SampleFilter> for FilterType {
    fn from(filter: SampleFilter) -> Self {
        match filter {
            SampleFilter::Nearest => FilterType::Nearest,
            SampleFilter::Triangle => FilterType::Triangle,
            SampleFilter::CatmullRom => FilterType::CatmullRom,
            SampleFilter::Gaussian => FilterType::Gaussian,
            SampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Read-only row-major grid of RGB pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Samples {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Samples {
    /// Wrap a row-major pixel buffer. Zero-area grids and buffers whose
    /// length disagrees with `width * height` are rejected.
    pub fn new(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PaletteError::invalid("samples", format!("{width}x{height}")));
        }
        if pixels.len() != width * height {
            return Err(PaletteError::invalid(
                "samples",
                format!("{} pixels for a {width}x{height} grid", pixels.len()),
            ));
        }
        Ok(Self { width, height, pixels })
    }

    /// Build samples from rows of pixels; every row must have the same length.
    pub fn from_rows(rows: &[Vec<[u8; 3]>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(PaletteError::invalid("samples", "ragged rows"));
        }
        Self::new(width, height, rows.concat())
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        let (w, h) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Self::new(w as usize, h as usize, pixels)
    }

    /// Shrink `image` to a `size` × `size` working grid. Alpha is dropped,
    /// not composited, and the aspect ratio is not preserved.
    pub fn subsample(image: &DynamicImage, size: u32, filter: SampleFilter) -> Result<Self> {
        if size == 0 {
            return Err(PaletteError::invalid("subsampling_size", size));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(PaletteError::invalid(
                "image",
                format!("{}x{}", image.width(), image.height()),
            ));
        }
        let rgb = image.to_rgb8();
        let resized = image::imageops::resize(&rgb, size, size, filter.into());
        Self::from_rgb_image(&resized)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Pixel `index` as a real-valued color vector.
    #[inline]
    pub fn color(&self, index: usize) -> Vector3<f64> {
        let [r, g, b] = self.pixels[index];
        Vector3::new(r as f64, g as f64, b as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn rejects_zero_area_and_mismatched_buffers() {
        assert!(Samples::new(0, 4, vec![]).is_err());
        assert!(Samples::new(2, 2, vec![[0, 0, 0]; 3]).is_err());
        assert!(Samples::from_rows(&[vec![[0, 0, 0]], vec![]]).is_err());
        assert!(Samples::from_rows(&[]).is_err());
    }

    #[test]
    fn subsample_produces_a_square_working_grid() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            100,
            40,
            Rgba([10, 20, 30, 0]),
        ));
        let samples = Samples::subsample(&img, 24, SampleFilter::Nearest).unwrap();
        assert_eq!((samples.width(), samples.height()), (24, 24));
        assert!(samples.pixels().iter().all(|p| *p == [10, 20, 30]));
    }

    #[test]
    fn subsample_rejects_zero_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert!(Samples::subsample(&img, 0, SampleFilter::default()).is_err());
    }
}
