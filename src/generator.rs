//! End-to-end palette extraction: decode, sample, build, collect, sort.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError};
use palette::Srgb;
use tracing::{debug, info};

use crate::metric::{sort_palette, truncate};
use crate::tree::{PaletteEntry, build, collect};
use crate::{GeneratorConfig, PaletteError, Result, Samples};

/// File extensions picked up by directory batches.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Extracts palettes with a fixed configuration. Every call builds its own
/// tree, so one generator can serve many images, also concurrently.
#[derive(Debug, Clone, Default)]
pub struct PaletteGenerator {
    config: GeneratorConfig,
}

impl PaletteGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Working image for `image` under this configuration.
    pub fn samples(&self, image: &DynamicImage) -> Result<Samples> {
        Samples::subsample(image, self.config.subsampling_size, self.config.filter)
    }

    /// Raw leaves of the partition tree, unsorted and untruncated.
    pub fn extract(&self, samples: &Samples) -> Result<Vec<PaletteEntry>> {
        let tree = build(samples, self.config.colors)?;
        Ok(collect(&tree))
    }

    /// Sorted, truncated palette of an already decoded image.
    pub fn generate_from_image(&self, image: &DynamicImage) -> Result<Vec<Srgb<u8>>> {
        let samples = self.samples(image)?;
        let entries = self.extract(&samples)?;
        let mut colors: Vec<Srgb<u8>> = entries.iter().map(PaletteEntry::color).collect();
        sort_palette(&mut colors, &self.config.sort_by);
        truncate(&mut colors, self.config.top);
        info!(
            requested = self.config.colors,
            extracted = entries.len(),
            reported = colors.len(),
            sort_by = %self.config.sort_by,
            "generated palette"
        );
        Ok(colors)
    }

    /// Palette of an encoded image held in memory.
    pub fn generate_from_bytes(&self, bytes: &[u8]) -> Result<Vec<Srgb<u8>>> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| PaletteError::image_load("unable to decode image", e))?;
        self.generate_from_image(&image)
    }

    /// Palette of the image file at `path`.
    pub fn generate(&self, path: &Path) -> Result<Vec<Srgb<u8>>> {
        let image = open_image(path)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "decoded image");
        self.generate_from_image(&image)
    }

    /// Palettes of every `.jpg`, `.jpeg` and `.png` directly inside `dir`,
    /// in path order. Images are processed in parallel; the first failure
    /// fails the batch.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn generate_from_dir(&self, dir: &Path) -> Result<Vec<(PathBuf, Vec<Srgb<u8>>)>> {
        use rayon::prelude::*;

        let files = list_images(dir)?;
        info!(dir = %dir.display(), images = files.len(), "processing directory");
        files
            .into_par_iter()
            .map(|path| {
                let palette = self.generate(&path)?;
                Ok((path, palette))
            })
            .collect()
    }
}

/// Decode the image at `path`, mapping I/O problems to [`PaletteError::Io`].
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| match e {
        ImageError::IoError(io) => PaletteError::io(path, io),
        other => PaletteError::image_load(format!("cannot decode {}", path.display()), other),
    })
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Supported image files directly inside `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PaletteError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PaletteError::io(dir, e))?.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
