//! Configuration for palette generation.
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use palettely::GeneratorConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = GeneratorConfig::from_json_file(Path::new("palette.json"))?;
//!
//! // Or start from the defaults
//! let config = GeneratorConfig { colors: 8, ..GeneratorConfig::default() };
//! # Ok::<(), palettely::PaletteError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PaletteError, Result, SampleFilter, SortBy};

/// Default number of palette colors.
pub const DEFAULT_COLORS: usize = 20;

/// Default side of the square working image, in pixels.
pub const DEFAULT_SUBSAMPLING_SIZE: u32 = 24;

/// Parameters of one palette extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of colors to extract (tree leaves)
    pub colors: usize,

    /// Side of the square working image
    pub subsampling_size: u32,

    /// Resampling filter used to build the working image
    pub filter: SampleFilter,

    /// Order of the reported palette
    pub sort_by: SortBy,

    /// Report only the first `top` colors after sorting
    pub top: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
            subsampling_size: DEFAULT_SUBSAMPLING_SIZE,
            filter: SampleFilter::default(),
            sort_by: SortBy::default(),
            top: None,
        }
    }
}

impl GeneratorConfig {
    /// Reject values no extraction can run with.
    pub fn validate(&self) -> Result<()> {
        if self.colors < 1 {
            return Err(PaletteError::invalid("colors", self.colors));
        }
        if self.subsampling_size == 0 {
            return Err(PaletteError::invalid("subsampling_size", self.subsampling_size));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PaletteError::io(path, e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| PaletteError::Config {
            message: format!("cannot parse {}", path.display()),
            source: Some(e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| PaletteError::Config {
            message: "cannot serialize configuration".to_string(),
            source: Some(e),
        })?;
        std::fs::write(path, json).map_err(|e| PaletteError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"colors": 6, "sort_by": "eye_catching"}"#).unwrap();
        assert_eq!(config.colors, 6);
        assert_eq!(config.sort_by, SortBy::StandardDeviation);
        assert_eq!(config.subsampling_size, DEFAULT_SUBSAMPLING_SIZE);
        assert_eq!(config.filter, SampleFilter::CatmullRom);
    }

    #[test]
    fn nearest_to_serializes_with_its_target() {
        let config = GeneratorConfig {
            sort_by: SortBy::NearestTo([1, 2, 3]),
            filter: SampleFilter::Lanczos3,
            top: Some(4),
            ..GeneratorConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""sort_by":{"nearest_to":[1,2,3]}"#));
        let back: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn validate_rejects_zero_values() {
        let zero_colors = GeneratorConfig { colors: 0, ..GeneratorConfig::default() };
        assert!(zero_colors.validate().is_err());
        let zero_size = GeneratorConfig { subsampling_size: 0, ..GeneratorConfig::default() };
        assert!(zero_size.validate().is_err());
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("palettely-config-{}.json", std::process::id()));
        let config = GeneratorConfig { colors: 9, ..GeneratorConfig::default() };
        config.to_json_file(&path).unwrap();
        assert_eq!(GeneratorConfig::from_json_file(&path).unwrap(), config);
        std::fs::remove_file(&path).ok();
    }
}
