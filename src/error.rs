//! Error types for palettely

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for palettely operations
pub type Result<T> = std::result::Result<T, PaletteError>;

/// Errors surfaced by palette extraction and its collaborators
#[derive(Error, Debug)]
pub enum PaletteError {
    /// A caller supplied a value the operation cannot work with
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Eigen-decomposition of a cluster covariance failed
    #[error("Numeric failure: {message}")]
    NumericFailure { message: String },

    /// Image file could not be decoded
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<image::ImageError>,
    },

    /// File system access failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be read or written
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl PaletteError {
    /// Create an invalid parameter error
    pub fn invalid(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a numeric failure error
    pub fn numeric(message: impl Into<String>) -> Self {
        Self::NumericFailure {
            message: message.into(),
        }
    }

    /// Create an image load error with context
    pub fn image_load(message: impl Into<String>, source: image::ImageError) -> Self {
        Self::ImageLoad {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying with different input (another image, other
    /// parameters) can succeed. Numeric failures abort a build outright.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PaletteError::InvalidParameter { .. }
                | PaletteError::ImageLoad { .. }
                | PaletteError::Io { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message_names_the_value() {
        let err = PaletteError::invalid("target_colors", 0);
        assert_eq!(err.to_string(), "Invalid parameter: target_colors = 0");
        assert!(err.is_recoverable());
    }

    #[test]
    fn numeric_failure_is_not_recoverable() {
        assert!(!PaletteError::numeric("eigen decomposition diverged").is_recoverable());
    }
}
