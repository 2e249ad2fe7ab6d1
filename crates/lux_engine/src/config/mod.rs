//! File-backed configuration
//!
//! Anything serializable can be read from or written to a `.toml` or `.ron`
//! file; the extension picks the format. Scene descriptions and the engine
//! settings both go through here.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable value that can live in a TOML or RON file
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load from a file, choosing the format by extension
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loading {} from {}", std::any::type_name::<Self>(), path.display());
        Self::from_str_as(&contents, format)
    }

    /// Parse text in an explicit format
    fn from_str_as(contents: &str, format: Format) -> Result<Self, ConfigError> {
        match format {
            Format::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Render as text in an explicit format
    fn to_string_as(&self, format: Format) -> Result<String, ConfigError> {
        match format {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Save to a file, choosing the format by extension
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_as(Format::of(path)?)?;
        std::fs::write(path, contents)?;
        log::debug!("Saved {} to {}", std::any::type_name::<Self>(), path.display());
        Ok(())
    }
}

/// On-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.toml`
    Toml,
    /// `.ron`
    Ron,
}

impl Format {
    /// Format implied by a file extension
    pub fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
