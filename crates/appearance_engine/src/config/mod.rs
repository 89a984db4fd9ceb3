//! Configuration system
//!
//! Settings and catalog documents are plain serde types. The file format is
//! picked from the extension: `.toml` and `.ron` for settings, plus `.json`
//! for the catalogs exported by the configurator front end.

mod settings;

pub use serde::{Deserialize, Serialize};
pub use settings::{ConfiguratorConfig, EngravingConfig, FontStyle};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        load_document(path)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        save_document(self, path)
    }
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// TOML
    Toml,
    /// Rusty Object Notation
    Ron,
    /// JSON
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse a document from text in the given format
pub fn parse_document<T: DeserializeOwned>(
    contents: &str,
    format: DocumentFormat,
) -> Result<T, ConfigError> {
    match format {
        DocumentFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        DocumentFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        DocumentFormat::Json => {
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }
}

/// Render a document to text in the given format
pub fn render_document<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String, ConfigError> {
    match format {
        DocumentFormat::Toml => {
            toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
        DocumentFormat::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string())),
        DocumentFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
    }
}

/// Load any serde document, choosing the format from the extension
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path)?;
    log::debug!("Parsing {:?} document from {}", format, path.display());
    parse_document(&contents, format)
}

/// Save any serde document, choosing the format from the extension
pub fn save_document<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let contents = render_document(value, DocumentFormat::from_path(path)?)?;
    std::fs::write(path, contents).map_err(ConfigError::Io)
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.toml")).unwrap(), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.ron")).unwrap(), DocumentFormat::Ron);
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")).unwrap(), DocumentFormat::Json);
        assert!(matches!(
            DocumentFormat::from_path(Path::new("a.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_settings_round_trip_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configurator.toml");

        let mut config = ConfiguratorConfig::default();
        config.engraving.blur_percent = 0.02;
        config.save_to_file(&path).unwrap();

        let loaded = ConfiguratorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.engraving.blur_percent, 0.02);
        assert_eq!(loaded.engraving.fonts.len(), config.engraving.fonts.len());
    }

    #[test]
    fn test_settings_load_from_ron() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        write!(file, "(engraving: (base_resolution: 256))").unwrap();

        let loaded = ConfiguratorConfig::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.engraving.base_resolution, 256);
        // Missing fields fall back to defaults
        assert_eq!(loaded.engraving.min_font_px, 24.0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ConfiguratorConfig::load_from_file("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
