//! Top-level error type

use thiserror::Error;

use crate::assets::CatalogError;
use crate::config::ConfigError;
use crate::engraving::{EngravingError, FontError};

/// Any error the configurator can report
#[derive(Error, Debug)]
pub enum ConfiguratorError {
    /// Settings file error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog load or mutation error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Font registration error
    #[error(transparent)]
    Font(#[from] FontError),

    /// Engraving synthesis error
    #[error(transparent)]
    Engraving(#[from] EngravingError),
}
