//! Asset management system
//!
//! The two catalogs the resolvers read: the asset catalog (parts, mesh
//! entries, material options) and the material catalog (named definitions
//! with parent links).

pub mod asset_catalog;
pub mod material_catalog;

pub use asset_catalog::{AssetCatalog, MaterialOptions, MeshEntry, Part, SlotMaterials};
pub use material_catalog::{MaterialCatalog, MaterialDefinition, NO_PARENT};

use thiserror::Error;

use crate::config::ConfigError;

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog document could not be read or parsed
    #[error("Catalog document error: {0}")]
    Config(#[from] ConfigError),

    /// A referenced material does not exist
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    /// A material with this name already exists
    #[error("Material already exists: {0}")]
    DuplicateMaterial(String),

    /// Material names must not be blank
    #[error("Invalid material name: '{0}'")]
    InvalidName(String),
}
