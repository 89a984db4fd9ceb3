//! # Appearance Engine
//!
//! The configuration core of a 3D product configurator. It turns a small set
//! of user choices into everything the renderer needs to display a product
//! variant.
//!
//! ## Features
//!
//! - **Tag Visibility**: Mesh entries are shown or hidden from active tags
//! - **Material Inheritance**: Parent/child material definitions with per-property
//!   independence tracking
//! - **Engraving Synthesis**: Alpha, ambient-occlusion and normal maps rasterized
//!   from free text
//! - **Appliance Boundary**: A single trait the host renderer implements to
//!   receive the results
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use appearance_engine::prelude::*;
//!
//! fn run(appliance: &mut dyn ApplianceLayer) -> Result<(), ConfiguratorError> {
//!     let assets = AssetCatalog::load_from_file("resources/catalog/asset.json")?;
//!     let materials = MaterialCatalog::load_from_file("resources/catalog/materials.json")?;
//!     let scene = SceneIndex::from_catalog(&assets);
//!
//!     let mut session = ConfiguratorSession::new(
//!         ConfiguratorConfig::default(),
//!         assets,
//!         materials,
//!         scene,
//!     );
//!     session.initialize(appliance);
//!     session.set_option("picatinny", appliance);
//!     session.set_engraving_text("ALPHA-1", appliance);
//!     Ok(())
//! }
//! ```

pub mod appliance;
pub mod assets;
pub mod config;
pub mod engraving;
pub mod error;
pub mod foundation;
pub mod material;
pub mod scene;
pub mod session;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use error::ConfiguratorError;
pub use session::ConfiguratorSession;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        appliance::{ApplianceLayer, EngravingBinding},
        assets::{AssetCatalog, MaterialCatalog, MaterialDefinition, MeshEntry, Part},
        config::{Config, ConfiguratorConfig, EngravingConfig, FontStyle},
        engraving::{EngravingMaps, EngravingState, EngravingSynthesizer, FontLibrary, RasterMap},
        material::{
            IndependenceSet, PbrMaterialParams, PropertyName, PropertyValue, ResolvedMaterial,
        },
        scene::{SceneIndex, SceneInstance},
        visibility::{resolve_visibility, TagState},
        ConfiguratorError, ConfiguratorSession,
    };
}
