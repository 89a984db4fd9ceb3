//! Asset catalog: parts, their mesh entries, and per-mesh material options
//!
//! The catalog is loaded once at startup and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::config::{self, DocumentFormat};
use crate::visibility::ENGRAVING_TAG;

/// Slot name → material name
pub type SlotMaterials = BTreeMap<String, String>;

/// Option name (e.g. `black`) → slot bindings
pub type MaterialOptions = BTreeMap<String, SlotMaterials>;

/// A mesh entry inside a part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshEntry {
    /// Material slots in primitive order (`slot1`, `slot2`, ...)
    #[serde(default)]
    pub material_slots: Vec<String>,
    /// Tags controlling conditional visibility
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl MeshEntry {
    /// Create a mesh entry from slots and tags
    pub fn new<S, T>(slots: S, tags: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            material_slots: slots.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the entry carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A loadable part (one model file)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Model file, resolved by the host's loader
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Mesh entries keyed by mesh id
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
}

/// Every part of the product plus the material option table
///
/// Mesh ids are expected to be unique across parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCatalog {
    /// Parts keyed by model id
    #[serde(default)]
    pub models: BTreeMap<String, Part>,
    /// Mesh id → option name → slot bindings
    #[serde(default)]
    pub material_configs: BTreeMap<String, MaterialOptions>,
}

impl AssetCatalog {
    /// Load a catalog document (`.json`, `.toml` or `.ron`)
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog: Self = config::load_document(path)?;
        log::info!(
            "Loaded asset catalog from {}: {} parts, {} mesh entries",
            path.display(),
            catalog.models.len(),
            catalog.mesh_entries().count()
        );
        Ok(catalog)
    }

    /// Parse a JSON catalog document
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(config::parse_document(json, DocumentFormat::Json)?)
    }

    /// Add a part
    pub fn with_part(mut self, model_id: impl Into<String>, part: Part) -> Self {
        self.models.insert(model_id.into(), part);
        self
    }

    /// Add a material option for a mesh
    pub fn with_material_option(
        mut self,
        mesh_id: impl Into<String>,
        option: impl Into<String>,
        slots: SlotMaterials,
    ) -> Self {
        self.material_configs
            .entry(mesh_id.into())
            .or_default()
            .insert(option.into(), slots);
        self
    }

    /// Every mesh entry across all parts
    pub fn mesh_entries(&self) -> impl Iterator<Item = (&str, &MeshEntry)> {
        self.models
            .values()
            .flat_map(|part| part.meshes.iter().map(|(id, entry)| (id.as_str(), entry)))
    }

    /// Look up a mesh entry by id
    pub fn mesh(&self, mesh_id: &str) -> Option<&MeshEntry> {
        self.models.values().find_map(|part| part.meshes.get(mesh_id))
    }

    /// Every tag used by any mesh entry, sorted
    pub fn available_tags(&self) -> BTreeSet<&str> {
        self.mesh_entries()
            .flat_map(|(_, entry)| entry.tags.iter().map(String::as_str))
            .collect()
    }

    /// Mesh ids carrying the engraving tag
    pub fn engraving_meshes(&self) -> impl Iterator<Item = &str> {
        self.mesh_entries()
            .filter(|(_, entry)| entry.has_tag(ENGRAVING_TAG))
            .map(|(id, _)| id)
    }

    /// The material option table
    pub const fn available_material_configs(&self) -> &BTreeMap<String, MaterialOptions> {
        &self.material_configs
    }

    /// Options available for one mesh
    pub fn material_options(&self, mesh_id: &str) -> Option<&MaterialOptions> {
        self.material_configs.get(mesh_id)
    }

    /// Slot bindings of one option
    pub fn material_option(&self, mesh_id: &str, option: &str) -> Option<&SlotMaterials> {
        self.material_options(mesh_id)?.get(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET_JSON: &str = r#"{
        "models": {
            "part_model": {
                "name": "Grip",
                "file": "grip.glb",
                "meshes": {
                    "grip_mlok": { "materialSlots": ["slot1", "slot2"], "tags": ["mlok"] },
                    "grip_picatinny": { "materialSlots": ["slot1", "slot2"], "tags": ["picatinny"] },
                    "grip_plate": { "materialSlots": ["slot1"], "tags": ["engraving", "picatinny"] }
                }
            }
        },
        "materialConfigs": {
            "grip_mlok": {
                "black": { "slot1": "grip_black" },
                "sand": { "slot1": "grip_sand" }
            }
        }
    }"#;

    #[test]
    fn test_parse_asset_catalog() {
        let catalog = AssetCatalog::from_json_str(ASSET_JSON).unwrap();
        assert_eq!(catalog.mesh_entries().count(), 3);

        let mlok = catalog.mesh("grip_mlok").unwrap();
        assert_eq!(mlok.material_slots, vec!["slot1", "slot2"]);
        assert!(mlok.has_tag("mlok"));

        assert_eq!(
            catalog.material_option("grip_mlok", "sand").unwrap()["slot1"],
            "grip_sand"
        );
        assert!(catalog.material_option("grip_mlok", "kaki").is_none());
    }

    #[test]
    fn test_available_tags_and_engraving_meshes() {
        let catalog = AssetCatalog::from_json_str(ASSET_JSON).unwrap();
        let tags: Vec<_> = catalog.available_tags().into_iter().collect();
        assert_eq!(tags, vec!["engraving", "mlok", "picatinny"]);

        let engraving: Vec<_> = catalog.engraving_meshes().collect();
        assert_eq!(engraving, vec!["grip_plate"]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let catalog = AssetCatalog::from_json_str("{}").unwrap();
        assert_eq!(catalog.mesh_entries().count(), 0);
        assert!(catalog.available_tags().is_empty());
    }
}
