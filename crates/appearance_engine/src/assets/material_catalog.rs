//! Material catalog: named PBR material definitions with optional parents
//!
//! Documents use the configurator's flat layout, one object per material:
//!
//! ```json
//! { "materials": {
//!     "grip_black":      { "type": "pbr", "parent": "none", "baseColor": "#111111" },
//!     "grip_black_worn": { "type": "pbr", "parent": "grip_black", "roughness": 0.8 }
//! } }
//! ```
//!
//! Only keys present in a definition are "own" values. Keys that are not
//! recognized properties are carried along untouched so an export keeps them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::config::{self, ConfigError, DocumentFormat};
use crate::material::{PropertyName, PropertyValue, RawValue, Rgb};

/// Parent value meaning "no parent"
pub const NO_PARENT: &str = "none";

/// A single material definition
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDefinition {
    /// Material type tag (`pbr` for everything the configurator creates)
    pub kind: Option<String>,
    parent: Option<String>,
    properties: BTreeMap<PropertyName, PropertyValue>,
    extra: BTreeMap<String, RawValue>,
}

impl Default for MaterialDefinition {
    fn default() -> Self {
        Self {
            kind: Some("pbr".to_string()),
            parent: None,
            properties: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl MaterialDefinition {
    /// Empty definition with no parent
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting values for a material created from the editor
    pub fn starter() -> Self {
        Self::new()
            .with(PropertyName::BaseColor, PropertyValue::Color(Rgb::WHITE))
            .with(PropertyName::Metallic, PropertyValue::Scalar(0.0))
            .with(PropertyName::Roughness, PropertyValue::Scalar(0.5))
            .with(PropertyName::Alpha, PropertyValue::Scalar(1.0))
    }

    /// Builder: set the parent
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.set_parent(Some(parent.into()));
        self
    }

    /// Builder: set an own value (ignored if the kind does not match)
    pub fn with(mut self, property: PropertyName, value: PropertyValue) -> Self {
        self.set_own(property, value);
        self
    }

    /// Parent material name, `None` when the definition has no parent
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Replace the parent link; `"none"` and blank names clear it
    pub fn set_parent(&mut self, parent: Option<String>) {
        self.parent = parent.filter(|p| !p.trim().is_empty() && p != NO_PARENT);
    }

    /// Own value of a property, if this definition stores one
    pub fn own(&self, property: PropertyName) -> Option<&PropertyValue> {
        self.properties.get(&property)
    }

    /// Whether this definition stores its own value for `property`
    pub fn has_own(&self, property: PropertyName) -> bool {
        self.properties.contains_key(&property)
    }

    /// Store an own value; returns `false` if the value kind does not fit
    pub fn set_own(&mut self, property: PropertyName, value: PropertyValue) -> bool {
        if !value.matches(property.kind()) {
            log::warn!("Ignoring {value} for {property}: wrong value kind");
            return false;
        }
        self.properties.insert(property, value);
        true
    }

    /// Remove an own value, returning it
    pub fn remove_own(&mut self, property: PropertyName) -> Option<PropertyValue> {
        self.properties.remove(&property)
    }

    /// Iterate over own values
    pub fn own_values(&self) -> impl Iterator<Item = (PropertyName, &PropertyValue)> {
        self.properties.iter().map(|(name, value)| (*name, value))
    }

    fn from_raw(name: &str, raw: RawMaterialDefinition) -> Self {
        let mut definition = Self {
            kind: raw.kind,
            parent: None,
            properties: BTreeMap::new(),
            extra: BTreeMap::new(),
        };
        definition.set_parent(raw.parent);

        for (key, value) in raw.fields {
            let Ok(property) = key.parse::<PropertyName>() else {
                definition.extra.insert(key, value);
                continue;
            };
            match PropertyValue::from_raw(property.kind(), &value) {
                Some(typed) => {
                    definition.properties.insert(property, typed);
                }
                None => log::warn!("Material '{name}': dropping invalid {property} value {value:?}"),
            }
        }
        definition
    }

    fn to_raw(&self) -> RawMaterialDefinition {
        let mut fields = self.extra.clone();
        for (property, value) in &self.properties {
            fields.insert(property.as_str().to_string(), value.to_raw());
        }
        RawMaterialDefinition {
            kind: self.kind.clone(),
            parent: Some(self.parent.clone().unwrap_or_else(|| NO_PARENT.to_string())),
            fields,
        }
    }
}

/// Serialized form of a definition
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawMaterialDefinition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(flatten)]
    fields: BTreeMap<String, RawValue>,
}

/// Serialized form of a catalog
#[derive(Debug, Default, Serialize, Deserialize)]
struct MaterialDocument {
    #[serde(default)]
    materials: BTreeMap<String, RawMaterialDefinition>,
}

/// Catalog of named material definitions
///
/// Every mutation bumps a revision counter, which lets callers detect that
/// the catalog changed between two operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, MaterialDefinition>,
    revision: u64,
}

impl MaterialCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog document (`.json` or `.toml`)
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let document: MaterialDocument = config::load_document(path)?;
        let catalog = Self::from_document(document);
        log::info!("Loaded {} materials from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a JSON catalog document
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: MaterialDocument = config::parse_document(json, DocumentFormat::Json)?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: MaterialDocument) -> Self {
        let materials = document
            .materials
            .into_iter()
            .map(|(name, raw)| {
                let definition = MaterialDefinition::from_raw(&name, raw);
                (name, definition)
            })
            .collect();
        Self { materials, revision: 0 }
    }

    fn to_document(&self) -> MaterialDocument {
        MaterialDocument {
            materials: self
                .materials
                .iter()
                .map(|(name, definition)| (name.clone(), definition.to_raw()))
                .collect(),
        }
    }

    /// Export as pretty JSON for the persistence sink
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        config::render_document(&self.to_document(), DocumentFormat::Json)
    }

    /// Save the catalog (`.json` or `.toml`)
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        config::save_document(&self.to_document(), path)
    }

    /// Look up a definition
    pub fn get(&self, name: &str) -> Option<&MaterialDefinition> {
        self.materials.get(name)
    }

    /// Whether a material exists
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Material names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// Number of materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Mutation counter
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Insert or replace a definition
    pub fn insert(&mut self, name: impl Into<String>, definition: MaterialDefinition) {
        self.materials.insert(name.into(), definition);
        self.revision += 1;
    }

    /// Create a new material with the editor's starting values
    pub fn create_material(&mut self, name: &str) -> Result<(), CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidName(name.to_string()));
        }
        if self.contains(name) {
            return Err(CatalogError::DuplicateMaterial(name.to_string()));
        }
        self.insert(name, MaterialDefinition::starter());
        log::info!("Created material '{name}'");
        Ok(())
    }

    /// Change the parent link of a material
    ///
    /// Cycles are accepted here; resolution treats a cycle as "no parent".
    pub fn set_parent(&mut self, name: &str, parent: Option<&str>) -> Result<(), CatalogError> {
        let definition = self
            .materials
            .get_mut(name)
            .ok_or_else(|| CatalogError::UnknownMaterial(name.to_string()))?;
        definition.set_parent(parent.map(str::to_string));
        self.revision += 1;
        Ok(())
    }

    /// Store an own value on a material; `false` if the material is unknown or the kind is wrong
    pub fn set_property(&mut self, name: &str, property: PropertyName, value: PropertyValue) -> bool {
        let Some(definition) = self.materials.get_mut(name) else {
            log::warn!("Cannot set {property} on unknown material '{name}'");
            return false;
        };
        let stored = definition.set_own(property, value);
        if stored {
            self.revision += 1;
        }
        stored
    }

    /// Remove an own value from a material, returning it
    pub fn clear_property(&mut self, name: &str, property: PropertyName) -> Option<PropertyValue> {
        let removed = self.materials.get_mut(name)?.remove_own(property);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r##"{
        "materials": {
            "grip_black": { "type": "pbr", "parent": "none", "baseColor": "#111111", "metallic": 0, "roughness": 0.6 },
            "grip_black_worn": { "type": "pbr", "parent": "grip_black", "roughness": 0.9, "albedoTexture": "None", "customNote": "keep me" },
            "broken": { "parent": "grip_black", "metallic": "shiny", "lightmapUVSet": 1 }
        }
    }"##;

    #[test]
    fn test_parse_catalog() {
        let catalog = MaterialCatalog::from_json_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.len(), 3);

        let black = catalog.get("grip_black").unwrap();
        assert_eq!(black.parent(), None);
        assert_eq!(
            black.own(PropertyName::BaseColor),
            Some(&PropertyValue::Color(Rgb::new(0x11, 0x11, 0x11)))
        );
        assert_eq!(black.own(PropertyName::Metallic), Some(&PropertyValue::Scalar(0.0)));

        let worn = catalog.get("grip_black_worn").unwrap();
        assert_eq!(worn.parent(), Some("grip_black"));
        assert!(!worn.has_own(PropertyName::BaseColor));
        assert_eq!(worn.own(PropertyName::AlbedoTexture), Some(&PropertyValue::Texture(None)));
    }

    #[test]
    fn test_invalid_values_are_dropped() {
        let catalog = MaterialCatalog::from_json_str(CATALOG_JSON).unwrap();
        let broken = catalog.get("broken").unwrap();
        assert!(!broken.has_own(PropertyName::Metallic));
        assert_eq!(broken.own(PropertyName::LightmapUvSet), Some(&PropertyValue::Index(1)));
    }

    #[test]
    fn test_export_keeps_unknown_keys_and_parent() {
        let catalog = MaterialCatalog::from_json_str(CATALOG_JSON).unwrap();
        let exported = catalog.to_json_string().unwrap();
        let reparsed = MaterialCatalog::from_json_str(&exported).unwrap();

        assert_eq!(reparsed.get("grip_black_worn"), catalog.get("grip_black_worn"));
        assert!(exported.contains("\"customNote\": \"keep me\""));
        assert!(exported.contains("\"parent\": \"none\""));
    }

    #[test]
    fn test_create_material_rejects_duplicates() {
        let mut catalog = MaterialCatalog::new();
        catalog.create_material("trim").unwrap();
        assert!(matches!(
            catalog.create_material("trim"),
            Err(CatalogError::DuplicateMaterial(_))
        ));
        assert!(matches!(catalog.create_material("  "), Err(CatalogError::InvalidName(_))));

        let trim = catalog.get("trim").unwrap();
        assert_eq!(trim.own(PropertyName::Roughness), Some(&PropertyValue::Scalar(0.5)));
        assert_eq!(trim.kind.as_deref(), Some("pbr"));
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut catalog = MaterialCatalog::new();
        catalog.insert("a", MaterialDefinition::new());
        let before = catalog.revision();

        assert!(catalog.set_property("a", PropertyName::Alpha, PropertyValue::Scalar(0.5)));
        assert!(!catalog.set_property("a", PropertyName::Alpha, PropertyValue::Flag(true)));
        assert!(!catalog.set_property("missing", PropertyName::Alpha, PropertyValue::Scalar(0.5)));
        assert_eq!(catalog.revision(), before + 1);

        assert_eq!(catalog.clear_property("a", PropertyName::Alpha), Some(PropertyValue::Scalar(0.5)));
        assert_eq!(catalog.clear_property("a", PropertyName::Alpha), None);
        assert_eq!(catalog.revision(), before + 2);
    }

    #[test]
    fn test_set_parent_none_clears_link() {
        let mut catalog = MaterialCatalog::from_json_str(CATALOG_JSON).unwrap();
        catalog.set_parent("grip_black_worn", Some("none")).unwrap();
        assert_eq!(catalog.get("grip_black_worn").unwrap().parent(), None);
        assert!(catalog.set_parent("ghost", None).is_err());
    }
}
