//! Rendered instance index
//!
//! The host renderer splits a mesh entry with several material slots into
//! one primitive per slot, named `{mesh}_primitive{index}`. [`SceneIndex`]
//! is the engine's view of those names, plus the bounding extents the host
//! knows about.

mod binding;

pub use binding::{mesh_bounding_aspect, resolve_material_config, SlotBinding};

use serde::{Deserialize, Serialize};

use crate::assets::AssetCatalog;
use crate::foundation::math::Vec3;

/// Separator between a mesh id and its primitive index
pub const PRIMITIVE_SUFFIX: &str = "_primitive";

/// Number of material slots addressable by name
pub const MAX_SLOTS: usize = 4;

/// Map a slot name (`slot1`..`slot4`) to its primitive index
pub fn slot_index(slot: &str) -> Option<usize> {
    let index: usize = slot.trim().strip_prefix("slot")?.parse().ok()?;
    (1..=MAX_SLOTS).contains(&index).then(|| index - 1)
}

/// Name of the primitive carrying a slot
pub fn primitive_name(mesh_id: &str, index: usize) -> String {
    format!("{mesh_id}{PRIMITIVE_SUFFIX}{index}")
}

/// A rendered scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInstance {
    /// Object name in the host scene
    pub name: String,
    /// Full bounding box size, when known
    #[serde(default)]
    pub extents: Option<Vec3>,
}

impl SceneInstance {
    /// Instance without known extents
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extents: None,
        }
    }

    /// Builder: set the bounding box size
    pub fn with_extents(mut self, extents: Vec3) -> Self {
        self.extents = Some(extents);
        self
    }
}

/// Names of every rendered instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneIndex {
    instances: Vec<SceneInstance>,
}

impl SceneIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Index following the host's split convention for every catalog mesh
    ///
    /// Single-slot meshes keep their bare name; multi-slot meshes get one
    /// primitive per slot.
    pub fn from_catalog(catalog: &AssetCatalog) -> Self {
        let mut index = Self::new();
        for (mesh_id, entry) in catalog.mesh_entries() {
            if entry.material_slots.len() > 1 {
                for slot in 0..entry.material_slots.len() {
                    index.add(SceneInstance::new(primitive_name(mesh_id, slot)));
                }
            } else {
                index.add(SceneInstance::new(mesh_id));
            }
        }
        log::debug!("Scene index built with {} instances", index.len());
        index
    }

    /// Add an instance, replacing any with the same name
    pub fn add(&mut self, instance: SceneInstance) {
        match self.instances.iter_mut().find(|existing| existing.name == instance.name) {
            Some(existing) => *existing = instance,
            None => self.instances.push(instance),
        }
    }

    /// Builder form of [`Self::add`]
    pub fn with_instance(mut self, instance: SceneInstance) -> Self {
        self.add(instance);
        self
    }

    /// Record the bounding size of an instance; `false` if it is unknown
    pub fn set_extents(&mut self, name: &str, extents: Vec3) -> bool {
        match self.instances.iter_mut().find(|instance| instance.name == name) {
            Some(instance) => {
                instance.extents = Some(extents);
                true
            }
            None => false,
        }
    }

    /// Look up an instance by exact name
    pub fn get(&self, name: &str) -> Option<&SceneInstance> {
        self.instances.iter().find(|instance| instance.name == name)
    }

    /// Whether an instance with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every instance rendering a mesh entry
    ///
    /// Matches the bare mesh id and every `{mesh}_primitive*` split.
    pub fn instances_for<'a>(&'a self, mesh_id: &'a str) -> impl Iterator<Item = &'a SceneInstance> + 'a {
        self.instances.iter().filter(move |instance| {
            instance.name == mesh_id
                || instance
                    .name
                    .strip_prefix(mesh_id)
                    .is_some_and(|rest| rest.starts_with(PRIMITIVE_SUFFIX))
        })
    }

    /// Iterate over all instances
    pub fn iter(&self) -> impl Iterator<Item = &SceneInstance> {
        self.instances.iter()
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MeshEntry, Part};

    #[test]
    fn test_slot_index_mapping() {
        assert_eq!(slot_index("slot1"), Some(0));
        assert_eq!(slot_index(" slot4 "), Some(3));
        assert_eq!(slot_index("slot0"), None);
        assert_eq!(slot_index("slot5"), None);
        assert_eq!(slot_index("primary"), None);
    }

    #[test]
    fn test_instances_for_matches_name_contract() {
        let scene = SceneIndex::new()
            .with_instance(SceneInstance::new("grip"))
            .with_instance(SceneInstance::new("grip_primitive0"))
            .with_instance(SceneInstance::new("grip_primitive1"))
            .with_instance(SceneInstance::new("grip_plate"))
            .with_instance(SceneInstance::new("gripper"));

        let names: Vec<_> = scene.instances_for("grip").map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["grip", "grip_primitive0", "grip_primitive1"]);
        assert_eq!(scene.instances_for("stock").count(), 0);
    }

    #[test]
    fn test_from_catalog_splits_multi_slot_meshes() {
        let mut part = Part::default();
        part.meshes.insert("body".into(), MeshEntry::new(["slot1", "slot2"], ["base"]));
        part.meshes.insert("plate".into(), MeshEntry::new(["slot1"], ["engraving"]));
        let catalog = AssetCatalog::default().with_part("part_model", part);

        let scene = SceneIndex::from_catalog(&catalog);
        assert!(scene.contains("body_primitive0"));
        assert!(scene.contains("body_primitive1"));
        assert!(!scene.contains("body"));
        assert!(scene.contains("plate"));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_set_extents() {
        let mut scene = SceneIndex::new().with_instance(SceneInstance::new("plate"));
        assert!(scene.set_extents("plate", Vec3::new(4.0, 1.0, 0.1)));
        assert!(!scene.set_extents("missing", Vec3::new(1.0, 1.0, 1.0)));
        assert_eq!(scene.get("plate").and_then(|i| i.extents), Some(Vec3::new(4.0, 1.0, 0.1)));
    }
}
