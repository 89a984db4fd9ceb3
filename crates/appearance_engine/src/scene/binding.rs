//! Material option binding and engraving surface aspect

use crate::assets::{AssetCatalog, MaterialCatalog};
use crate::foundation::math::plane_aspect;

use super::{primitive_name, slot_index, SceneIndex};

/// A material bound to the instances carrying one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBinding {
    /// Slot name (`slot1`..`slot4`)
    pub slot: String,
    /// Primitive index of the slot
    pub index: usize,
    /// Material to apply
    pub material: String,
    /// Scene instances receiving the material
    pub instances: Vec<String>,
}

/// Work out which instances receive which material for a mesh option
///
/// Each slot targets `{mesh}_primitive{index}`; a `slot1` binding on a mesh
/// that was never split falls back to the bare mesh instance. Unknown
/// meshes, options, slots and materials produce no binding.
pub fn resolve_material_config(
    assets: &AssetCatalog,
    materials: &MaterialCatalog,
    scene: &SceneIndex,
    mesh_id: &str,
    option: &str,
) -> Vec<SlotBinding> {
    let Some(slots) = assets.material_option(mesh_id, option) else {
        log::warn!("No material option '{option}' for mesh '{mesh_id}'");
        return Vec::new();
    };

    let mut bindings = Vec::new();
    for (slot, material) in slots {
        let Some(index) = slot_index(slot) else {
            log::warn!("Mesh '{mesh_id}' option '{option}': unknown slot '{slot}'");
            continue;
        };
        if !materials.contains(material) {
            log::warn!("Mesh '{mesh_id}' option '{option}': unknown material '{material}'");
            continue;
        }

        let primitive = primitive_name(mesh_id, index);
        let instances = if scene.contains(&primitive) {
            vec![primitive]
        } else if index == 0 && scene.contains(mesh_id) {
            vec![mesh_id.to_string()]
        } else {
            log::warn!("Mesh '{mesh_id}': no rendered instance for {slot}");
            continue;
        };

        bindings.push(SlotBinding {
            slot: slot.clone(),
            index,
            material: material.clone(),
            instances,
        });
    }
    bindings
}

/// Aspect of the first engraving surface with known extents
///
/// The surface is taken to lie in the plane of the two largest bounding box
/// dimensions.
pub fn mesh_bounding_aspect(assets: &AssetCatalog, scene: &SceneIndex) -> Option<f32> {
    assets.engraving_meshes().find_map(|mesh_id| {
        scene
            .instances_for(mesh_id)
            .find_map(|instance| instance.extents)
            .map(plane_aspect)
    })
}
