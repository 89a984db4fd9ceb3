//! Boundary to the host renderer
//!
//! The engine never touches a scene graph directly. Everything it decides
//! is pushed through [`ApplianceLayer`], which the host implements on top
//! of its renderer.

use serde::{Deserialize, Serialize};

use crate::engraving::EngravingMaps;
use crate::material::PbrMaterialParams;

/// How engraving maps are bound onto a surface material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingBinding {
    /// Normal map level
    pub bump_level: f32,
    /// Ambient texture strength
    pub ambient_strength: f32,
    /// Opacity is read from the RGB luminance of the alpha map
    pub alpha_from_rgb: bool,
    /// Alpha below this is discarded
    pub alpha_cutoff: f32,
    /// Ambient map is sampled in linear space
    pub ambient_linear: bool,
    /// Normal map is sampled in linear space
    pub normal_linear: bool,
    /// Flip maps vertically
    pub v_flip: bool,
    /// Invert the normal map X channel
    pub invert_normal_x: bool,
    /// Invert the normal map Y channel
    pub invert_normal_y: bool,
}

impl Default for EngravingBinding {
    fn default() -> Self {
        Self {
            bump_level: 2.8,
            ambient_strength: 1.0,
            alpha_from_rgb: true,
            alpha_cutoff: 0.0,
            ambient_linear: true,
            normal_linear: true,
            v_flip: false,
            invert_normal_x: false,
            invert_normal_y: false,
        }
    }
}

/// Host renderer operations the engine drives
///
/// Instance names follow the host's split convention (see
/// [`crate::scene::SceneIndex`]). Maps passed to
/// [`ApplianceLayer::bind_engraving_maps`] are read-only snapshots; the
/// host copies what it needs and may drop them once the call returns.
pub trait ApplianceLayer {
    /// Show or hide a rendered instance
    fn set_mesh_enabled(&mut self, instance: &str, enabled: bool);

    /// Bind a material to a rendered instance
    fn apply_material(&mut self, instance: &str, material: &PbrMaterialParams);

    /// Refresh a material wherever it is bound
    fn update_material(&mut self, material: &PbrMaterialParams);

    /// Attach engraving maps to a surface
    fn bind_engraving_maps(&mut self, instance: &str, maps: &EngravingMaps, binding: &EngravingBinding);

    /// Remove engraving maps from a surface
    fn detach_engraving_maps(&mut self, instance: &str);
}

/// One call received by a [`RecordingAppliance`]
#[derive(Debug, Clone, PartialEq)]
pub enum ApplianceCall {
    /// `set_mesh_enabled`
    SetMeshEnabled {
        /// Instance name
        instance: String,
        /// New state
        enabled: bool,
    },
    /// `apply_material`
    ApplyMaterial {
        /// Instance name
        instance: String,
        /// Material parameters
        material: Box<PbrMaterialParams>,
    },
    /// `update_material`
    UpdateMaterial {
        /// Material parameters
        material: Box<PbrMaterialParams>,
    },
    /// `bind_engraving_maps`
    BindEngravingMaps {
        /// Instance name
        instance: String,
        /// Canvas dimensions of the bound maps
        dimensions: (u32, u32),
        /// Binding conventions
        binding: EngravingBinding,
    },
    /// `detach_engraving_maps`
    DetachEngravingMaps {
        /// Instance name
        instance: String,
    },
}

/// Appliance that records every call, for headless hosts and tests
#[derive(Debug, Default)]
pub struct RecordingAppliance {
    /// Calls in arrival order
    pub calls: Vec<ApplianceCall>,
    /// Last maps bound, kept for export
    pub last_maps: Option<EngravingMaps>,
}

impl RecordingAppliance {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded calls, leaving the log empty
    pub fn drain(&mut self) -> Vec<ApplianceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Last enabled state sent for an instance
    pub fn mesh_enabled(&self, instance: &str) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            ApplianceCall::SetMeshEnabled { instance: name, enabled } if name == instance => Some(*enabled),
            _ => None,
        })
    }

    /// Last material bound to an instance
    pub fn material_of(&self, instance: &str) -> Option<&PbrMaterialParams> {
        self.calls.iter().rev().find_map(|call| match call {
            ApplianceCall::ApplyMaterial { instance: name, material } if name == instance => Some(material.as_ref()),
            _ => None,
        })
    }
}

impl ApplianceLayer for RecordingAppliance {
    fn set_mesh_enabled(&mut self, instance: &str, enabled: bool) {
        self.calls.push(ApplianceCall::SetMeshEnabled {
            instance: instance.to_string(),
            enabled,
        });
    }

    fn apply_material(&mut self, instance: &str, material: &PbrMaterialParams) {
        self.calls.push(ApplianceCall::ApplyMaterial {
            instance: instance.to_string(),
            material: Box::new(material.clone()),
        });
    }

    fn update_material(&mut self, material: &PbrMaterialParams) {
        self.calls.push(ApplianceCall::UpdateMaterial {
            material: Box::new(material.clone()),
        });
    }

    fn bind_engraving_maps(&mut self, instance: &str, maps: &EngravingMaps, binding: &EngravingBinding) {
        self.calls.push(ApplianceCall::BindEngravingMaps {
            instance: instance.to_string(),
            dimensions: maps.dimensions(),
            binding: binding.clone(),
        });
        self.last_maps = Some(maps.clone());
    }

    fn detach_engraving_maps(&mut self, instance: &str) {
        self.calls.push(ApplianceCall::DetachEngravingMaps {
            instance: instance.to_string(),
        });
        self.last_maps = None;
    }
}
