//! Configurator session
//!
//! Owns the catalogs and every piece of user state, and turns each user
//! action into the minimal set of appliance calls.

use std::collections::BTreeMap;

use crate::appliance::ApplianceLayer;
use crate::assets::{AssetCatalog, CatalogError, MaterialCatalog};
use crate::config::{ConfigError, ConfiguratorConfig};
use crate::engraving::{parse_aspect_override, EngravingMaps, EngravingState, EngravingSynthesizer};
use crate::foundation::math::Vec3;
use crate::material::{
    self, IndependenceSet, PropertyName, PropertyValue, ResolvedMaterial,
};
use crate::scene::{mesh_bounding_aspect, resolve_material_config, SceneIndex};
use crate::visibility::{resolve_visibility, TagSnapshot, TagState, VisibilityMap};

/// A single user's configurator state
#[derive(Debug)]
pub struct ConfiguratorSession {
    config: ConfiguratorConfig,
    assets: AssetCatalog,
    materials: MaterialCatalog,
    scene: SceneIndex,
    tags: TagState,
    active_options: BTreeMap<String, String>,
    selected: Option<String>,
    independence: IndependenceSet,
    engraving: EngravingState,
    synthesizer: EngravingSynthesizer,
    maps: Option<EngravingMaps>,
    visibility: VisibilityMap,
}

impl ConfiguratorSession {
    /// Create a session; nothing is sent to the appliance until [`Self::initialize`]
    pub fn new(
        config: ConfiguratorConfig,
        assets: AssetCatalog,
        materials: MaterialCatalog,
        scene: SceneIndex,
    ) -> Self {
        let synthesizer = EngravingSynthesizer::from_config(config.engraving.clone());
        let engraving = EngravingState::from_config(&config.engraving);
        Self {
            config,
            assets,
            materials,
            scene,
            tags: TagState::new(),
            active_options: BTreeMap::new(),
            selected: None,
            independence: IndependenceSet::default(),
            engraving,
            synthesizer,
            maps: None,
            visibility: VisibilityMap::new(),
        }
    }

    /// Apply the first material option of every mesh, then push visibility and engraving
    pub fn initialize(&mut self, appliance: &mut dyn ApplianceLayer) {
        let defaults: Vec<(String, String)> = self
            .assets
            .available_material_configs()
            .iter()
            .filter_map(|(mesh, options)| {
                options.keys().next().map(|option| (mesh.clone(), option.clone()))
            })
            .collect();
        for (mesh, option) in defaults {
            self.apply_material_config(&mesh, &option, appliance);
        }

        self.visibility.clear();
        self.refresh_visibility(appliance);
        if self.engraving.has_text() {
            self.regenerate_engraving(appliance);
        }
        log::info!(
            "Session initialized: {} mesh options, {} visible entries",
            self.active_options.len(),
            self.visibility.values().filter(|visible| **visible).count()
        );
    }

    // ========================================================================
    // Tags and visibility
    // ========================================================================

    /// Flip a tag; returns its new state
    pub fn toggle_tag(&mut self, tag: &str, appliance: &mut dyn ApplianceLayer) -> bool {
        let active = self.tags.toggle(tag);
        self.refresh_visibility(appliance);
        active
    }

    /// Exclusive option selection: only `option` stays active
    pub fn set_option(&mut self, option: &str, appliance: &mut dyn ApplianceLayer) {
        self.tags.set_option(option);
        self.refresh_visibility(appliance);
    }

    fn refresh_visibility(&mut self, appliance: &mut dyn ApplianceLayer) {
        let visibility = resolve_visibility(&self.assets, &self.tags);
        for (mesh, visible) in &visibility {
            if self.visibility.get(mesh) == Some(visible) {
                continue;
            }
            for instance in self.scene.instances_for(mesh) {
                appliance.set_mesh_enabled(&instance.name, *visible);
            }
        }
        self.visibility = visibility;
    }

    // ========================================================================
    // Engraving
    // ========================================================================

    /// Replace the engraving text
    pub fn set_engraving_text(&mut self, text: &str, appliance: &mut dyn ApplianceLayer) {
        self.tags.set_engraving_text(text);
        if self.engraving.set_text(text) {
            self.regenerate_engraving(appliance);
        }
        self.refresh_visibility(appliance);
    }

    /// Select the engraving font; unknown ids are ignored
    pub fn set_engraving_font(&mut self, font_id: &str, appliance: &mut dyn ApplianceLayer) -> bool {
        let changed = self.engraving.set_font(font_id, self.synthesizer.fonts());
        if changed {
            self.regenerate_engraving(appliance);
        }
        changed
    }

    /// Set or clear the aspect override; invalid values are ignored
    pub fn set_engraving_aspect(&mut self, aspect: Option<f32>, appliance: &mut dyn ApplianceLayer) -> bool {
        let changed = self.engraving.set_aspect_override(aspect);
        if changed {
            self.regenerate_engraving(appliance);
        }
        changed
    }

    /// Aspect override from text input: blank returns to automatic, non-numbers are ignored
    pub fn set_engraving_aspect_input(&mut self, input: &str, appliance: &mut dyn ApplianceLayer) -> bool {
        match parse_aspect_override(input) {
            Some(aspect) => self.set_engraving_aspect(aspect, appliance),
            None => {
                log::warn!("Ignoring aspect input '{input}'");
                false
            }
        }
    }

    /// Set the blur fraction; invalid values are ignored
    pub fn set_engraving_blur(&mut self, blur_percent: f32, appliance: &mut dyn ApplianceLayer) -> bool {
        let changed = self.engraving.set_blur_percent(blur_percent);
        if changed {
            self.regenerate_engraving(appliance);
        }
        changed
    }

    /// Record the bounding size of a rendered instance
    ///
    /// Maps are regenerated when this changes the automatic aspect.
    pub fn set_mesh_extents(&mut self, instance: &str, extents: Vec3, appliance: &mut dyn ApplianceLayer) -> bool {
        let before = mesh_bounding_aspect(&self.assets, &self.scene);
        if !self.scene.set_extents(instance, extents) {
            log::warn!("Unknown scene instance '{instance}'");
            return false;
        }
        let after = mesh_bounding_aspect(&self.assets, &self.scene);
        if before != after && self.engraving.aspect_override.is_none() {
            self.regenerate_engraving(appliance);
        }
        true
    }

    fn engraving_instances(&self) -> Vec<String> {
        self.assets
            .engraving_meshes()
            .flat_map(|mesh| self.scene.instances_for(mesh).map(|instance| instance.name.clone()))
            .collect()
    }

    fn regenerate_engraving(&mut self, appliance: &mut dyn ApplianceLayer) {
        let mesh_aspect = mesh_bounding_aspect(&self.assets, &self.scene);
        match self.synthesizer.synthesize_state(&self.engraving, mesh_aspect) {
            Ok(Some(maps)) => {
                for instance in self.engraving_instances() {
                    appliance.bind_engraving_maps(&instance, &maps, &self.config.binding);
                }
                self.maps = Some(maps);
            }
            Ok(None) => {
                if self.maps.take().is_some() {
                    for instance in self.engraving_instances() {
                        appliance.detach_engraving_maps(&instance);
                    }
                }
            }
            Err(e) => log::error!("Engraving synthesis failed, keeping previous maps: {e}"),
        }
    }

    // ========================================================================
    // Material options
    // ========================================================================

    /// Apply a named material option to a mesh; returns the number of slots bound
    pub fn apply_material_config(&mut self, mesh: &str, option: &str, appliance: &mut dyn ApplianceLayer) -> usize {
        let bindings = resolve_material_config(&self.assets, &self.materials, &self.scene, mesh, option);
        if self.assets.material_option(mesh, option).is_some() {
            self.active_options.insert(mesh.to_string(), option.to_string());
        }

        for binding in &bindings {
            let params = material::resolve_effective(&binding.material, &self.materials)
                .to_pbr_params(binding.material.as_str());
            for instance in &binding.instances {
                appliance.apply_material(instance, &params);
            }
        }
        log::debug!("Mesh '{mesh}' option '{option}': {} slots bound", bindings.len());
        bindings.len()
    }

    // ========================================================================
    // Material editing
    // ========================================================================

    /// Select the material being edited
    pub fn select_material(&mut self, name: &str) -> bool {
        if !self.materials.contains(name) {
            log::warn!("Cannot select unknown material '{name}'");
            return false;
        }
        self.selected = Some(name.to_string());
        self.independence = material::compute_independence(name, &self.materials);
        true
    }

    /// Change the parent of a material; `None` or `"none"` clears it
    pub fn set_parent(
        &mut self,
        name: &str,
        parent: Option<&str>,
        appliance: &mut dyn ApplianceLayer,
    ) -> Result<(), CatalogError> {
        self.materials.set_parent(name, parent)?;
        if let Some(parent) = material::effective_parent(name, &self.materials) {
            log::info!("Material '{name}' now inherits from '{parent}'");
        } else if parent.is_some_and(|p| p != crate::assets::NO_PARENT) {
            log::warn!("Material '{name}': parent link does not resolve, using defaults");
        }
        if self.selected.as_deref() == Some(name) {
            self.independence = material::compute_independence(name, &self.materials);
        }
        self.propagate(name, appliance);
        Ok(())
    }

    /// Toggle a property of the selected material between independent and inherited
    pub fn toggle_independence(&mut self, property: PropertyName, appliance: &mut dyn ApplianceLayer) -> Option<bool> {
        let name = self.selected.clone()?;
        let independent =
            material::toggle_independence(&name, property, &mut self.materials, &mut self.independence);
        self.propagate(&name, appliance);
        Some(independent)
    }

    /// Edit a property of the selected material
    pub fn edit_property(
        &mut self,
        property: PropertyName,
        value: PropertyValue,
        appliance: &mut dyn ApplianceLayer,
    ) -> bool {
        let Some(name) = self.selected.clone() else {
            log::warn!("No material selected, ignoring edit of {property}");
            return false;
        };
        let applied = material::apply_edit(&name, property, value, &mut self.materials, &mut self.independence);
        if applied {
            self.propagate(&name, appliance);
        }
        applied
    }

    /// Create a material with the editor's starting values and select it
    pub fn create_material(&mut self, name: &str) -> Result<(), CatalogError> {
        self.materials.create_material(name)?;
        self.select_material(name.trim());
        Ok(())
    }

    /// Push the new effective values of a material and everything inheriting from it
    fn propagate(&self, changed: &str, appliance: &mut dyn ApplianceLayer) {
        let affected: Vec<&str> = self
            .materials
            .names()
            .filter(|name| {
                material::parent_chain(name, &self.materials)
                    .iter()
                    .any(|(ancestor, _)| *ancestor == changed)
            })
            .collect();

        for name in affected {
            let params = material::resolve_effective(name, &self.materials).to_pbr_params(name);
            appliance.update_material(&params);
        }
    }

    // ========================================================================
    // Persistence and accessors
    // ========================================================================

    /// Selection state for the persistence sink
    pub fn snapshot(&self) -> TagSnapshot {
        TagSnapshot::capture(&self.tags, &self.active_options)
    }

    /// Material catalog as JSON for the persistence sink
    pub fn export_materials_json(&self) -> Result<String, ConfigError> {
        self.materials.to_json_string()
    }

    /// Settings
    pub const fn config(&self) -> &ConfiguratorConfig {
        &self.config
    }

    /// Asset catalog
    pub const fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    /// Material catalog
    pub const fn materials(&self) -> &MaterialCatalog {
        &self.materials
    }

    /// Rendered instance index
    pub const fn scene(&self) -> &SceneIndex {
        &self.scene
    }

    /// Active tags and engraving text
    pub const fn tags(&self) -> &TagState {
        &self.tags
    }

    /// Active option per mesh
    pub const fn active_options(&self) -> &BTreeMap<String, String> {
        &self.active_options
    }

    /// Last visibility pushed to the appliance
    pub const fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    /// Material being edited
    pub fn selected_material(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Independence of the selected material's properties
    pub const fn independence(&self) -> &IndependenceSet {
        &self.independence
    }

    /// Effective values of the selected material
    pub fn selected_effective(&self) -> Option<ResolvedMaterial> {
        self.selected
            .as_deref()
            .map(|name| material::resolve_effective(name, &self.materials))
    }

    /// Engraving inputs
    pub const fn engraving(&self) -> &EngravingState {
        &self.engraving
    }

    /// Current engraving maps, if any
    pub const fn engraving_maps(&self) -> Option<&EngravingMaps> {
        self.maps.as_ref()
    }

    /// Engraving synthesizer, for registering font faces
    pub fn synthesizer_mut(&mut self) -> &mut EngravingSynthesizer {
        &mut self.synthesizer
    }
}
