//! Renderer-facing material parameters
//!
//! Flattens a [`ResolvedMaterial`] into the parameter block the host
//! renderer applies to a mesh instance.

use crate::foundation::math::Vec3;

use super::{PropertyName, ResolvedMaterial};

/// UV transform shared by every texture except the lightmap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTransform {
    /// U offset
    pub u_offset: f32,
    /// V offset
    pub v_offset: f32,
    /// U scale
    pub u_scale: f32,
    /// V scale
    pub v_scale: f32,
    /// Rotation around W in radians
    pub w_rotation: f32,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            u_offset: 0.0,
            v_offset: 0.0,
            u_scale: 1.0,
            v_scale: 1.0,
            w_rotation: 0.0,
        }
    }
}

/// PBR parameters for one material
#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterialParams {
    /// Material name
    pub name: String,
    /// Base color (albedo) - RGB values
    pub base_color: Vec3,
    /// Metallic factor (0.0 = dielectric, 1.0 = metallic)
    pub metallic: f32,
    /// Roughness factor (0.0 = mirror, 1.0 = completely rough)
    pub roughness: f32,
    /// Alpha transparency value
    pub alpha: f32,
    /// Albedo texture
    pub albedo_texture: Option<String>,
    /// Metallic texture
    pub metallic_texture: Option<String>,
    /// Micro-surface (roughness) texture
    pub micro_surface_texture: Option<String>,
    /// Ambient occlusion texture
    pub ambient_texture: Option<String>,
    /// Opacity texture
    pub opacity_texture: Option<String>,
    /// Normal map
    pub bump_texture: Option<String>,
    /// Normal map level
    pub bump_level: f32,
    /// Baked lighting texture
    pub lightmap_texture: Option<String>,
    /// Use the lightmap as a shadow map
    pub use_lightmap_as_shadowmap: bool,
    /// UV set sampled by the lightmap
    pub lightmap_uv_set: u32,
    /// Cull back faces
    pub back_face_culling: bool,
    /// UV transform for every texture except the lightmap
    pub texture_transform: TextureTransform,
}

impl Default for PbrMaterialParams {
    fn default() -> Self {
        ResolvedMaterial::defaults().to_pbr_params("default")
    }
}

impl PbrMaterialParams {
    /// Textures that take [`Self::texture_transform`]
    pub fn transformed_textures(&self) -> impl Iterator<Item = &str> {
        [
            &self.albedo_texture,
            &self.metallic_texture,
            &self.micro_surface_texture,
            &self.ambient_texture,
            &self.opacity_texture,
            &self.bump_texture,
        ]
        .into_iter()
        .filter_map(|texture| texture.as_deref())
    }
}

impl ResolvedMaterial {
    fn scalar(&self, property: PropertyName) -> f32 {
        self.get(property)
            .as_scalar()
            .or_else(|| property.default_value().as_scalar())
            .unwrap_or_default() as f32
    }

    fn texture_name(&self, property: PropertyName) -> Option<String> {
        self.get(property).as_texture().map(str::to_string)
    }

    fn flag(&self, property: PropertyName) -> bool {
        self.get(property)
            .as_flag()
            .or_else(|| property.default_value().as_flag())
            .unwrap_or_default()
    }

    /// Convert to renderer parameters; `wRotation` goes from degrees to radians
    pub fn to_pbr_params(&self, name: impl Into<String>) -> PbrMaterialParams {
        let base_color = self
            .get(PropertyName::BaseColor)
            .as_color()
            .unwrap_or(super::Rgb::WHITE)
            .to_vec3();

        PbrMaterialParams {
            name: name.into(),
            base_color,
            metallic: self.scalar(PropertyName::Metallic),
            roughness: self.scalar(PropertyName::Roughness),
            alpha: self.scalar(PropertyName::Alpha),
            albedo_texture: self.texture_name(PropertyName::AlbedoTexture),
            metallic_texture: self.texture_name(PropertyName::MetallicTexture),
            micro_surface_texture: self.texture_name(PropertyName::MicroSurfaceTexture),
            ambient_texture: self.texture_name(PropertyName::AmbientTexture),
            opacity_texture: self.texture_name(PropertyName::OpacityTexture),
            bump_texture: self.texture_name(PropertyName::BumpTexture),
            bump_level: self.scalar(PropertyName::BumpTextureIntensity),
            lightmap_texture: self.texture_name(PropertyName::LightmapTexture),
            use_lightmap_as_shadowmap: self.flag(PropertyName::UseLightmapAsShadowmap),
            lightmap_uv_set: self.get(PropertyName::LightmapUvSet).as_index().unwrap_or(0),
            back_face_culling: self.flag(PropertyName::BackFaceCulling),
            texture_transform: TextureTransform {
                u_offset: self.scalar(PropertyName::UOffset),
                v_offset: self.scalar(PropertyName::VOffset),
                u_scale: self.scalar(PropertyName::UScale),
                v_scale: self.scalar(PropertyName::VScale),
                w_rotation: self.scalar(PropertyName::WRotation).to_radians(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MaterialCatalog, MaterialDefinition};
    use crate::material::{resolve_effective, PropertyValue, Rgb};
    use approx::assert_relative_eq;

    #[test]
    fn test_default_params() {
        let params = PbrMaterialParams::default();
        assert_relative_eq!(params.base_color, Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(params.roughness, 0.5);
        assert_relative_eq!(params.alpha, 1.0);
        assert_relative_eq!(params.bump_level, 1.0);
        assert!(params.back_face_culling);
        assert!(params.use_lightmap_as_shadowmap);
        assert_eq!(params.transformed_textures().count(), 0);
        assert_eq!(params.texture_transform, TextureTransform::default());
    }

    #[test]
    fn test_resolved_values_are_converted() {
        let mut catalog = MaterialCatalog::new();
        catalog.insert(
            "base",
            MaterialDefinition::new()
                .with(PropertyName::BaseColor, PropertyValue::Color(Rgb::new(255, 0, 0)))
                .with(PropertyName::AlbedoTexture, PropertyValue::texture("grip_albedo.png"))
                .with(PropertyName::LightmapTexture, PropertyValue::texture("grip_lightmap.png"))
                .with(PropertyName::WRotation, PropertyValue::Scalar(90.0)),
        );
        catalog.insert(
            "child",
            MaterialDefinition::new()
                .with_parent("base")
                .with(PropertyName::LightmapUvSet, PropertyValue::Index(1))
                .with(PropertyName::UScale, PropertyValue::Scalar(2.0)),
        );

        let params = resolve_effective("child", &catalog).to_pbr_params("child");
        assert_eq!(params.name, "child");
        assert_relative_eq!(params.base_color, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(params.texture_transform.w_rotation, std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(params.texture_transform.u_scale, 2.0);
        assert_eq!(params.lightmap_uv_set, 1);
        assert_eq!(params.lightmap_texture.as_deref(), Some("grip_lightmap.png"));
        // The lightmap keeps its own UVs
        assert_eq!(params.transformed_textures().collect::<Vec<_>>(), vec!["grip_albedo.png"]);
    }
}
