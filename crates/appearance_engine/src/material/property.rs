//! Material property names, kinds and values
//!
//! The configurator recognizes a fixed set of PBR properties. Each has a
//! kind that decides how a stored value is parsed, and a built-in default
//! used when no material in the parent chain defines it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Recognized material properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PropertyName {
    /// Albedo color
    BaseColor,
    /// Metallic factor
    Metallic,
    /// Roughness factor
    Roughness,
    /// Global transparency
    Alpha,
    /// Albedo texture
    AlbedoTexture,
    /// Metallic texture
    MetallicTexture,
    /// Roughness (micro-surface) texture
    MicroSurfaceTexture,
    /// Ambient occlusion texture
    AmbientTexture,
    /// Opacity texture
    OpacityTexture,
    /// Normal map
    BumpTexture,
    /// Normal map level
    BumpTextureIntensity,
    /// Baked lighting texture
    LightmapTexture,
    /// Treat the lightmap as a shadow map
    UseLightmapAsShadowmap,
    /// UV set sampled by the lightmap
    LightmapUvSet,
    /// Cull back faces
    BackFaceCulling,
    /// Texture U offset
    UOffset,
    /// Texture V offset
    VOffset,
    /// Texture U scale
    UScale,
    /// Texture V scale
    VScale,
    /// Texture rotation around W, in degrees
    WRotation,
}

/// How a property value is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `#rrggbb` color
    Color,
    /// Floating point value
    Scalar,
    /// Texture name or the `None` sentinel
    Texture,
    /// Boolean
    Flag,
    /// Small non-negative integer
    Index,
}

impl PropertyName {
    /// Every recognized property, in display order
    pub const ALL: [Self; 20] = [
        Self::BaseColor,
        Self::Metallic,
        Self::Roughness,
        Self::Alpha,
        Self::AlbedoTexture,
        Self::MetallicTexture,
        Self::MicroSurfaceTexture,
        Self::AmbientTexture,
        Self::OpacityTexture,
        Self::BumpTexture,
        Self::BumpTextureIntensity,
        Self::LightmapTexture,
        Self::UseLightmapAsShadowmap,
        Self::LightmapUvSet,
        Self::BackFaceCulling,
        Self::UOffset,
        Self::VOffset,
        Self::UScale,
        Self::VScale,
        Self::WRotation,
    ];

    /// Key used in catalog documents
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseColor => "baseColor",
            Self::Metallic => "metallic",
            Self::Roughness => "roughness",
            Self::Alpha => "alpha",
            Self::AlbedoTexture => "albedoTexture",
            Self::MetallicTexture => "metallicTexture",
            Self::MicroSurfaceTexture => "microSurfaceTexture",
            Self::AmbientTexture => "ambientTexture",
            Self::OpacityTexture => "opacityTexture",
            Self::BumpTexture => "bumpTexture",
            Self::BumpTextureIntensity => "bumpTextureIntensity",
            Self::LightmapTexture => "lightmapTexture",
            Self::UseLightmapAsShadowmap => "useLightmapAsShadowmap",
            Self::LightmapUvSet => "lightmapUVSet",
            Self::BackFaceCulling => "backFaceCulling",
            Self::UOffset => "uOffset",
            Self::VOffset => "vOffset",
            Self::UScale => "uScale",
            Self::VScale => "vScale",
            Self::WRotation => "wRotation",
        }
    }

    /// Storage kind of this property
    pub const fn kind(self) -> PropertyKind {
        match self {
            Self::BaseColor => PropertyKind::Color,
            Self::AlbedoTexture
            | Self::MetallicTexture
            | Self::MicroSurfaceTexture
            | Self::AmbientTexture
            | Self::OpacityTexture
            | Self::BumpTexture
            | Self::LightmapTexture => PropertyKind::Texture,
            Self::UseLightmapAsShadowmap | Self::BackFaceCulling => PropertyKind::Flag,
            Self::LightmapUvSet => PropertyKind::Index,
            Self::Metallic
            | Self::Roughness
            | Self::Alpha
            | Self::BumpTextureIntensity
            | Self::UOffset
            | Self::VOffset
            | Self::UScale
            | Self::VScale
            | Self::WRotation => PropertyKind::Scalar,
        }
    }

    /// Built-in value used when no material in the chain defines the property
    pub fn default_value(self) -> PropertyValue {
        match self {
            Self::BaseColor => PropertyValue::Color(Rgb::WHITE),
            Self::Metallic | Self::UOffset | Self::VOffset | Self::WRotation => {
                PropertyValue::Scalar(0.0)
            }
            Self::Roughness => PropertyValue::Scalar(0.5),
            Self::Alpha | Self::BumpTextureIntensity | Self::UScale | Self::VScale => {
                PropertyValue::Scalar(1.0)
            }
            Self::AlbedoTexture
            | Self::MetallicTexture
            | Self::MicroSurfaceTexture
            | Self::AmbientTexture
            | Self::OpacityTexture
            | Self::BumpTexture
            | Self::LightmapTexture => PropertyValue::Texture(None),
            Self::UseLightmapAsShadowmap | Self::BackFaceCulling => PropertyValue::Flag(true),
            Self::LightmapUvSet => PropertyValue::Index(0),
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown material property '{s}'"))
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Rgb {
    /// Opaque white
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create a color from components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Components normalized to [0, 1]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Value stored in a catalog document, before it is typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Boolean literal
    Flag(bool),
    /// Numeric literal
    Number(f64),
    /// String literal
    Text(String),
}

/// Typed material property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// RGB color
    Color(Rgb),
    /// Scalar (factors, offsets, degrees)
    Scalar(f64),
    /// Texture name; `None` is the "None" sentinel
    Texture(Option<String>),
    /// Boolean flag
    Flag(bool),
    /// Non-negative index
    Index(u32),
}

/// Sentinel used by catalogs for "no texture"
pub const NO_TEXTURE: &str = "None";

impl PropertyValue {
    /// Type a document value for the given property, `None` if it does not fit
    pub fn from_raw(kind: PropertyKind, raw: &RawValue) -> Option<Self> {
        match (kind, raw) {
            (PropertyKind::Color, RawValue::Text(hex)) => Rgb::from_hex(hex).map(Self::Color),
            (PropertyKind::Scalar, RawValue::Number(value)) if value.is_finite() => {
                Some(Self::Scalar(*value))
            }
            (PropertyKind::Texture, RawValue::Text(name)) => Some(Self::texture(name)),
            (PropertyKind::Flag, RawValue::Flag(flag)) => Some(Self::Flag(*flag)),
            (PropertyKind::Index, RawValue::Number(value))
                if value.is_finite() && *value >= 0.0 && value.fract() == 0.0 =>
            {
                Some(Self::Index(*value as u32))
            }
            _ => None,
        }
    }

    /// Texture value from a catalog name, mapping blanks and the sentinel to `None`
    pub fn texture(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed == NO_TEXTURE {
            Self::Texture(None)
        } else {
            Self::Texture(Some(trimmed.to_string()))
        }
    }

    /// Document representation of this value
    pub fn to_raw(&self) -> RawValue {
        match self {
            Self::Color(rgb) => RawValue::Text(rgb.to_hex()),
            Self::Scalar(value) => RawValue::Number(*value),
            Self::Texture(name) => RawValue::Text(name.clone().unwrap_or_else(|| NO_TEXTURE.to_string())),
            Self::Flag(flag) => RawValue::Flag(*flag),
            Self::Index(index) => RawValue::Number(f64::from(*index)),
        }
    }

    /// Whether this value can be stored under a property of `kind`
    pub const fn matches(&self, kind: PropertyKind) -> bool {
        matches!(
            (self, kind),
            (Self::Color(_), PropertyKind::Color)
                | (Self::Scalar(_), PropertyKind::Scalar)
                | (Self::Texture(_), PropertyKind::Texture)
                | (Self::Flag(_), PropertyKind::Flag)
                | (Self::Index(_), PropertyKind::Index)
        )
    }

    /// Scalar payload
    pub const fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Color payload
    pub const fn as_color(&self) -> Option<Rgb> {
        match self {
            Self::Color(rgb) => Some(*rgb),
            _ => None,
        }
    }

    /// Texture payload; `None` for the sentinel or a non-texture value
    pub fn as_texture(&self) -> Option<&str> {
        match self {
            Self::Texture(Some(name)) => Some(name),
            _ => None,
        }
    }

    /// Flag payload
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Index payload
    pub const fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(index) => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(rgb) => f.write_str(&rgb.to_hex()),
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Texture(name) => f.write_str(name.as_deref().unwrap_or(NO_TEXTURE)),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}
