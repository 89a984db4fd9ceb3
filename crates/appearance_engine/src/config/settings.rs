//! Configurator settings
//!
//! Tunables for the engraving pipeline and the texture binding conventions
//! handed to the appliance layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Config;
use crate::appliance::EngravingBinding;

/// Top-level settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorConfig {
    /// Engraving synthesis parameters
    pub engraving: EngravingConfig,
    /// How the engraving maps are bound onto surfaces
    pub binding: EngravingBinding,
}

impl Config for ConfiguratorConfig {}

/// Per-font rendering style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontStyle {
    /// Extra advance after every glyph, in pixels
    pub letter_spacing: f32,
    /// Multiplier applied to the starting font size
    pub font_size_scale: f32,
    /// Optional TrueType/OpenType file backing this font id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            letter_spacing: 0.0,
            font_size_scale: 1.0,
            path: None,
        }
    }
}

impl FontStyle {
    /// Style with the given letter spacing and unit scale
    pub fn with_spacing(letter_spacing: f32) -> Self {
        Self {
            letter_spacing,
            ..Self::default()
        }
    }
}

/// Engraving synthesis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngravingConfig {
    /// Canvas height in pixels; width follows the aspect ratio
    pub base_resolution: u32,
    /// Blur radius as a fraction of the smaller canvas dimension
    pub blur_percent: f32,
    /// Fraction of the canvas width the text may occupy
    pub fit_ratio: f32,
    /// Auto-fit never shrinks the font below this size
    pub min_font_px: f32,
    /// Auto-fit shrink step
    pub font_step_px: f32,
    /// Normal map strength (divides the depth constant)
    pub normal_strength: f32,
    /// Normal map depth constant
    pub normal_depth: f32,
    /// Font used when none is selected
    pub default_font: String,
    /// Known font ids and their styles
    pub fonts: BTreeMap<String, FontStyle>,
}

impl Default for EngravingConfig {
    fn default() -> Self {
        let mut fonts = BTreeMap::new();
        fonts.insert("Stencil".to_string(), FontStyle::with_spacing(0.0));
        fonts.insert("Futuristic".to_string(), FontStyle::with_spacing(2.0));
        fonts.insert("Western".to_string(), FontStyle::with_spacing(15.0));

        Self {
            base_resolution: 512,
            blur_percent: 0.01,
            fit_ratio: 0.9,
            min_font_px: 24.0,
            font_step_px: 4.0,
            normal_strength: 6.0,
            normal_depth: 5.0,
            default_font: "Stencil".to_string(),
            fonts,
        }
    }
}
