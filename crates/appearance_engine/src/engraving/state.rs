//! Engraving inputs edited by the user

use serde::{Deserialize, Serialize};

use super::FontLibrary;
use crate::config::EngravingConfig;

/// Text, font, aspect override and blur of the engraving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngravingState {
    /// Engraving text; blank means no engraving
    pub text: String,
    /// Selected font id
    pub font_id: String,
    /// Fixed aspect ratio; `None` follows the engraving surface
    pub aspect_override: Option<f32>,
    /// Blur radius as a fraction of the smaller canvas dimension
    pub blur_percent: f32,
}

impl Default for EngravingState {
    fn default() -> Self {
        Self::from_config(&EngravingConfig::default())
    }
}

/// Parse an aspect ratio typed by the user
///
/// Returns `Some(None)` for blank input (automatic aspect), `Some(Some(v))`
/// for a positive number and `None` for anything that should be ignored.
pub fn parse_aspect_override(input: &str) -> Option<Option<f32>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    match trimmed.parse::<f32>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(Some(value)),
        _ => None,
    }
}

impl EngravingState {
    /// Initial state from settings: no text, default font and blur
    pub fn from_config(config: &EngravingConfig) -> Self {
        Self {
            text: String::new(),
            font_id: config.default_font.clone(),
            aspect_override: None,
            blur_percent: config.blur_percent,
        }
    }

    /// Whether the text has visible content
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Replace the text; returns whether it changed
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }

    /// Select a font; unknown ids are ignored
    pub fn set_font(&mut self, font_id: &str, fonts: &FontLibrary) -> bool {
        if !fonts.contains(font_id) {
            let known: Vec<_> = fonts.ids().collect();
            log::warn!("Font '{font_id}' not found, available: {}", known.join(", "));
            return false;
        }
        if self.font_id == font_id {
            return false;
        }
        self.font_id = font_id.to_string();
        true
    }

    /// Set or clear the aspect override; NaN and non-positive values are ignored
    pub fn set_aspect_override(&mut self, aspect: Option<f32>) -> bool {
        if let Some(value) = aspect {
            if value.is_nan() || value <= 0.0 {
                log::warn!("Ignoring aspect override {value}");
                return false;
            }
        }
        if self.aspect_override == aspect {
            return false;
        }
        self.aspect_override = aspect;
        true
    }

    /// Set the blur fraction; non-finite and negative values are ignored
    pub fn set_blur_percent(&mut self, blur_percent: f32) -> bool {
        if !blur_percent.is_finite() || blur_percent < 0.0 {
            log::warn!("Ignoring blur percent {blur_percent}");
            return false;
        }
        let blur_percent = blur_percent.min(1.0);
        if (self.blur_percent - blur_percent).abs() <= f32::EPSILON {
            return false;
        }
        self.blur_percent = blur_percent;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aspect_override() {
        assert_eq!(parse_aspect_override(""), Some(None));
        assert_eq!(parse_aspect_override("  "), Some(None));
        assert_eq!(parse_aspect_override("2.5"), Some(Some(2.5)));
        assert_eq!(parse_aspect_override("wide"), None);
        assert_eq!(parse_aspect_override("-1"), None);
        assert_eq!(parse_aspect_override("NaN"), None);
    }

    #[test]
    fn test_invalid_aspect_keeps_previous() {
        let mut state = EngravingState::default();
        assert!(state.set_aspect_override(Some(2.0)));
        assert!(!state.set_aspect_override(Some(f32::NAN)));
        assert!(!state.set_aspect_override(Some(0.0)));
        assert_eq!(state.aspect_override, Some(2.0));
        assert!(state.set_aspect_override(None));
        assert_eq!(state.aspect_override, None);
    }

    #[test]
    fn test_unknown_font_keeps_previous() {
        let fonts = FontLibrary::default();
        let mut state = EngravingState::default();
        assert_eq!(state.font_id, "Stencil");
        assert!(!state.set_font("Comic", &fonts));
        assert_eq!(state.font_id, "Stencil");
        assert!(state.set_font("Western", &fonts));
        assert!(!state.set_font("Western", &fonts));
    }

    #[test]
    fn test_blur_percent_validation() {
        let mut state = EngravingState::default();
        assert!(!state.set_blur_percent(-0.5));
        assert!(!state.set_blur_percent(f32::INFINITY));
        assert!(state.set_blur_percent(3.0));
        assert_eq!(state.blur_percent, 1.0);
    }

    #[test]
    fn test_set_text_reports_changes() {
        let mut state = EngravingState::default();
        assert!(!state.has_text());
        assert!(state.set_text("AB"));
        assert!(!state.set_text("AB"));
        assert!(state.has_text());
    }
}
