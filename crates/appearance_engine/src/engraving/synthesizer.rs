//! Text → alpha, ambient occlusion and normal maps

use image::{imageops, GrayImage};

use super::{normal, text, EngravingError, EngravingState, FontLibrary, RasterMap};
use crate::config::EngravingConfig;
use crate::foundation::math::clamp_aspect;

/// Largest canvas dimension a drawing surface can be created with
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// The three engraving maps, all the same size
#[derive(Debug, Clone, PartialEq)]
pub struct EngravingMaps {
    /// White text on black, blurred
    pub alpha: RasterMap,
    /// Same raster as `alpha`, consumed as a height-like signal
    pub ao: RasterMap,
    /// Sobel normals reconstructed from `ao`
    pub normal: RasterMap,
    /// Font size chosen by auto-fit
    pub font_px: f32,
    /// Blur radius in pixels
    pub blur_px: u32,
}

impl EngravingMaps {
    /// Canvas dimensions
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.alpha.width, self.alpha.height)
    }
}

fn valid_aspect(aspect: Option<f32>) -> Option<f32> {
    aspect.filter(|value| value.is_finite() && *value > 0.0)
}

/// Rasterizes engraving text into texture maps
///
/// Every call allocates fresh buffers; nothing is cached between calls, so
/// identical inputs give identical maps.
#[derive(Debug)]
pub struct EngravingSynthesizer {
    config: EngravingConfig,
    fonts: FontLibrary,
}

impl Default for EngravingSynthesizer {
    fn default() -> Self {
        Self::from_config(EngravingConfig::default())
    }
}

impl EngravingSynthesizer {
    /// Create a synthesizer with an explicit font library
    pub const fn new(config: EngravingConfig, fonts: FontLibrary) -> Self {
        Self { config, fonts }
    }

    /// Create a synthesizer, building the font library from the settings
    pub fn from_config(config: EngravingConfig) -> Self {
        let fonts = FontLibrary::from_config(&config);
        Self::new(config, fonts)
    }

    /// Synthesis settings
    pub const fn config(&self) -> &EngravingConfig {
        &self.config
    }

    /// Registered fonts
    pub const fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Registered fonts, for loading faces
    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    /// Aspect actually used: override, then mesh aspect, then 1, clamped
    pub fn effective_aspect(aspect_override: Option<f32>, mesh_aspect: Option<f32>) -> f32 {
        let aspect = valid_aspect(aspect_override)
            .or_else(|| valid_aspect(mesh_aspect))
            .unwrap_or(1.0);
        clamp_aspect(aspect)
    }

    /// Canvas size for an aspect ratio: fixed height, width follows the aspect
    pub fn canvas_size(&self, aspect: f32) -> (u32, u32) {
        let height = self.config.base_resolution;
        let width = ((height as f32 * aspect).round() as u32).max(2);
        (width, height)
    }

    /// Blur radius in pixels, at least 1 and at most the smaller canvas side
    pub fn blur_radius(canvas: (u32, u32), blur_percent: f32) -> u32 {
        let min_dim = canvas.0.min(canvas.1) as f32;
        let blur_percent = if blur_percent.is_finite() {
            blur_percent.clamp(0.0, 1.0)
        } else {
            0.0
        };
        ((min_dim * blur_percent).round() as u32).max(1)
    }

    /// Synthesize the maps for the current engraving state
    pub fn synthesize_state(
        &self,
        state: &EngravingState,
        mesh_aspect: Option<f32>,
    ) -> Result<Option<EngravingMaps>, EngravingError> {
        self.synthesize(
            &state.text,
            &state.font_id,
            state.aspect_override,
            state.blur_percent,
            mesh_aspect,
        )
    }

    /// Synthesize alpha, AO and normal maps for `text`
    ///
    /// Blank text yields `Ok(None)`. Unknown font ids render with the
    /// default font. A canvas that cannot be created is reported as
    /// [`EngravingError::SurfaceUnavailable`].
    pub fn synthesize(
        &self,
        text: &str,
        font_id: &str,
        aspect_override: Option<f32>,
        blur_percent: f32,
        mesh_aspect: Option<f32>,
    ) -> Result<Option<EngravingMaps>, EngravingError> {
        if text.trim().is_empty() {
            log::debug!("Engraving text is blank, no maps");
            return Ok(None);
        }

        let aspect = Self::effective_aspect(aspect_override, mesh_aspect);
        let (width, height) = self.canvas_size(aspect);
        if height == 0 || width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
            return Err(EngravingError::SurfaceUnavailable { width, height });
        }

        let font_id = if self.fonts.contains(font_id) {
            font_id
        } else {
            log::warn!(
                "Font '{font_id}' not registered, using '{}'",
                self.fonts.default_font()
            );
            self.fonts.default_font()
        };
        let style = self.fonts.style(font_id);
        let face = self.fonts.face(font_id);

        let font_px = text::fit_font_size(
            face,
            text,
            style.letter_spacing,
            style.font_size_scale,
            (width, height),
            &self.config,
        );
        let blur_px = Self::blur_radius((width, height), blur_percent);

        let mut canvas = GrayImage::new(width, height);
        text::draw_centered(&mut canvas, face, text, font_px, style.letter_spacing);
        let blurred = imageops::blur(&canvas, blur_px as f32);

        let alpha = RasterMap::from_gray(&blurred);
        let ao = alpha.clone();
        let normal = normal::sobel_normal_map(&ao, self.config.normal_strength, self.config.normal_depth);

        log::info!(
            "Synthesized engraving '{text}' with {font_id} at {font_px}px: {width}x{height}, blur {blur_px}px"
        );
        Ok(Some(EngravingMaps {
            alpha,
            ao,
            normal,
            font_px,
            blur_px,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engraving::FLAT_NORMAL;
    use approx::assert_relative_eq;

    fn small_synthesizer() -> EngravingSynthesizer {
        EngravingSynthesizer::from_config(EngravingConfig {
            base_resolution: 64,
            min_font_px: 8.0,
            font_step_px: 2.0,
            ..EngravingConfig::default()
        })
    }

    #[test]
    fn test_effective_aspect_precedence() {
        assert_relative_eq!(EngravingSynthesizer::effective_aspect(Some(2.0), Some(3.0)), 2.0);
        assert_relative_eq!(EngravingSynthesizer::effective_aspect(None, Some(3.0)), 3.0);
        assert_relative_eq!(EngravingSynthesizer::effective_aspect(None, None), 1.0);
        assert_relative_eq!(EngravingSynthesizer::effective_aspect(Some(f32::NAN), None), 1.0);
        assert_relative_eq!(EngravingSynthesizer::effective_aspect(Some(50.0), None), 10.0);
        assert_relative_eq!(EngravingSynthesizer::effective_aspect(Some(0.01), None), 0.1);
    }

    #[test]
    fn test_canvas_size_and_blur() {
        let synthesizer = EngravingSynthesizer::default();
        assert_eq!(synthesizer.canvas_size(2.0), (1024, 512));
        assert_eq!(synthesizer.canvas_size(0.1), (51, 512));
        assert_eq!(EngravingSynthesizer::blur_radius((1024, 512), 0.01), 5);
        assert_eq!(EngravingSynthesizer::blur_radius((1024, 512), 0.0), 1);
        assert_eq!(EngravingSynthesizer::blur_radius((51, 512), 0.01), 1);
    }

    #[test]
    fn test_blur_fraction_is_capped() {
        assert_eq!(EngravingSynthesizer::blur_radius((1024, 512), 100.0), 512);
        assert_eq!(EngravingSynthesizer::blur_radius((1024, 512), f32::INFINITY), 1);

        let maps = small_synthesizer()
            .synthesize("AB", "Stencil", None, 100.0, None)
            .unwrap()
            .unwrap();
        assert_eq!(maps.blur_px, 64);
    }

    #[test]
    fn test_blank_text_gives_no_maps() {
        let synthesizer = small_synthesizer();
        assert!(synthesizer.synthesize("", "Stencil", None, 0.01, None).unwrap().is_none());
        assert!(synthesizer.synthesize(" \n", "Stencil", None, 0.01, None).unwrap().is_none());
    }

    #[test]
    fn test_maps_share_dimensions() {
        let maps = small_synthesizer()
            .synthesize("AB", "Stencil", Some(2.0), 0.01, None)
            .unwrap()
            .unwrap();
        assert_eq!(maps.dimensions(), (128, 64));
        assert_eq!((maps.normal.width, maps.normal.height), (128, 64));
        assert_eq!(maps.ao, maps.alpha);
        assert_eq!(maps.alpha.size_bytes(), 128 * 64 * 4);
    }

    #[test]
    fn test_text_is_drawn_white_on_black() {
        let maps = small_synthesizer()
            .synthesize("HI", "Stencil", Some(2.0), 0.01, None)
            .unwrap()
            .unwrap();
        assert_eq!(maps.alpha.pixel(0, 0), [0, 0, 0, 255]);
        assert!(maps.alpha.data.chunks(4).any(|px| px[0] > 128));
        assert!(maps.alpha.data.chunks(4).all(|px| px[0] == px[1] && px[1] == px[2] && px[3] == 255));
    }

    #[test]
    fn test_normal_map_border_and_background_are_flat() {
        let maps = small_synthesizer()
            .synthesize("AB", "Stencil", Some(2.0), 0.01, None)
            .unwrap()
            .unwrap();
        let (width, height) = maps.dimensions();
        for x in 0..width {
            assert_eq!(maps.normal.pixel(x, 0), FLAT_NORMAL);
            assert_eq!(maps.normal.pixel(x, height - 1), FLAT_NORMAL);
        }
        // Far from the text the height field is constant
        assert_eq!(maps.normal.pixel(1, 1), FLAT_NORMAL);
        assert!(maps.normal.data.chunks(4).any(|px| px != FLAT_NORMAL));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let synthesizer = EngravingSynthesizer::default();
        let first = synthesizer.synthesize("AB", "Stencil", Some(2.0), 0.01, None).unwrap();
        let second = synthesizer.synthesize("AB", "Stencil", Some(2.0), 0.01, None).unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_letter_spacing_shrinks_font() {
        let synthesizer = small_synthesizer();
        let stencil = synthesizer.synthesize("ABCDEFGH", "Stencil", Some(2.0), 0.01, None).unwrap().unwrap();
        let western = synthesizer.synthesize("ABCDEFGH", "Western", Some(2.0), 0.01, None).unwrap().unwrap();
        assert!(western.font_px < stencil.font_px);
    }

    #[test]
    fn test_chosen_font_fits_or_hits_floor() {
        let synthesizer = EngravingSynthesizer::default();
        let config = synthesizer.config().clone();
        for line in ["AB", "SERIAL-0042", "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG"] {
            let maps = synthesizer.synthesize(line, "Futuristic", None, 0.01, None).unwrap().unwrap();
            let (width, _) = maps.dimensions();
            let style = synthesizer.fonts().style("Futuristic");
            let face = synthesizer.fonts().face("Futuristic");
            let fits = text::measure(face, line, maps.font_px, style.letter_spacing)
                <= width as f32 * config.fit_ratio;
            assert!(fits || maps.font_px <= config.min_font_px, "{line} at {}px", maps.font_px);
        }
    }

    #[test]
    fn test_unknown_font_uses_default() {
        let synthesizer = small_synthesizer();
        let fallback = synthesizer.synthesize("AB", "Comic", None, 0.01, None).unwrap();
        let stencil = synthesizer.synthesize("AB", "Stencil", None, 0.01, None).unwrap();
        assert_eq!(fallback, stencil);
    }

    #[test]
    fn test_surface_unavailable() {
        let synthesizer = EngravingSynthesizer::from_config(EngravingConfig {
            base_resolution: 0,
            ..EngravingConfig::default()
        });
        assert!(matches!(
            synthesizer.synthesize("AB", "Stencil", None, 0.01, None),
            Err(EngravingError::SurfaceUnavailable { .. })
        ));

        let huge = EngravingSynthesizer::from_config(EngravingConfig {
            base_resolution: 4096,
            ..EngravingConfig::default()
        });
        assert!(huge.synthesize("AB", "Stencil", Some(10.0), 0.01, None).is_err());
    }
}
