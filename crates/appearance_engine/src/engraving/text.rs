//! Single-line text layout on a grayscale canvas

use image::GrayImage;

use super::font::FontFace;
use crate::config::EngravingConfig;

/// Width of a line of text at `px`, letter spacing included
pub fn measure(face: &FontFace, text: &str, px: f32, letter_spacing: f32) -> f32 {
    text.chars()
        .map(|ch| face.advance(ch, px) + letter_spacing)
        .sum()
}

/// Largest font size that fits the canvas width, shrinking in fixed steps
///
/// Starts at the canvas height times `font_size_scale` and stops at the
/// configured floor even if the text still overflows.
pub fn fit_font_size(
    face: &FontFace,
    text: &str,
    letter_spacing: f32,
    font_size_scale: f32,
    canvas: (u32, u32),
    config: &EngravingConfig,
) -> f32 {
    let (width, height) = canvas;
    let limit = width as f32 * config.fit_ratio;
    let step = config.font_step_px.max(1.0);

    let mut px = (height as f32 * font_size_scale).floor();
    while px > config.min_font_px {
        if measure(face, text, px, letter_spacing) <= limit {
            break;
        }
        px -= step;
    }
    px
}

/// Draw white text centered on the canvas
///
/// Coverage is combined with `max`, so overlapping glyphs never overflow.
pub fn draw_centered(canvas: &mut GrayImage, face: &FontFace, text: &str, px: f32, letter_spacing: f32) {
    let (width, height) = canvas.dimensions();
    let (ascent, descent) = face.vertical_metrics(px);
    let baseline = height as f32 / 2.0 + (ascent + descent) / 2.0;
    let mut pen = (width as f32 - measure(face, text, px, letter_spacing)) / 2.0;

    for ch in text.chars() {
        let glyph = face.rasterize(ch, px);
        let left = pen.round() as i64 + i64::from(glyph.xmin);
        let top = baseline.round() as i64 - glyph.height as i64 - i64::from(glyph.ymin);

        for gy in 0..glyph.height {
            let y = top + gy as i64;
            if y < 0 || y >= i64::from(height) {
                continue;
            }
            for gx in 0..glyph.width {
                let x = left + gx as i64;
                if x < 0 || x >= i64::from(width) {
                    continue;
                }
                let coverage = glyph.coverage[gy * glyph.width + gx];
                let pixel = canvas.get_pixel_mut(x as u32, y as u32);
                pixel.0[0] = pixel.0[0].max(coverage);
            }
        }
        pen += face.advance(ch, px) + letter_spacing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_measure_counts_spacing() {
        let face = FontFace::Bitmap;
        assert_relative_eq!(measure(&face, "AB", 10.0, 0.0), 20.0);
        assert_relative_eq!(measure(&face, "AB", 10.0, 15.0), 50.0);
        assert_relative_eq!(measure(&face, "", 10.0, 15.0), 0.0);
    }

    #[test]
    fn test_short_text_keeps_full_size() {
        let config = EngravingConfig::default();
        // Two 512px glyphs need 1024px, under 90% of 2048
        let px = fit_font_size(&FontFace::Bitmap, "AB", 0.0, 1.0, (2048, 512), &config);
        assert_relative_eq!(px, 512.0);
    }

    #[test]
    fn test_auto_fit_shrinks_until_it_fits() {
        let config = EngravingConfig::default();
        let canvas = (1024, 512);
        let px = fit_font_size(&FontFace::Bitmap, "ABCD", 0.0, 1.0, canvas, &config);
        assert!(measure(&FontFace::Bitmap, "ABCD", px, 0.0) <= 0.9 * 1024.0);
        // One step larger would not fit
        assert!(measure(&FontFace::Bitmap, "ABCD", px + 4.0, 0.0) > 0.9 * 1024.0);
    }

    #[test]
    fn test_auto_fit_stops_at_floor() {
        let config = EngravingConfig::default();
        let text = "A".repeat(200);
        let px = fit_font_size(&FontFace::Bitmap, &text, 0.0, 1.0, (512, 512), &config);
        assert!(px <= config.min_font_px);
        assert!(px > config.min_font_px - config.font_step_px);
    }

    #[test]
    fn test_draw_centered_is_symmetric_for_symmetric_glyphs() {
        let mut canvas = GrayImage::new(64, 32);
        draw_centered(&mut canvas, &FontFace::Bitmap, "I", 16.0, 0.0);
        let lit: Vec<u32> = (0..64)
            .filter(|x| (0..32).any(|y| canvas.get_pixel(*x, y).0[0] > 0))
            .collect();
        assert!(!lit.is_empty());
        // Glyph cell spans columns 24..40
        assert!(lit.iter().all(|x| (24..40).contains(x)));
        let rows: Vec<u32> = (0..32)
            .filter(|y| (0..64).any(|x| canvas.get_pixel(x, *y).0[0] > 0))
            .collect();
        assert!(rows.iter().all(|y| (8..24).contains(y)));
    }
}
