//! Engraving fonts
//!
//! Font ids map to a [`FontStyle`] and optionally a TrueType/OpenType face
//! rasterized with `fontdue`. Ids without a loaded face render with the
//! built-in 8x8 bitmap face, so synthesis never fails for lack of a font.

use std::collections::BTreeMap;
use std::path::Path;

use fontdue::{Font, FontSettings};
use font8x8::legacy::BASIC_LEGACY;

use crate::config::{EngravingConfig, FontStyle};

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while registering fonts
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// Failed to load font from file or data
    #[error("Failed to load font: {0}")]
    LoadError(String),

    /// The font file does not exist
    #[error("Font file not found: {0}")]
    MissingFile(String),
}

/// Coverage bitmap of one glyph
#[derive(Debug, Clone, Default)]
pub struct Glyph {
    /// Bitmap width
    pub width: usize,
    /// Bitmap height
    pub height: usize,
    /// Left bearing from the pen position
    pub xmin: i32,
    /// Offset of the bitmap bottom above the baseline
    pub ymin: i32,
    /// Row-major coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

/// A face glyphs are drawn from
pub enum FontFace {
    /// Scalable face loaded from font data
    TrueType(Font),
    /// Built-in 8x8 bitmap face, scaled by nearest neighbour
    Bitmap,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType(_) => f.write_str("FontFace::TrueType"),
            Self::Bitmap => f.write_str("FontFace::Bitmap"),
        }
    }
}

fn bitmap_rows(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

impl FontFace {
    /// Parse TrueType/OpenType font data
    pub fn from_bytes(font_data: &[u8]) -> FontResult<Self> {
        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::LoadError(format!("fontdue error: {e}")))?;
        Ok(Self::TrueType(font))
    }

    /// Horizontal advance of a glyph at `px`
    pub fn advance(&self, ch: char, px: f32) -> f32 {
        match self {
            Self::TrueType(font) => font.metrics(ch, px).advance_width,
            Self::Bitmap => px,
        }
    }

    /// Ascent and descent (negative below the baseline) at `px`
    pub fn vertical_metrics(&self, px: f32) -> (f32, f32) {
        match self {
            Self::TrueType(font) => font
                .horizontal_line_metrics(px)
                .map_or((px * 0.8, -px * 0.2), |metrics| (metrics.ascent, metrics.descent)),
            Self::Bitmap => (px, 0.0),
        }
    }

    /// Rasterize a glyph at `px`
    pub fn rasterize(&self, ch: char, px: f32) -> Glyph {
        match self {
            Self::TrueType(font) => {
                let (metrics, coverage) = font.rasterize(ch, px);
                Glyph {
                    width: metrics.width,
                    height: metrics.height,
                    xmin: metrics.xmin,
                    ymin: metrics.ymin,
                    coverage,
                }
            }
            Self::Bitmap => {
                let size = px.round().max(0.0) as usize;
                if size == 0 || ch.is_whitespace() {
                    return Glyph::default();
                }
                let rows = bitmap_rows(ch);
                let mut coverage = vec![0u8; size * size];
                for y in 0..size {
                    let row = rows[y * 8 / size];
                    for x in 0..size {
                        // Bit 0 is the leftmost column
                        if (row >> (x * 8 / size)) & 1 == 1 {
                            coverage[y * size + x] = 255;
                        }
                    }
                }
                Glyph {
                    width: size,
                    height: size,
                    xmin: 0,
                    ymin: 0,
                    coverage,
                }
            }
        }
    }
}

/// Registered engraving fonts
#[derive(Debug)]
pub struct FontLibrary {
    styles: BTreeMap<String, FontStyle>,
    faces: BTreeMap<String, FontFace>,
    default_font: String,
    fallback: FontFace,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::from_config(&EngravingConfig::default())
    }
}

impl FontLibrary {
    /// Build the library from settings, loading any configured font files
    ///
    /// A file that cannot be loaded leaves its id on the bitmap face.
    pub fn from_config(config: &EngravingConfig) -> Self {
        let mut library = Self {
            styles: config.fonts.clone(),
            faces: BTreeMap::new(),
            default_font: config.default_font.clone(),
            fallback: FontFace::Bitmap,
        };

        for (id, style) in &config.fonts {
            let Some(path) = &style.path else {
                continue;
            };
            if let Err(e) = library.load_face_file(id, path) {
                log::warn!("Font '{id}' falls back to the built-in face: {e}");
            }
        }
        library
    }

    /// Attach a scalable face to a font id from raw font data
    pub fn load_face(&mut self, id: &str, font_data: &[u8]) -> FontResult<()> {
        let face = FontFace::from_bytes(font_data)?;
        self.styles.entry(id.to_string()).or_default();
        self.faces.insert(id.to_string(), face);
        log::info!("Loaded font face for '{id}'");
        Ok(())
    }

    /// Attach a scalable face to a font id from a font file
    pub fn load_face_file(&mut self, id: &str, path: impl AsRef<Path>) -> FontResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FontError::MissingFile(path.display().to_string()));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| FontError::LoadError(format!("{}: {e}", path.display())))?;
        self.load_face(id, &bytes)
    }

    /// Whether a font id is known
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// Known font ids
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Font used when none is selected
    pub fn default_font(&self) -> &str {
        &self.default_font
    }

    /// Style of a font id, falling back to the default font and then to a plain style
    pub fn style(&self, id: &str) -> FontStyle {
        self.styles
            .get(id)
            .or_else(|| self.styles.get(&self.default_font))
            .cloned()
            .unwrap_or_default()
    }

    /// Face of a font id; the bitmap face when none is loaded
    pub fn face(&self, id: &str) -> &FontFace {
        self.faces.get(id).unwrap_or(&self.fallback)
    }

    /// Whether a font id has a scalable face loaded
    pub fn has_face(&self, id: &str) -> bool {
        self.faces.contains_key(id)
    }
}
