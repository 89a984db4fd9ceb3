//! Engraving map synthesis
//!
//! Free text becomes three maps of identical size: an alpha mask, an
//! ambient-occlusion map sharing the same raster, and a normal map
//! reconstructed from the AO gradient. Maps are regenerated from scratch
//! whenever any input changes.

mod font;
mod normal;
mod raster;
mod state;
mod synthesizer;
mod text;

pub use font::{FontError, FontFace, FontLibrary, FontResult, Glyph};
pub use normal::{sobel_normal_map, FLAT_NORMAL};
pub use raster::RasterMap;
pub use state::{parse_aspect_override, EngravingState};
pub use synthesizer::{EngravingMaps, EngravingSynthesizer, MAX_SURFACE_DIMENSION};
pub use text::{fit_font_size, measure};

use thiserror::Error;

/// Errors that can occur while producing engraving maps
#[derive(Error, Debug)]
pub enum EngravingError {
    /// A canvas of this size cannot be created
    #[error("Drawing surface unavailable ({width}x{height})")]
    SurfaceUnavailable {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Encoding or writing a map failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
