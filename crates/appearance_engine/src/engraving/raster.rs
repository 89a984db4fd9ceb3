//! RGBA raster buffers handed to the appliance layer

use std::path::Path;

use image::{GrayImage, RgbaImage};

use super::EngravingError;

/// RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterMap {
    /// Raw RGBA pixel data, row-major
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl RasterMap {
    /// Create a solid color map
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);

        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }

        Self { data, width, height }
    }

    /// Expand a grayscale image into opaque RGBA (r = g = b = luminance)
    pub fn from_gray(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let data = image
            .as_raw()
            .iter()
            .flat_map(|value| [*value, *value, *value, 255])
            .collect();
        Self { data, width, height }
    }

    /// Pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let index = ((y * self.width + x) * 4) as usize;
        [
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
            self.data[index + 3],
        ]
    }

    /// Write the pixel at `(x, y)`
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let index = ((y * self.width + x) * 4) as usize;
        self.data[index..index + 4].copy_from_slice(&color);
    }

    /// Red channel at `(x, y)` normalized to [0, 1]
    pub fn red(&self, x: u32, y: u32) -> f32 {
        f32::from(self.data[((y * self.width + x) * 4) as usize]) / 255.0
    }

    /// Get the size of the pixel data in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Copy into an `image` buffer
    pub fn to_rgba_image(&self) -> Result<RgbaImage, EngravingError> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            EngravingError::SurfaceUnavailable {
                width: self.width,
                height: self.height,
            },
        )
    }

    /// Save as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), EngravingError> {
        let path = path.as_ref();
        self.to_rgba_image()?.save(path)?;
        log::info!("Saved {}x{} map to {}", self.width, self.height, path.display());
        Ok(())
    }
}
