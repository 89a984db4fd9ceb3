//! Normal map reconstruction from a height-like map

use super::RasterMap;

/// Encoded flat normal `(0, 0, 1)`
pub const FLAT_NORMAL: [u8; 4] = [128, 128, 255, 255];

fn encode(component: f32) -> u8 {
    ((component * 0.5 + 0.5) * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Build a tangent-space normal map from the red channel of `height`
///
/// Interior pixels use a 3x3 Sobel gradient with the X/Y signs flipped, so
/// bright areas read as recessed. The one-pixel border has no full
/// neighbourhood and is written as [`FLAT_NORMAL`].
pub fn sobel_normal_map(height: &RasterMap, strength: f32, depth: f32) -> RasterMap {
    let (width, rows) = (height.width, height.height);
    let mut normal = RasterMap::solid_color(width, rows, FLAT_NORMAL);
    if width < 3 || rows < 3 {
        return normal;
    }

    let nz = if strength.abs() > f32::EPSILON {
        depth / strength
    } else {
        depth
    };

    for y in 1..rows - 1 {
        for x in 1..width - 1 {
            let tl = height.red(x - 1, y - 1);
            let t = height.red(x, y - 1);
            let tr = height.red(x + 1, y - 1);
            let l = height.red(x - 1, y);
            let r = height.red(x + 1, y);
            let bl = height.red(x - 1, y + 1);
            let b = height.red(x, y + 1);
            let br = height.red(x + 1, y + 1);

            let dx = (tr + 2.0 * r + br) - (tl + 2.0 * l + bl);
            let dy = (bl + 2.0 * b + br) - (tl + 2.0 * t + tr);

            let length = (dx * dx + dy * dy + nz * nz).sqrt();
            let (nx, ny, nz) = if length > 0.0 {
                (-dx / length, -dy / length, nz / length)
            } else {
                (0.0, 0.0, 1.0)
            };

            normal.set_pixel(x, y, [encode(nx), encode(ny), encode(nz), 255]);
        }
    }
    normal
}
