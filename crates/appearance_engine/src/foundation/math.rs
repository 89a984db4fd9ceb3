//! Math utilities and types

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Smallest extent considered when deriving an aspect ratio
pub const MIN_EXTENT: f32 = 0.0001;

/// Aspect ratios are clamped to this range
pub const ASPECT_RANGE: (f32, f32) = (0.1, 10.0);

/// Clamp an aspect ratio into [`ASPECT_RANGE`]
pub fn clamp_aspect(aspect: f32) -> f32 {
    aspect.clamp(ASPECT_RANGE.0, ASPECT_RANGE.1)
}

/// Aspect ratio of the plane spanned by the two largest dimensions of a box
///
/// `size` is the full size of the bounding box (not the half extents).
/// The engraving surface is assumed to lie in that plane, so the thinnest
/// dimension is ignored.
pub fn plane_aspect(size: Vec3) -> f32 {
    let mut dims = [size.x.abs(), size.y.abs(), size.z.abs()];
    dims.sort_by(|a, b| b.total_cmp(a));

    let width = dims[0].max(MIN_EXTENT);
    let height = dims[1].max(MIN_EXTENT);
    clamp_aspect(width / height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_aspect_ignores_thinnest_axis() {
        let aspect = plane_aspect(Vec3::new(0.2, 1.0, 4.0));
        assert_relative_eq!(aspect, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_plane_aspect_is_clamped() {
        assert_relative_eq!(plane_aspect(Vec3::new(100.0, 1.0, 0.0)), 10.0);
        // Degenerate boxes fall back to the minimum extent on both sides
        assert_relative_eq!(plane_aspect(Vec3::zeros()), 1.0);
    }

    #[test]
    fn test_clamp_aspect_low_end() {
        assert_relative_eq!(clamp_aspect(0.01), 0.1);
    }
}
