//! Math type aliases and helper functions.
//!
//! World positions are single precision, matching the wire format of the
//! debug shape records.

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Shorthand constructor for [`Vec3`].
#[inline]
pub fn vec3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Axis-aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners as given.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Size along each axis (`max - min`).
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Squared length of the `min -> max` diagonal.
    pub fn diagonal_length_squared(&self) -> f32 {
        self.extents().norm_squared()
    }

    /// The eight corners: bottom face (`min.z`) first, then top face (`max.z`),
    /// each face wound in the same order.
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            vec3(min.x, min.y, min.z),
            vec3(max.x, min.y, min.z),
            vec3(max.x, max.y, min.z),
            vec3(min.x, max.y, min.z),
            vec3(min.x, min.y, max.z),
            vec3(max.x, min.y, max.z),
            vec3(max.x, max.y, max.z),
            vec3(min.x, max.y, max.z),
        ]
    }
}

/// Two unit vectors spanning the plane orthogonal to `normal`.
///
/// Returns `None` when `normal` has zero length.
pub fn orthonormal_basis(normal: &Vec3) -> Option<(Vec3, Vec3)> {
    let n = normal.try_normalize(f32::EPSILON)?;
    // Pick the world axis least aligned with the normal as the seed.
    let seed = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let a = n.cross(&seed).normalize();
    let b = n.cross(&a);
    Some((a, b))
}
