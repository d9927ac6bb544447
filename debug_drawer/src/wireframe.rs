//! Edge decompositions used to draw oversized shapes as plain lines.

use shapecast_core::math::orthonormal_basis;
use shapecast_core::{Aabb, Vec3};

/// The 12 edges of a box.
pub fn box_edges(aabb: &Aabb) -> [(Vec3, Vec3); 12] {
    let c = aabb.corners();
    [
        // Bottom face
        (c[0], c[1]),
        (c[1], c[2]),
        (c[2], c[3]),
        (c[3], c[0]),
        // Top face
        (c[4], c[5]),
        (c[5], c[6]),
        (c[6], c[7]),
        (c[7], c[4]),
        // Vertical edges
        (c[0], c[4]),
        (c[1], c[5]),
        (c[2], c[6]),
        (c[3], c[7]),
    ]
}

/// Chords of a circle in the plane spanned by `axis_a` and `axis_b`.
fn circle_in_plane(
    center: Vec3,
    radius: f32,
    axis_a: Vec3,
    axis_b: Vec3,
    segments: u32,
) -> Vec<(Vec3, Vec3)> {
    let mut edges = Vec::with_capacity(segments as usize);
    let first = center + axis_a * radius;
    let mut prev = first;
    for i in 1..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        let (sin, cos) = angle.sin_cos();
        let point = center + (axis_a * cos + axis_b * sin) * radius;
        edges.push((prev, point));
        prev = point;
    }
    // Close exactly on the starting point.
    edges.push((prev, first));
    edges
}

/// Chords of a circle orthogonal to `normal`.
///
/// A zero `normal` falls back to the XZ plane.
pub fn circle_edges(center: Vec3, normal: Vec3, radius: f32, segments: u32) -> Vec<(Vec3, Vec3)> {
    let (a, b) = orthonormal_basis(&normal).unwrap_or((Vec3::x(), Vec3::z()));
    circle_in_plane(center, radius, a, b, segments)
}

/// Three great circles (XY, XZ and YZ planes).
pub fn sphere_edges(center: Vec3, radius: f32, segments: u32) -> Vec<(Vec3, Vec3)> {
    let mut edges = circle_in_plane(center, radius, Vec3::x(), Vec3::y(), segments);
    edges.extend(circle_in_plane(center, radius, Vec3::x(), Vec3::z(), segments));
    edges.extend(circle_in_plane(center, radius, Vec3::y(), Vec3::z(), segments));
    edges
}
