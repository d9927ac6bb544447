//! External rendering paths the handler delegates to.

use shapecast_core::{Aabb, Color, DimensionId, Vec3};

use crate::ids::GeometryHandle;

/// Particle-based renderer used for shapes the wire format cannot express
/// (points, thick lines and boxes).
///
/// Implementations sync their own clients, including late joiners, and must
/// allocate handles with [`GeometryHandle::next()`].
pub trait FallbackRenderer: Send + Sync {
    fn point(
        &self,
        dim: DimensionId,
        pos: Vec3,
        color: Color,
        radius: Option<f32>,
    ) -> GeometryHandle;

    fn line(
        &self,
        dim: DimensionId,
        begin: Vec3,
        end: Vec3,
        color: Color,
        thickness: Option<f32>,
    ) -> GeometryHandle;

    fn aabb(
        &self,
        dim: DimensionId,
        aabb: &Aabb,
        color: Color,
        thickness: Option<f32>,
    ) -> GeometryHandle;

    /// Stop rendering `handle`. Returns `false` if it was unknown.
    fn remove(&self, handle: GeometryHandle) -> bool;
}

/// Renderer for boxes, circles and spheres above the wire-format size
/// limits.
///
/// Like [`FallbackRenderer`], it owns the client sync of what it draws and
/// allocates handles with [`GeometryHandle::next()`].
pub trait LargeShapeRenderer: Send + Sync {
    fn large_box(&self, dim: DimensionId, aabb: &Aabb, color: Color) -> GeometryHandle;

    fn large_circle(
        &self,
        dim: DimensionId,
        center: Vec3,
        normal: Vec3,
        radius: f32,
        color: Color,
    ) -> GeometryHandle;

    fn large_sphere(
        &self,
        dim: DimensionId,
        center: Vec3,
        radius: f32,
        color: Color,
    ) -> GeometryHandle;

    /// Stop rendering `handle`. Returns `false` if it was unknown.
    fn remove(&self, handle: GeometryHandle) -> bool;
}
