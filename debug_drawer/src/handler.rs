use std::sync::Arc;

use shapecast_core::{Aabb, Color, DimensionId, Vec3};

use crate::config::DebugDrawConfig;
use crate::directory::{DirectorySlot, InstanceDirectory};
use crate::dispatch::Dispatcher;
use crate::error::ConfigResult;
use crate::fallback::{FallbackRenderer, LargeShapeRenderer};
use crate::ids::{GeometryHandle, NetworkIdAllocator};
use crate::registry::{FallbackSource, GeometryRegistry, RegistryEntry};
use crate::segmenter::{Segmenter, Terminal};
use crate::shape::{ArrowOptions, RetainedPacket, ShapeKind, ShapePayload, ShapeRecord};
use crate::wireframe;

/// Debug geometry of one session.
///
/// Turns draw calls into wire packets, broadcasts each packet once and keeps
/// it in its [`GeometryRegistry`] for replay to clients that join later.
/// Shapes the wire format cannot carry go to the [`FallbackRenderer`];
/// oversized boxes, circles and spheres go to the [`LargeShapeRenderer`] if
/// one is set, or are drawn as segmented wireframes otherwise.
///
/// Draw calls take `&self` and may run concurrently from any thread. The
/// handler is registered in its [`InstanceDirectory`] for its whole
/// lifetime and deregisters on drop.
pub struct DebugDrawHandler {
    config: DebugDrawConfig,
    registry: Arc<GeometryRegistry>,
    directory: Arc<InstanceDirectory>,
    slot: DirectorySlot,
    dispatcher: Dispatcher,
    fallback: Arc<dyn FallbackRenderer>,
    large_shapes: Option<Arc<dyn LargeShapeRenderer>>,
    ids: &'static NetworkIdAllocator,
}

impl DebugDrawHandler {
    /// Create a handler and register it in `directory`.
    pub fn new(
        directory: Arc<InstanceDirectory>,
        dispatcher: Dispatcher,
        fallback: Arc<dyn FallbackRenderer>,
        config: DebugDrawConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let registry = Arc::new(GeometryRegistry::with_shards(config.registry_shards));
        let slot = directory.register(Arc::clone(&registry));
        Ok(Self {
            config,
            registry,
            directory,
            slot,
            dispatcher,
            fallback,
            large_shapes: None,
            ids: NetworkIdAllocator::global(),
        })
    }

    /// Route oversized shapes to `renderer` instead of the built-in
    /// wireframe path.
    pub fn with_large_shapes(mut self, renderer: Arc<dyn LargeShapeRenderer>) -> Self {
        self.large_shapes = Some(renderer);
        self
    }

    /// Current slot in the instance directory.
    pub fn slot(&self) -> Option<usize> {
        self.slot.index()
    }

    pub fn registry(&self) -> &Arc<GeometryRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &DebugDrawConfig {
        &self.config
    }

    fn segmenter(&self) -> Segmenter<'_> {
        Segmenter::new(self.config.chunk_length, self.ids)
    }

    /// Broadcast `records` as one packet, then retain it under a new handle.
    ///
    /// The broadcast must happen before the insertion: a client joining
    /// concurrently then gets the packet live, by replay, or both.
    fn publish(&self, records: Vec<ShapeRecord>) -> GeometryHandle {
        let packet = RetainedPacket::new(records);
        self.dispatcher.broadcast(&packet);
        let handle = GeometryHandle::next();
        self.registry.insert_packet(handle, packet);
        handle
    }

    fn mark(&self, handle: GeometryHandle, source: FallbackSource) -> GeometryHandle {
        if handle.is_some() {
            self.registry.insert_fallback(handle, source);
        }
        handle
    }

    /// Draw a point. Always rendered by the fallback renderer.
    pub fn draw_point(
        &self,
        dim: DimensionId,
        pos: Vec3,
        color: Color,
        radius: Option<f32>,
    ) -> GeometryHandle {
        let handle = self.fallback.point(dim, pos, color, radius);
        self.mark(handle, FallbackSource::Particles)
    }

    /// Draw a line, split into chunks if it is long.
    ///
    /// Returns [`GeometryHandle::NONE`] if `begin == end`. Lines with a
    /// `thickness` are rendered by the fallback renderer.
    pub fn draw_line(
        &self,
        dim: DimensionId,
        begin: Vec3,
        end: Vec3,
        color: Color,
        thickness: Option<f32>,
    ) -> GeometryHandle {
        if begin == end {
            return GeometryHandle::NONE;
        }
        if thickness.is_some() {
            let handle = self.fallback.line(dim, begin, end, color, thickness);
            return self.mark(handle, FallbackSource::Particles);
        }
        match self.segmenter().line(dim, begin, end, color) {
            Some(records) => self.publish(records),
            None => GeometryHandle::NONE,
        }
    }

    /// Draw an axis-aligned box.
    pub fn draw_box(
        &self,
        dim: DimensionId,
        aabb: &Aabb,
        color: Color,
        thickness: Option<f32>,
    ) -> GeometryHandle {
        if thickness.is_some() {
            let handle = self.fallback.aabb(dim, aabb, color, thickness);
            return self.mark(handle, FallbackSource::Particles);
        }
        if self.config.is_large_box(aabb.diagonal_length_squared()) {
            log::debug!("Box {:?}..{:?} drawn through the large-shape path", aabb.min, aabb.max);
            return match &self.large_shapes {
                Some(renderer) => {
                    let handle = renderer.large_box(dim, aabb, color);
                    self.mark(handle, FallbackSource::LargeShapes)
                }
                None => self.draw_wireframe(dim, &wireframe::box_edges(aabb), color),
            };
        }

        let record = ShapeRecord::new(self.ids.next(), ShapeKind::Box, aabb.min, color, dim)
            .with_payload(ShapePayload::Box {
                extents: aabb.extents(),
            });
        self.publish(vec![record])
    }

    /// Draw a circle orthogonal to `normal`.
    pub fn draw_circle(
        &self,
        dim: DimensionId,
        center: Vec3,
        normal: Vec3,
        radius: f32,
        color: Color,
    ) -> GeometryHandle {
        if self.config.is_large_radius(radius) {
            log::debug!("Circle of radius {radius} drawn through the large-shape path");
            return match &self.large_shapes {
                Some(renderer) => {
                    let handle = renderer.large_circle(dim, center, normal, radius, color);
                    self.mark(handle, FallbackSource::LargeShapes)
                }
                None => {
                    let segments = self.config.wireframe_circle_segments;
                    let edges = wireframe::circle_edges(center, normal, radius, segments);
                    self.draw_wireframe(dim, &edges, color)
                }
            };
        }

        let record = ShapeRecord::new(self.ids.next(), ShapeKind::Circle, center, color, dim)
            .with_rotation(normal)
            .with_scale(radius);
        self.publish(vec![record])
    }

    /// Draw a sphere. `segments` is only sent when given.
    pub fn draw_sphere(
        &self,
        dim: DimensionId,
        center: Vec3,
        radius: f32,
        color: Color,
        segments: Option<u8>,
    ) -> GeometryHandle {
        if self.config.is_large_radius(radius) {
            log::debug!("Sphere of radius {radius} drawn through the large-shape path");
            return match &self.large_shapes {
                Some(renderer) => {
                    let handle = renderer.large_sphere(dim, center, radius, color);
                    self.mark(handle, FallbackSource::LargeShapes)
                }
                None => {
                    let segments = self.config.wireframe_circle_segments;
                    let edges = wireframe::sphere_edges(center, radius, segments);
                    self.draw_wireframe(dim, &edges, color)
                }
            };
        }

        let mut record = ShapeRecord::new(self.ids.next(), ShapeKind::Sphere, center, color, dim)
            .with_scale(radius);
        if let Some(segments) = segments {
            record.payload = ShapePayload::Sphere { segments };
        }
        self.publish(vec![record])
    }

    /// Draw an arrow, split into chunks if it is long. Only the last chunk
    /// carries the head.
    ///
    /// Returns [`GeometryHandle::NONE`] if `begin == end`.
    pub fn draw_arrow(
        &self,
        dim: DimensionId,
        begin: Vec3,
        end: Vec3,
        color: Color,
        options: ArrowOptions,
    ) -> GeometryHandle {
        match self.segmenter().arrow(dim, begin, end, color, options) {
            Some(records) => self.publish(records),
            None => GeometryHandle::NONE,
        }
    }

    /// Built-in large-shape path: every edge segmented, all in one packet.
    fn draw_wireframe(
        &self,
        dim: DimensionId,
        edges: &[(Vec3, Vec3)],
        color: Color,
    ) -> GeometryHandle {
        let segmenter = self.segmenter();
        let mut records = Vec::new();
        for &(a, b) in edges {
            segmenter.append(&mut records, dim, a, b, color, Terminal::Line);
        }
        if records.is_empty() {
            return GeometryHandle::NONE;
        }
        self.publish(records)
    }

    /// Forget `handle`.
    ///
    /// Retained packets stop being replayed; fallback handles are removed
    /// from the renderer that drew them. Returns `false` for unknown handles.
    pub fn remove(&self, handle: GeometryHandle) -> bool {
        match self.registry.remove(handle) {
            Some(RegistryEntry::Packet(_)) => true,
            Some(RegistryEntry::Fallback(FallbackSource::Particles)) => {
                self.fallback.remove(handle);
                true
            }
            Some(RegistryEntry::Fallback(FallbackSource::LargeShapes)) => {
                if let Some(renderer) = &self.large_shapes {
                    renderer.remove(handle);
                }
                true
            }
            None => false,
        }
    }
}

impl Drop for DebugDrawHandler {
    fn drop(&mut self) {
        self.directory.deregister(&self.slot);
    }
}
