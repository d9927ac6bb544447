//! Recording doubles for the external collaborators.

use std::sync::Arc;

use parking_lot::Mutex;
use shapecast_core::{Aabb, Color, DimensionId, Vec3};

use crate::error::{TransportError, TransportResult};
use crate::fallback::{FallbackRenderer, LargeShapeRenderer};
use crate::ids::GeometryHandle;
use crate::registry::GeometryRegistry;
use crate::shape::RetainedPacket;
use crate::transport::{ClientId, JoinCallback, Transport};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    All(RetainedPacket),
    One(ClientId, RetainedPacket),
}

/// Transport that records every send and lets tests fire join events.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    callbacks: Mutex<Vec<JoinCallback>>,
    watched: Mutex<Option<Arc<GeometryRegistry>>>,
    packets_at_broadcast: Mutex<Vec<usize>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose sends all fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn broadcasts(&self) -> Vec<RetainedPacket> {
        self.sent
            .lock()
            .iter()
            .filter_map(|s| match s {
                Sent::All(packet) => Some(packet.clone()),
                Sent::One(..) => None,
            })
            .collect()
    }

    /// Packets sent to `client` alone.
    pub fn sent_to(&self, client: ClientId) -> Vec<RetainedPacket> {
        self.sent
            .lock()
            .iter()
            .filter_map(|s| match s {
                Sent::One(c, packet) if *c == client => Some(packet.clone()),
                _ => None,
            })
            .collect()
    }

    /// Record `registry.packet_count()` at the moment of every broadcast.
    pub fn watch(&self, registry: Arc<GeometryRegistry>) {
        *self.watched.lock() = Some(registry);
    }

    pub fn packets_at_broadcast(&self) -> Vec<usize> {
        self.packets_at_broadcast.lock().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    pub fn join_callback_count(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// Run every registered join callback for `client`.
    pub fn fire_join(&self, client: ClientId) {
        for callback in self.callbacks.lock().iter() {
            callback(client);
        }
    }
}

impl Transport for RecordingTransport {
    fn send_to_all(&self, packet: &RetainedPacket) -> TransportResult<()> {
        let watched = self.watched.lock().clone();
        if let Some(registry) = watched {
            self.packets_at_broadcast.lock().push(registry.packet_count());
        }
        if self.fail {
            return Err(TransportError::Closed);
        }
        self.sent.lock().push(Sent::All(packet.clone()));
        Ok(())
    }

    fn send_to(&self, client: ClientId, packet: &RetainedPacket) -> TransportResult<()> {
        if self.fail {
            return Err(TransportError::Disconnected(client));
        }
        self.sent.lock().push(Sent::One(client, packet.clone()));
        Ok(())
    }

    fn on_client_initialized(&self, callback: JoinCallback) {
        self.callbacks.lock().push(callback);
    }
}

/// Fallback renderer that records which primitive each handle came from.
#[derive(Default)]
pub struct RecordingFallback {
    drawn: Mutex<Vec<(&'static str, GeometryHandle)>>,
    removed: Mutex<Vec<GeometryHandle>>,
}

impl RecordingFallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawn(&self) -> Vec<(&'static str, GeometryHandle)> {
        self.drawn.lock().clone()
    }

    pub fn removed(&self) -> Vec<GeometryHandle> {
        self.removed.lock().clone()
    }

    fn record(&self, kind: &'static str) -> GeometryHandle {
        let handle = GeometryHandle::next();
        self.drawn.lock().push((kind, handle));
        handle
    }
}

impl FallbackRenderer for RecordingFallback {
    fn point(&self, _: DimensionId, _: Vec3, _: Color, _: Option<f32>) -> GeometryHandle {
        self.record("point")
    }

    fn line(&self, _: DimensionId, _: Vec3, _: Vec3, _: Color, _: Option<f32>) -> GeometryHandle {
        self.record("line")
    }

    fn aabb(&self, _: DimensionId, _: &Aabb, _: Color, _: Option<f32>) -> GeometryHandle {
        self.record("aabb")
    }

    fn remove(&self, handle: GeometryHandle) -> bool {
        self.removed.lock().push(handle);
        true
    }
}

/// Large-shape renderer that records which primitive each handle came from.
#[derive(Default)]
pub struct RecordingLargeShapes {
    drawn: Mutex<Vec<(&'static str, GeometryHandle)>>,
    removed: Mutex<Vec<GeometryHandle>>,
}

impl RecordingLargeShapes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawn(&self) -> Vec<(&'static str, GeometryHandle)> {
        self.drawn.lock().clone()
    }

    pub fn removed(&self) -> Vec<GeometryHandle> {
        self.removed.lock().clone()
    }

    fn record(&self, kind: &'static str) -> GeometryHandle {
        let handle = GeometryHandle::next();
        self.drawn.lock().push((kind, handle));
        handle
    }
}

impl LargeShapeRenderer for RecordingLargeShapes {
    fn large_box(&self, _: DimensionId, _: &Aabb, _: Color) -> GeometryHandle {
        self.record("box")
    }

    fn large_circle(&self, _: DimensionId, _: Vec3, _: Vec3, _: f32, _: Color) -> GeometryHandle {
        self.record("circle")
    }

    fn large_sphere(&self, _: DimensionId, _: Vec3, _: f32, _: Color) -> GeometryHandle {
        self.record("sphere")
    }

    fn remove(&self, handle: GeometryHandle) -> bool {
        self.removed.lock().push(handle);
        true
    }
}
