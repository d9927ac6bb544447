use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::ids::GeometryHandle;
use crate::shape::RetainedPacket;

/// Which external path renders a fallback-marked geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackSource {
    /// The particle-based [`FallbackRenderer`](crate::FallbackRenderer).
    Particles,
    /// An external [`LargeShapeRenderer`](crate::LargeShapeRenderer).
    LargeShapes,
}

/// What the registry knows about one geometry.
#[derive(Debug, Clone)]
pub enum RegistryEntry {
    /// Wire packet kept for replay.
    Packet(Arc<RetainedPacket>),
    /// Rendered by an external path that syncs clients itself. Never replayed.
    Fallback(FallbackSource),
}

impl RegistryEntry {
    pub fn packet(&self) -> Option<&Arc<RetainedPacket>> {
        match self {
            Self::Packet(packet) => Some(packet),
            Self::Fallback(_) => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

type Shard = RwLock<HashMap<GeometryHandle, RegistryEntry>>;

/// Concurrent map from [`GeometryHandle`] to [`RegistryEntry`].
///
/// Split into a power-of-two number of independently locked shards; the
/// shard is picked by hashing the handle. Operations on handles in different
/// shards never contend.
pub struct GeometryRegistry {
    shards: Box<[Shard]>,
    hasher: RandomState,
}

impl GeometryRegistry {
    /// Default number of shards.
    pub const DEFAULT_SHARDS: usize = 64;

    pub fn new() -> Self {
        Self::with_shards(Self::DEFAULT_SHARDS)
    }

    /// Create a registry with `shards` shards, rounded up to a power of two.
    pub fn with_shards(shards: usize) -> Self {
        let count = shards.max(1).next_power_of_two();
        Self {
            shards: (0..count).map(|_| RwLock::new(HashMap::new())).collect(),
            hasher: RandomState::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, handle: GeometryHandle) -> &Shard {
        let index = self.hasher.hash_one(handle) as usize & (self.shards.len() - 1);
        &self.shards[index]
    }

    /// Insert or replace the entry for `handle`.
    pub fn insert(&self, handle: GeometryHandle, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.shard(handle).write().insert(handle, entry)
    }

    /// Retain `packet` under `handle`.
    pub fn insert_packet(&self, handle: GeometryHandle, packet: RetainedPacket) {
        self.insert(handle, RegistryEntry::Packet(Arc::new(packet)));
    }

    /// Mark `handle` as rendered by an external path.
    pub fn insert_fallback(&self, handle: GeometryHandle, source: FallbackSource) {
        self.insert(handle, RegistryEntry::Fallback(source));
    }

    pub fn get(&self, handle: GeometryHandle) -> Option<RegistryEntry> {
        self.shard(handle).read().get(&handle).cloned()
    }

    pub fn contains(&self, handle: GeometryHandle) -> bool {
        self.shard(handle).read().contains_key(&handle)
    }

    pub fn remove(&self, handle: GeometryHandle) -> Option<RegistryEntry> {
        self.shard(handle).write().remove(&handle)
    }

    /// Total number of entries. Not a snapshot under concurrent writes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    /// Number of entries holding a replayable packet.
    pub fn packet_count(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().values().filter(|e| !e.is_fallback()).count())
            .sum()
    }

    /// Visit every retained packet.
    ///
    /// Each shard's packets are cloned out under its read lock and visited
    /// after the lock is released, so `f` may take as long as it needs
    /// without blocking writers. Fallback entries are skipped.
    pub fn for_each_packet(&self, mut f: impl FnMut(GeometryHandle, &RetainedPacket)) {
        let mut batch: Vec<(GeometryHandle, Arc<RetainedPacket>)> = Vec::new();
        for shard in self.shards.iter() {
            batch.extend(
                shard
                    .read()
                    .iter()
                    .filter_map(|(handle, entry)| entry.packet().map(|p| (*handle, Arc::clone(p)))),
            );
            for (handle, packet) in batch.drain(..) {
                f(handle, &packet);
            }
        }
    }
}

impl Default for GeometryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
