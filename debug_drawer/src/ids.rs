use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Network-visible id carried by every [`ShapeRecord`](crate::ShapeRecord).
///
/// Clients number their own shapes upwards from zero; the server numbers
/// downwards from `u64::MAX`, so the two ranges never meet in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkId(pub u64);

/// Lock-free allocator of strictly decreasing [`NetworkId`]s.
///
/// One process-wide instance is shared by every handler through
/// [`global()`](Self::global). Exhausting the id space is not guarded.
pub struct NetworkIdAllocator {
    next: AtomicU64,
}

static GLOBAL_NETWORK_IDS: NetworkIdAllocator = NetworkIdAllocator::new();

impl NetworkIdAllocator {
    /// Create an allocator whose first id is `u64::MAX`.
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(u64::MAX),
        }
    }

    /// The process-wide allocator.
    pub fn global() -> &'static Self {
        &GLOBAL_NETWORK_IDS
    }

    /// Take the next id.
    #[inline]
    pub fn next(&self) -> NetworkId {
        NetworkId(self.next.fetch_sub(1, Ordering::Relaxed))
    }

    /// Peek at the id the next call to [`next()`](Self::next) will return.
    pub fn peek(&self) -> NetworkId {
        NetworkId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for NetworkIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-facing handle of one draw call.
///
/// Handles are issued from a process-wide increasing counter starting at 1.
/// [`GeometryHandle::NONE`] (value 0) means "nothing drawn".
///
/// External [`FallbackRenderer`](crate::FallbackRenderer) and
/// [`LargeShapeRenderer`](crate::LargeShapeRenderer) implementations must
/// allocate their handles through [`GeometryHandle::next()`] so they never
/// collide with handles issued by the handler itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GeometryHandle(pub u64);

static NEXT_GEOMETRY_HANDLE: AtomicU64 = AtomicU64::new(1);

impl GeometryHandle {
    /// Sentinel returned by degenerate draw calls.
    pub const NONE: Self = Self(0);

    /// Allocate a fresh handle.
    pub fn next() -> Self {
        Self(NEXT_GEOMETRY_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

impl fmt::Display for GeometryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geo#{}", self.0)
    }
}
