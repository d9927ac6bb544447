//! Server-side debug geometry broadcast for ShapeCast.
//!
//! Game logic issues draw calls (points, lines, boxes, circles, spheres,
//! arrows) from any thread. Each call is turned into a packet of wire shape
//! records, broadcast to every connected client and retained, so clients that
//! join later get the same geometry replayed to them.
//!
//! # Architecture
//!
//! - [`DebugDrawHandler`] - Per-session drawing front end (one per instance)
//! - [`GeometryRegistry`] - Sharded store of retained packets, one per handler
//! - [`InstanceDirectory`] - Process-wide list of live handler registries
//! - [`Dispatcher`] - Hands packets to the host [`Transport`]
//! - [`JoinHook`] - Replays every retained packet to a newly initialized client
//! - [`Segmenter`] - Splits long lines and arrows into bounded-length chunks
//!
//! Geometry the wire format cannot carry is drawn through a host
//! [`FallbackRenderer`]; oversized boxes, circles and spheres through an
//! optional [`LargeShapeRenderer`].
//!
//! # Usage
//!
//! ```ignore
//! // Setup (once)
//! let directory = Arc::new(InstanceDirectory::new());
//! let dispatcher = Dispatcher::new(transport);
//! JoinHook::new(directory.clone(), dispatcher.clone()).install();
//!
//! // Per session:
//! let config = DebugDrawConfig::load(Path::new("debug_draw.toml"))?;
//! let handler = DebugDrawHandler::new(directory.clone(), dispatcher, fallback, config)?;
//!
//! // From any thread:
//! let handle = handler.draw_line(DimensionId::OVERWORLD, a, b, Color::RED, None);
//! handler.draw_box(DimensionId::OVERWORLD, &aabb, Color::GREEN, None);
//! handler.remove(handle);
//! ```

mod config;
mod directory;
mod dispatch;
mod error;
mod fallback;
mod handler;
mod ids;
mod join;
mod registry;
mod segmenter;
mod shape;
mod transport;
pub mod wireframe;

#[cfg(test)]
mod test_support;

pub use config::DebugDrawConfig;
pub use directory::{DirectorySlot, InstanceDirectory};
pub use dispatch::{DispatchQueue, Dispatcher, QueuedTransport};
pub use error::{ConfigError, ConfigResult, TransportError, TransportResult};
pub use fallback::{FallbackRenderer, LargeShapeRenderer};
pub use handler::DebugDrawHandler;
pub use ids::{GeometryHandle, NetworkId, NetworkIdAllocator};
pub use join::JoinHook;
pub use registry::{FallbackSource, GeometryRegistry, RegistryEntry};
pub use segmenter::{
    segment_count, split, Segmenter, Span, Terminal, DEFAULT_CHUNK_LENGTH, MAX_SEGMENTS,
};
pub use shape::{ArrowOptions, RetainedPacket, ShapeKind, ShapePayload, ShapeRecord};
pub use transport::{ClientId, JoinCallback, Transport};
