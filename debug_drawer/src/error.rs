//! Error types at the boundaries of the debug drawer.
//!
//! Draw calls themselves never fail; these cover loading configuration and
//! the transport reporting a failed send.

use std::path::PathBuf;

use thiserror::Error;

use crate::transport::ClientId;

/// Errors raised while loading or validating a
/// [`DebugDrawConfig`](crate::DebugDrawConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("chunk_length must be positive and finite, got {0}")]
    InvalidChunkLength(f32),
    #[error("{name} must be positive and finite, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("registry_shards must be a non-zero power of two, got {0}")]
    InvalidShardCount(usize),
    #[error("wireframe_circle_segments must be at least 3, got {0}")]
    InvalidCircleSegments(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors reported by a [`Transport`](crate::Transport) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("client {0} is not connected")]
    Disconnected(ClientId),
    #[error("transport is closed")]
    Closed,
    #[error("packet rejected: {0}")]
    Rejected(String),
}

pub type TransportResult<T> = Result<T, TransportError>;
