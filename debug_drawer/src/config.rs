use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::registry::GeometryRegistry;
use crate::segmenter::DEFAULT_CHUNK_LENGTH;

/// Tunables of a [`DebugDrawHandler`](crate::DebugDrawHandler).
///
/// Read from a standalone TOML document whose keys sit at the top level:
///
/// ```toml
/// chunk_length = 150.0
/// large_box_diagonal = 150.0
/// large_radius = 150.0
/// registry_shards = 64
/// wireframe_circle_segments = 32
/// ```
///
/// Every key is optional. Unknown keys and tables are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebugDrawConfig {
    /// Longest straight line a single record may carry.
    pub chunk_length: f32,
    /// Boxes with `diagonal² >= large_box_diagonal²` take the large-shape path.
    pub large_box_diagonal: f32,
    /// Circles and spheres with `radius > large_radius` take the large-shape path.
    pub large_radius: f32,
    /// Shard count of each geometry registry. Must be a power of two.
    pub registry_shards: usize,
    /// Chords per circle in the built-in wireframe path.
    pub wireframe_circle_segments: u32,
}

impl Default for DebugDrawConfig {
    fn default() -> Self {
        Self {
            chunk_length: DEFAULT_CHUNK_LENGTH,
            large_box_diagonal: 150.0,
            large_radius: 150.0,
            registry_shards: GeometryRegistry::DEFAULT_SHARDS,
            wireframe_circle_segments: 32,
        }
    }
}

impl DebugDrawConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded debug draw config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.chunk_length.is_finite() && self.chunk_length > 0.0) {
            return Err(ConfigError::InvalidChunkLength(self.chunk_length));
        }
        for (name, value) in [
            ("large_box_diagonal", self.large_box_diagonal),
            ("large_radius", self.large_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        if !self.registry_shards.is_power_of_two() {
            return Err(ConfigError::InvalidShardCount(self.registry_shards));
        }
        if self.wireframe_circle_segments < 3 {
            return Err(ConfigError::InvalidCircleSegments(
                self.wireframe_circle_segments,
            ));
        }
        Ok(())
    }

    /// Whether a box with this squared diagonal takes the large-shape path.
    pub fn is_large_box(&self, diagonal_length_squared: f32) -> bool {
        diagonal_length_squared >= self.large_box_diagonal * self.large_box_diagonal
    }

    /// Whether a circle or sphere of this radius takes the large-shape path.
    pub fn is_large_radius(&self, radius: f32) -> bool {
        radius > self.large_radius
    }
}
