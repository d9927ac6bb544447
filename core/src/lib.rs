//! # ShapeCast Core
//!
//! Value types shared by the ShapeCast crates: vectors, bounding boxes,
//! colors and world dimension ids.

pub mod color;
pub mod dimension;
pub mod math;

pub use color::Color;
pub use dimension::DimensionId;
pub use math::{Aabb, Vec3, vec3};

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logs the library version. Call once from the host at startup.
pub fn init() {
    log::info!("ShapeCast Core v{} initialized", VERSION);
}
