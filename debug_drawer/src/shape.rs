use shapecast_core::{Color, DimensionId, Vec3};

use crate::ids::NetworkId;

/// Primitive kind of a [`ShapeRecord`].
///
/// Points have no wire primitive and always go to the fallback renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Box,
    Circle,
    Sphere,
    Arrow,
}

/// Kind-specific extra data of a [`ShapeRecord`].
///
/// The byte layout is owned by the transport; this only fixes which fields
/// each kind carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapePayload {
    /// Circles, and spheres drawn without an explicit segment count.
    None,
    Line {
        end: Vec3,
    },
    Box {
        extents: Vec3,
    },
    Sphere {
        segments: u8,
    },
    Arrow {
        end: Vec3,
        head_length: Option<f32>,
        head_radius: Option<f32>,
        segments: Option<u8>,
    },
}

/// Optional arrow head parameters. Unset fields use the client defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArrowOptions {
    pub head_length: Option<f32>,
    pub head_radius: Option<f32>,
    pub segments: Option<u8>,
}

/// One wire-level primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    pub network_id: NetworkId,
    pub kind: ShapeKind,
    pub location: Vec3,
    pub rotation: Option<Vec3>,
    pub scale: Option<f32>,
    pub color: Color,
    pub dimension: DimensionId,
    pub payload: ShapePayload,
}

impl ShapeRecord {
    /// Record with no rotation, scale or payload.
    pub fn new(
        network_id: NetworkId,
        kind: ShapeKind,
        location: Vec3,
        color: Color,
        dimension: DimensionId,
    ) -> Self {
        Self {
            network_id,
            kind,
            location,
            rotation: None,
            scale: None,
            color,
            dimension,
            payload: ShapePayload::None,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_payload(mut self, payload: ShapePayload) -> Self {
        self.payload = payload;
        self
    }

    /// End point for line and arrow records.
    pub fn end_point(&self) -> Option<Vec3> {
        match self.payload {
            ShapePayload::Line { end } | ShapePayload::Arrow { end, .. } => Some(end),
            _ => None,
        }
    }
}

/// Immutable packet of shape records built by one draw call.
///
/// Broadcast once when built and kept for replay to clients that join later.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedPacket {
    shapes: Vec<ShapeRecord>,
}

impl RetainedPacket {
    pub fn new(shapes: Vec<ShapeRecord>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl From<ShapeRecord> for RetainedPacket {
    fn from(shape: ShapeRecord) -> Self {
        Self::new(vec![shape])
    }
}
