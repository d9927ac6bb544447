//! Splitting of long straight primitives into bounded-length chunks.
//!
//! A single wire record can only represent a straight line up to a fixed
//! length. Longer lines and arrows are rewritten into `n + 1` connected
//! pieces, `n = floor(length / chunk_length)`. All pieces but the last are
//! plain lines; the last one carries the terminal kind (line or arrow) and
//! ends exactly at the requested end point.

use shapecast_core::{Color, DimensionId, Vec3};

use crate::ids::NetworkIdAllocator;
use crate::shape::{ArrowOptions, ShapeKind, ShapePayload, ShapeRecord};

/// Default chunk length in world units.
pub const DEFAULT_CHUNK_LENGTH: f32 = 150.0;

/// One straight piece of a split primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: Vec3,
    pub end: Vec3,
}

/// Largest number of full chunks a single primitive may be split into.
pub const MAX_SEGMENTS: usize = 65_535;

/// Number of full chunks in `begin -> end`.
///
/// The primitive is emitted as `segment_count + 1` pieces. Returns `None`
/// if the length is not finite or needs more than [`MAX_SEGMENTS`] chunks.
pub fn segment_count(begin: &Vec3, end: &Vec3, chunk_length: f32) -> Option<usize> {
    let chunks = ((end - begin).norm() / chunk_length).floor();
    if !chunks.is_finite() || chunks > MAX_SEGMENTS as f32 {
        return None;
    }
    Some(chunks as usize)
}

/// Split `begin -> end` into connected spans.
///
/// Returns `None` when `begin == end`, and when the primitive is too long to
/// split (see [`segment_count`]). Intermediate points are computed as
/// `begin + k * step` rather than accumulated, and the last span ends at
/// `end` verbatim.
pub fn split(begin: Vec3, end: Vec3, chunk_length: f32) -> Option<Vec<Span>> {
    if begin == end {
        return None;
    }

    let Some(count) = segment_count(&begin, &end, chunk_length) else {
        log::warn!(
            "Dropping primitive {:?} -> {:?}: length {} cannot be split into at most {} chunks",
            begin,
            end,
            (end - begin).norm(),
            MAX_SEGMENTS
        );
        return None;
    };
    let step = (end - begin) / (count + 1) as f32;

    let mut spans = Vec::with_capacity(count + 1);
    let mut start = begin;
    for k in 1..=count {
        let next = begin + step * k as f32;
        spans.push(Span { start, end: next });
        start = next;
    }
    spans.push(Span { start, end });
    Some(spans)
}

/// Kind of the last record emitted for a split primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terminal {
    Line,
    Arrow(ArrowOptions),
}

/// Turns split spans into shape records with fresh network ids.
pub struct Segmenter<'a> {
    chunk_length: f32,
    ids: &'a NetworkIdAllocator,
}

impl<'a> Segmenter<'a> {
    pub fn new(chunk_length: f32, ids: &'a NetworkIdAllocator) -> Self {
        Self { chunk_length, ids }
    }

    /// Records for a line, or `None` if the line is degenerate.
    pub fn line(
        &self,
        dim: DimensionId,
        begin: Vec3,
        end: Vec3,
        color: Color,
    ) -> Option<Vec<ShapeRecord>> {
        let mut records = Vec::new();
        self.append(&mut records, dim, begin, end, color, Terminal::Line)
            .then_some(records)
    }

    /// Records for an arrow, or `None` if the arrow is degenerate.
    pub fn arrow(
        &self,
        dim: DimensionId,
        begin: Vec3,
        end: Vec3,
        color: Color,
        options: ArrowOptions,
    ) -> Option<Vec<ShapeRecord>> {
        let mut records = Vec::new();
        self.append(&mut records, dim, begin, end, color, Terminal::Arrow(options))
            .then_some(records)
    }

    /// Append the records of one primitive to `records`.
    ///
    /// Returns `false` and appends nothing if `begin == end`.
    pub fn append(
        &self,
        records: &mut Vec<ShapeRecord>,
        dim: DimensionId,
        begin: Vec3,
        end: Vec3,
        color: Color,
        terminal: Terminal,
    ) -> bool {
        let Some(spans) = split(begin, end, self.chunk_length) else {
            return false;
        };
        if spans.len() > 1 {
            log::warn!(
                "Splitting {:?} of length {:.1} into {} chunks",
                terminal_kind(terminal),
                (end - begin).norm(),
                spans.len()
            );
        }

        records.reserve(spans.len());
        let last = spans.len() - 1;
        for (i, span) in spans.into_iter().enumerate() {
            let record = ShapeRecord::new(self.ids.next(), ShapeKind::Line, span.start, color, dim);
            let record = match terminal {
                Terminal::Arrow(options) if i == last => ShapeRecord {
                    kind: ShapeKind::Arrow,
                    payload: ShapePayload::Arrow {
                        end: span.end,
                        head_length: options.head_length,
                        head_radius: options.head_radius,
                        segments: options.segments,
                    },
                    ..record
                },
                _ => record.with_payload(ShapePayload::Line { end: span.end }),
            };
            records.push(record);
        }
        true
    }
}

fn terminal_kind(terminal: Terminal) -> ShapeKind {
    match terminal {
        Terminal::Line => ShapeKind::Line,
        Terminal::Arrow(_) => ShapeKind::Arrow,
    }
}
