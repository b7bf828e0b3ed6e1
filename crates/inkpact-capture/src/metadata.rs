//! Derived signature metadata.
//!
//! Metadata is recomputed synchronously after every stroke-count-changing
//! mutation, never lazily, so hosts always observe values consistent with
//! the current capture. The output is read-only.

use serde::{Deserialize, Serialize};

use crate::stroke::SignatureCapture;

/// Axis-aligned bounding box over all points of all sealed strokes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum x coordinate.
    pub min_x: f32,
    /// Minimum y coordinate.
    pub min_y: f32,
    /// Maximum x coordinate.
    pub max_x: f32,
    /// Maximum y coordinate.
    pub max_y: f32,
}

impl BoundingBox {
    /// The zero box reported for an empty capture.
    pub const EMPTY: BoundingBox = BoundingBox {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Compute the bounding box of a capture, [`BoundingBox::EMPTY`] when
    /// the capture has no strokes.
    pub fn of(capture: &SignatureCapture) -> Self {
        let mut points = capture.strokes().iter().flat_map(|s| s.points().iter());
        let first = match points.next() {
            Some(p) => p,
            None => return Self::EMPTY,
        };
        let mut bounds = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        bounds
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Whether a point lies inside (inclusive) the box.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Read-only metadata derived from a [`SignatureCapture`].
///
/// `duration_ms` is the wall-clock span from the first to the last recorded
/// point, including pauses between strokes. An abnormally short duration is
/// a soft, informational fraud signal for human review — the core never
/// thresholds or enforces it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureMetadata {
    /// Number of sealed strokes.
    pub stroke_count: usize,
    /// Total points across all sealed strokes.
    pub total_points: usize,
    /// Bounding box over all points; the zero box when empty.
    pub bounding_box: BoundingBox,
    /// Elapsed drawing time in milliseconds (max − min point timestamp).
    pub duration_ms: u64,
    /// Timestamp of the last recorded point, 0 when empty.
    pub captured_at_ms: u64,
}

impl SignatureMetadata {
    /// Metadata for an empty capture.
    pub fn empty() -> Self {
        Self {
            stroke_count: 0,
            total_points: 0,
            bounding_box: BoundingBox::EMPTY,
            duration_ms: 0,
            captured_at_ms: 0,
        }
    }

    /// Derive metadata from the sealed strokes of a capture.
    pub fn of(capture: &SignatureCapture) -> Self {
        if capture.is_empty() {
            return Self::empty();
        }
        let mut min_ts = u64::MAX;
        let mut max_ts = 0u64;
        for stroke in capture.strokes() {
            for p in stroke.points() {
                min_ts = min_ts.min(p.timestamp_ms);
                max_ts = max_ts.max(p.timestamp_ms);
            }
        }
        Self {
            stroke_count: capture.stroke_count(),
            total_points: capture.total_points(),
            bounding_box: BoundingBox::of(capture),
            duration_ms: max_ts.saturating_sub(min_ts),
            captured_at_ms: max_ts,
        }
    }
}

impl Default for SignatureMetadata {
    fn default() -> Self {
        Self::empty()
    }
}
