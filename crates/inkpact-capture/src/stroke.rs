//! Stroke and capture containers.
//!
//! A [`Stroke`] is one continuous pen-down-to-pen-up drawing segment. Its
//! point list is append-only while the stroke is open inside the recorder;
//! once sealed it is immutable. A [`SignatureCapture`] is the ordered list
//! of sealed strokes owned by exactly one recorder/session.

use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::raster::Rgba8;

/// Minimum number of points in a stroke the recorder will seal.
///
/// End-of-stroke buffers below this are discarded: a single isolated point
/// is a stray tap, not ink.
pub const MIN_SEALED_POINTS: usize = 2;

/// One sealed pen-down-to-pen-up drawing segment.
///
/// Invariant: a sealed stroke always has at least one point. The recorder
/// only seals buffers with at least [`MIN_SEALED_POINTS`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<Point>,
    color: Rgba8,
    width: f32,
}

impl Stroke {
    /// Seal a stroke from its recorded points.
    ///
    /// Returns `None` when `points` is empty — a zero-point stroke cannot
    /// exist.
    pub fn new(points: Vec<Point>, color: Rgba8, width: f32) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            points,
            color,
            width,
        })
    }

    /// The ordered points of this stroke.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The stroke color.
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// The stroke width in logical pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// The first recorded point.
    pub fn first(&self) -> Point {
        self.points[0]
    }

    /// The last recorded point.
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// The ordered list of sealed strokes for one signing session.
///
/// Owned exclusively by one recorder; destroyed on clear/cancel. Mutation
/// goes through the recorder, which keeps raster and metadata in sync.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureCapture {
    strokes: Vec<Stroke>,
}

impl SignatureCapture {
    /// Create an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no strokes have been sealed.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// The sealed strokes in draw order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of sealed strokes.
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Total points across all sealed strokes.
    pub fn total_points(&self) -> usize {
        self.strokes.iter().map(|s| s.points().len()).sum()
    }

    pub(crate) fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub(crate) fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.strokes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32, ts: u64) -> Point {
        Point::new(x, y, None, ts)
    }

    #[test]
    fn test_stroke_rejects_empty_points() {
        assert!(Stroke::new(vec![], Rgba8::BLACK, 2.0).is_none());
    }

    #[test]
    fn test_stroke_accessors() {
        let stroke = Stroke::new(vec![pt(1.0, 2.0, 10), pt(3.0, 4.0, 20)], Rgba8::BLACK, 2.5)
            .unwrap();
        assert_eq!(stroke.points().len(), 2);
        assert_eq!(stroke.first().timestamp_ms, 10);
        assert_eq!(stroke.last().timestamp_ms, 20);
        assert_eq!(stroke.width(), 2.5);
    }

    #[test]
    fn test_capture_counts() {
        let mut capture = SignatureCapture::new();
        assert!(capture.is_empty());
        capture.push(Stroke::new(vec![pt(0.0, 0.0, 0), pt(1.0, 1.0, 1)], Rgba8::BLACK, 2.0).unwrap());
        capture.push(
            Stroke::new(
                vec![pt(2.0, 2.0, 2), pt(3.0, 3.0, 3), pt(4.0, 4.0, 4)],
                Rgba8::BLACK,
                2.0,
            )
            .unwrap(),
        );
        assert!(!capture.is_empty());
        assert_eq!(capture.stroke_count(), 2);
        assert_eq!(capture.total_points(), 5);
    }

    #[test]
    fn test_capture_pop_and_clear() {
        let mut capture = SignatureCapture::new();
        capture.push(Stroke::new(vec![pt(0.0, 0.0, 0), pt(1.0, 1.0, 1)], Rgba8::BLACK, 2.0).unwrap());
        assert!(capture.pop().is_some());
        assert!(capture.pop().is_none());
        capture.push(Stroke::new(vec![pt(0.0, 0.0, 0), pt(1.0, 1.0, 1)], Rgba8::BLACK, 2.0).unwrap());
        capture.clear();
        assert!(capture.is_empty());
    }

    #[test]
    fn test_stroke_serde_roundtrip() {
        let stroke = Stroke::new(vec![pt(1.0, 2.0, 10), pt(3.0, 4.0, 20)], Rgba8::BLACK, 2.0)
            .unwrap();
        let json = serde_json::to_string(&stroke).unwrap();
        let back: Stroke = serde_json::from_str(&json).unwrap();
        assert_eq!(stroke, back);
    }
}
