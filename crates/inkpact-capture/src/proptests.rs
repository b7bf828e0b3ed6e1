//! Property-based tests for capture components.
//!
//! These tests verify geometry invariants:
//!
//! - Bounding boxes contain every recorded point
//! - Draw duration is non-negative and spans min/max timestamps
//! - Normalization is consistent with the geometry scale factors
//! - Rendering is deterministic for arbitrary stroke lists

use proptest::prelude::*;

use crate::metadata::{BoundingBox, SignatureMetadata};
use crate::point::{CanvasGeometry, Point, PointSampler, PointerSample};
use crate::raster::{RasterSurface, Rgba8};
use crate::recorder::StrokeRecorder;
use crate::stroke::{SignatureCapture, Stroke};

fn arb_point() -> impl Strategy<Value = Point> {
    (0.0f32..64.0, 0.0f32..64.0, 0u64..100_000)
        .prop_map(|(x, y, ts)| Point::new(x, y, None, ts))
}

fn arb_stroke() -> impl Strategy<Value = Stroke> {
    proptest::collection::vec(arb_point(), 2..12)
        .prop_map(|points| Stroke::new(points, Rgba8::BLACK, 2.0).expect("non-empty"))
}

fn capture_of(strokes: Vec<Stroke>) -> SignatureCapture {
    let mut recorder = StrokeRecorder::new(64, 64, Rgba8::BLACK, 2.0).expect("surface");
    for stroke in &strokes {
        let points = stroke.points();
        recorder.begin(points[0]).expect("begin");
        for p in &points[1..] {
            recorder.extend(*p).expect("extend");
        }
        recorder.end().expect("end");
    }
    recorder.capture().clone()
}

proptest! {
    /// The bounding box contains every point of every stroke.
    #[test]
    fn bounding_box_contains_all_points(strokes in proptest::collection::vec(arb_stroke(), 1..5)) {
        let capture = capture_of(strokes);
        let bounds = BoundingBox::of(&capture);
        for stroke in capture.strokes() {
            for p in stroke.points() {
                prop_assert!(bounds.contains(p.x, p.y));
            }
        }
    }

    /// Duration equals the min/max timestamp span and never underflows.
    #[test]
    fn duration_spans_timestamps(strokes in proptest::collection::vec(arb_stroke(), 1..5)) {
        let capture = capture_of(strokes);
        let meta = SignatureMetadata::of(&capture);
        let min = capture
            .strokes()
            .iter()
            .flat_map(|s| s.points())
            .map(|p| p.timestamp_ms)
            .min()
            .unwrap_or(0);
        let max = capture
            .strokes()
            .iter()
            .flat_map(|s| s.points())
            .map(|p| p.timestamp_ms)
            .max()
            .unwrap_or(0);
        prop_assert_eq!(meta.duration_ms, max - min);
        prop_assert_eq!(meta.captured_at_ms, max);
    }

    /// Appending points never decreases the running duration.
    #[test]
    fn duration_monotonic_under_appends(mut timestamps in proptest::collection::vec(0u64..100_000, 2..20)) {
        timestamps.sort_unstable();
        let mut recorder = StrokeRecorder::new(64, 64, Rgba8::BLACK, 2.0).expect("surface");
        let mut last_duration = 0;
        for (i, chunk) in timestamps.chunks(2).enumerate() {
            if chunk.len() < 2 {
                break;
            }
            let x = i as f32;
            recorder.begin(Point::new(x, 0.0, None, chunk[0])).expect("begin");
            recorder.extend(Point::new(x, 1.0, None, chunk[1])).expect("extend");
            recorder.end().expect("end");
            let duration = recorder.metadata().duration_ms;
            prop_assert!(duration >= last_duration);
            last_duration = duration;
        }
    }

    /// Equal stroke lists render to byte-identical PNG output.
    #[test]
    fn render_deterministic(strokes in proptest::collection::vec(arb_stroke(), 0..4)) {
        let mut a = RasterSurface::new(64, 64).expect("surface");
        a.render_all(&strokes);
        let mut b = RasterSurface::new(64, 64).expect("surface");
        b.render_all(&strokes);
        prop_assert_eq!(a.encode_png().expect("png"), b.encode_png().expect("png"));
    }

    /// Normalization maps the client box corners onto the logical box.
    #[test]
    fn normalization_respects_scale(
        (cw, ch) in (50.0f32..500.0, 50.0f32..500.0),
        (lw, lh) in (50.0f32..500.0, 50.0f32..500.0),
        t in 0.0f32..=1.0,
    ) {
        let geometry = CanvasGeometry::new(0.0, 0.0, cw, ch, lw, lh).expect("geometry");
        let sampler = PointSampler::new(geometry);
        let p = sampler.sample(PointerSample {
            client_x: cw * t,
            client_y: ch * t,
            pressure: None,
            timestamp_ms: 0,
        });
        prop_assert!((p.x - lw * t).abs() < 1e-2 * lw);
        prop_assert!((p.y - lh * t).abs() < 1e-2 * lh);
    }
}
