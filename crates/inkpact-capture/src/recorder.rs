//! Stroke recording with incremental rendering.
//!
//! The recorder owns the raster surface, the sealed-stroke list, and the
//! open-stroke buffer for one signing session. Every mutation returns a
//! [`CaptureUpdate`] carrying the current emptiness and raster encoding so
//! hosts can enable/disable Submit reactively.

use tracing::debug;

use crate::error::Result;
use crate::metadata::SignatureMetadata;
use crate::point::Point;
use crate::raster::{RasterSurface, Rgba8};
use crate::stroke::{SignatureCapture, Stroke, MIN_SEALED_POINTS};

/// Snapshot emitted after every recorder mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureUpdate {
    /// Whether the capture currently has no sealed strokes.
    pub is_empty: bool,
    /// The current composited raster, PNG-encoded.
    pub raster_png: Vec<u8>,
}

/// Records strokes from normalized points and keeps raster and metadata in
/// sync.
///
/// Only sealed strokes count toward emptiness and metadata; the open-stroke
/// buffer is working state that either seals on [`StrokeRecorder::end`] or
/// is discarded when it has fewer than [`MIN_SEALED_POINTS`] points.
pub struct StrokeRecorder {
    surface: RasterSurface,
    capture: SignatureCapture,
    open: Vec<Point>,
    pen_color: Rgba8,
    pen_width: f32,
    metadata: SignatureMetadata,
}

impl StrokeRecorder {
    /// Create a recorder with the given surface size and pen style.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CaptureError::CanvasUnsupported`] for degenerate
    /// dimensions. This is the single capture failure mode, reported once.
    pub fn new(width: u32, height: u32, pen_color: Rgba8, pen_width: f32) -> Result<Self> {
        Ok(Self {
            surface: RasterSurface::new(width, height)?,
            capture: SignatureCapture::new(),
            open: Vec::new(),
            pen_color,
            pen_width,
            metadata: SignatureMetadata::empty(),
        })
    }

    /// Open a new stroke at `point`.
    ///
    /// An already-open stroke is sealed first, exactly as if the host had
    /// called [`StrokeRecorder::end`] — pointer-up events can be lost, and
    /// a new pen-down is unambiguous.
    pub fn begin(&mut self, point: Point) -> Result<CaptureUpdate> {
        if !self.open.is_empty() {
            self.seal_open();
        }
        self.open.push(point);
        self.surface
            .draw_segment(point, point, self.pen_color, self.pen_width);
        self.update()
    }

    /// Append a point to the open stroke and render only the incremental
    /// segment between the last two points.
    ///
    /// A stray move with no open stroke is ignored.
    pub fn extend(&mut self, point: Point) -> Result<CaptureUpdate> {
        if let Some(&last) = self.open.last() {
            self.open.push(point);
            self.surface
                .draw_segment(last, point, self.pen_color, self.pen_width);
        }
        self.update()
    }

    /// Seal the open stroke.
    ///
    /// Buffers with fewer than [`MIN_SEALED_POINTS`] points are discarded
    /// and their incremental ink erased by a full redraw.
    pub fn end(&mut self) -> Result<CaptureUpdate> {
        self.seal_open();
        self.update()
    }

    /// Remove the last sealed stroke and fully redraw the remainder.
    pub fn undo(&mut self) -> Result<CaptureUpdate> {
        if self.capture.pop().is_some() {
            debug!(strokes = self.capture.stroke_count(), "undo stroke");
            self.redraw();
        }
        self.update()
    }

    /// Discard all strokes and reset the surface.
    pub fn clear(&mut self) -> Result<CaptureUpdate> {
        self.capture.clear();
        self.open.clear();
        self.redraw();
        self.update()
    }

    /// Whether the capture has no sealed strokes.
    pub fn is_empty(&self) -> bool {
        self.capture.is_empty()
    }

    /// The sealed capture.
    pub fn capture(&self) -> &SignatureCapture {
        &self.capture
    }

    /// Metadata for the sealed capture, recomputed after every
    /// stroke-count-changing mutation.
    pub fn metadata(&self) -> &SignatureMetadata {
        &self.metadata
    }

    /// The current composited raster as PNG bytes.
    pub fn render_png(&self) -> Result<Vec<u8>> {
        self.surface.encode_png()
    }

    /// Surface width in pixels.
    pub fn surface_width(&self) -> u32 {
        self.surface.width()
    }

    /// Surface height in pixels.
    pub fn surface_height(&self) -> u32 {
        self.surface.height()
    }

    fn seal_open(&mut self) {
        let points = std::mem::take(&mut self.open);
        if points.len() >= MIN_SEALED_POINTS {
            if let Some(stroke) = Stroke::new(points, self.pen_color, self.pen_width) {
                self.capture.push(stroke);
                debug!(strokes = self.capture.stroke_count(), "sealed stroke");
            }
        } else if !points.is_empty() {
            // The begin() dot was already inked; erase it.
            debug!("discarded stroke below minimum point count");
            self.redraw();
        }
        self.metadata = SignatureMetadata::of(&self.capture);
    }

    fn redraw(&mut self) {
        self.surface.render_all(self.capture.strokes());
        self.metadata = SignatureMetadata::of(&self.capture);
    }

    fn update(&mut self) -> Result<CaptureUpdate> {
        Ok(CaptureUpdate {
            is_empty: self.capture.is_empty(),
            raster_png: self.surface.encode_png()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::BoundingBox;

    fn pt(x: f32, y: f32, ts: u64) -> Point {
        Point::new(x, y, None, ts)
    }

    fn recorder() -> StrokeRecorder {
        StrokeRecorder::new(64, 64, Rgba8::BLACK, 3.0).unwrap()
    }

    #[test]
    fn test_begin_extend_end_scenario() {
        // Two points make the smallest sealable stroke.
        let mut rec = recorder();
        rec.begin(pt(10.0, 10.0, 0)).unwrap();
        rec.extend(pt(20.0, 20.0, 10)).unwrap();
        let update = rec.end().unwrap();

        assert_eq!(rec.metadata().stroke_count, 1);
        assert_eq!(rec.metadata().total_points, 2);
        assert!(!update.is_empty);
    }

    #[test]
    fn test_single_point_stroke_is_discarded() {
        let mut rec = recorder();
        rec.begin(pt(10.0, 10.0, 0)).unwrap();
        let update = rec.end().unwrap();

        assert!(update.is_empty);
        assert_eq!(rec.metadata().stroke_count, 0);
        // The begin() dot must be erased.
        let blank = recorder().render_png().unwrap();
        assert_eq!(update.raster_png, blank);
    }

    #[test]
    fn test_undo_restores_single_stroke_raster() {
        // Undo must restore the raster to the single-stroke image.
        let mut rec = recorder();
        rec.begin(pt(10.0, 10.0, 0)).unwrap();
        rec.extend(pt(20.0, 20.0, 10)).unwrap();
        rec.end().unwrap();

        let after_first = rec.render_png().unwrap();

        rec.begin(pt(40.0, 40.0, 20)).unwrap();
        rec.extend(pt(50.0, 10.0, 30)).unwrap();
        rec.end().unwrap();
        assert_eq!(rec.metadata().stroke_count, 2);

        let update = rec.undo().unwrap();
        assert_eq!(rec.metadata().stroke_count, 1);
        assert_eq!(update.raster_png, after_first);
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut rec = recorder();
        let update = rec.undo().unwrap();
        assert!(update.is_empty);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut rec = recorder();
        rec.begin(pt(10.0, 10.0, 0)).unwrap();
        rec.extend(pt(20.0, 20.0, 10)).unwrap();
        rec.end().unwrap();

        let update = rec.clear().unwrap();
        assert!(update.is_empty);
        assert!(rec.is_empty());
        assert_eq!(rec.metadata().bounding_box, BoundingBox::EMPTY);
        assert_eq!(update.raster_png, recorder().render_png().unwrap());
    }

    #[test]
    fn test_extend_without_begin_is_ignored() {
        let mut rec = recorder();
        let update = rec.extend(pt(10.0, 10.0, 0)).unwrap();
        assert!(update.is_empty);
        assert_eq!(update.raster_png, recorder().render_png().unwrap());
    }

    #[test]
    fn test_begin_while_open_seals_previous() {
        let mut rec = recorder();
        rec.begin(pt(10.0, 10.0, 0)).unwrap();
        rec.extend(pt(20.0, 20.0, 10)).unwrap();
        // Lost pointer-up: a fresh pen-down seals the first stroke.
        rec.begin(pt(40.0, 40.0, 20)).unwrap();
        assert_eq!(rec.metadata().stroke_count, 1);
        rec.extend(pt(50.0, 50.0, 30)).unwrap();
        rec.end().unwrap();
        assert_eq!(rec.metadata().stroke_count, 2);
    }

    #[test]
    fn test_metadata_recomputed_after_each_sealing_mutation() {
        let mut rec = recorder();
        rec.begin(pt(10.0, 10.0, 100)).unwrap();
        rec.extend(pt(30.0, 30.0, 200)).unwrap();
        // Metadata covers sealed strokes only; nothing sealed yet.
        assert_eq!(rec.metadata().stroke_count, 0);
        rec.end().unwrap();
        assert_eq!(rec.metadata().stroke_count, 1);
        assert_eq!(rec.metadata().duration_ms, 100);
        assert_eq!(rec.metadata().bounding_box.min_x, 10.0);
        assert_eq!(rec.metadata().bounding_box.max_x, 30.0);
    }

    #[test]
    fn test_equal_captures_render_identically() {
        let mut a = recorder();
        a.begin(pt(10.0, 10.0, 0)).unwrap();
        a.extend(pt(20.0, 25.0, 10)).unwrap();
        a.end().unwrap();

        let mut b = recorder();
        b.begin(pt(10.0, 10.0, 0)).unwrap();
        b.extend(pt(20.0, 25.0, 10)).unwrap();
        b.end().unwrap();

        assert_eq!(a.render_png().unwrap(), b.render_png().unwrap());
    }
}
