//! Point sampling and coordinate normalization.
//!
//! Raw pointer and touch events arrive in client pixel coordinates, which
//! vary with page zoom and display DPI. [`CanvasGeometry`] normalizes them
//! into canvas logical space via bounding-box scale factors so that stored
//! stroke geometry is stable across environments.
//!
//! The [`PointSource`] trait abstracts over the pointer/touch event union:
//! hosts convert whatever event type they receive into a [`PointerSample`],
//! and the recorder consumes only [`Point`]s.

use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};

/// Pressure recorded when the input device reports none (mouse, stylus
/// without pressure support).
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Maximum supported canvas dimension in logical pixels.
pub const MAX_CANVAS_DIM: f32 = 8192.0;

/// A single captured point in canvas logical space.
///
/// Immutable once recorded. Pressure is clamped to `[0, 1]` at
/// construction; a missing pressure reading defaults to
/// [`DEFAULT_PRESSURE`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in canvas logical space.
    pub x: f32,
    /// Y coordinate in canvas logical space.
    pub y: f32,
    /// Normalized stylus pressure in `[0, 1]`.
    pub pressure: f32,
    /// Capture timestamp in milliseconds (host clock).
    pub timestamp_ms: u64,
}

impl Point {
    /// Create a point, clamping pressure and defaulting it when absent.
    pub fn new(x: f32, y: f32, pressure: Option<f32>, timestamp_ms: u64) -> Self {
        let pressure = pressure.unwrap_or(DEFAULT_PRESSURE).clamp(0.0, 1.0);
        Self {
            x,
            y,
            pressure,
            timestamp_ms,
        }
    }
}

/// A raw pointer/touch sample in client pixel coordinates.
///
/// This is the single event shape every input modality converges to
/// before normalization. Hosts map mouse, pen, and touch events here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// X coordinate in client pixels.
    pub client_x: f32,
    /// Y coordinate in client pixels.
    pub client_y: f32,
    /// Device-reported pressure, if any.
    pub pressure: Option<f32>,
    /// Event timestamp in milliseconds (host clock).
    pub timestamp_ms: u64,
}

/// A source of pointer samples.
///
/// Implemented for any iterator of [`PointerSample`]s, so test fixtures
/// and host event queues plug in without adapters.
pub trait PointSource {
    /// Produce the next sample, or `None` when the source is exhausted.
    fn next_sample(&mut self) -> Option<PointerSample>;
}

impl<I> PointSource for I
where
    I: Iterator<Item = PointerSample>,
{
    fn next_sample(&mut self) -> Option<PointerSample> {
        self.next()
    }
}

/// Canvas geometry used to normalize client pixels to logical space.
///
/// Holds the canvas bounding box in client coordinates and the logical
/// size of the drawing surface. The two scale factors between them absorb
/// page zoom and DPI differences.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Left edge of the canvas bounding box in client pixels.
    pub client_left: f32,
    /// Top edge of the canvas bounding box in client pixels.
    pub client_top: f32,
    /// Width of the canvas bounding box in client pixels.
    pub client_width: f32,
    /// Height of the canvas bounding box in client pixels.
    pub client_height: f32,
    /// Logical width of the drawing surface.
    pub logical_width: f32,
    /// Logical height of the drawing surface.
    pub logical_height: f32,
}

impl CanvasGeometry {
    /// Create a canvas geometry.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CanvasUnsupported`] when any dimension is
    /// non-finite, non-positive, or beyond [`MAX_CANVAS_DIM`]. This is the
    /// single capture failure mode, reported once at construction.
    pub fn new(
        client_left: f32,
        client_top: f32,
        client_width: f32,
        client_height: f32,
        logical_width: f32,
        logical_height: f32,
    ) -> Result<Self> {
        let dims = [
            ("client_width", client_width),
            ("client_height", client_height),
            ("logical_width", logical_width),
            ("logical_height", logical_height),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(CaptureError::CanvasUnsupported {
                    reason: format!("{name} must be a positive finite number, got {value}"),
                });
            }
            if value > MAX_CANVAS_DIM {
                return Err(CaptureError::CanvasUnsupported {
                    reason: format!("{name} {value} exceeds maximum {MAX_CANVAS_DIM}"),
                });
            }
        }
        if !client_left.is_finite() || !client_top.is_finite() {
            return Err(CaptureError::CanvasUnsupported {
                reason: "canvas origin must be finite".to_string(),
            });
        }
        Ok(Self {
            client_left,
            client_top,
            client_width,
            client_height,
            logical_width,
            logical_height,
        })
    }

    /// Geometry for a canvas whose client box matches its logical size 1:1.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CanvasUnsupported`] on degenerate dimensions.
    pub fn identity(width: f32, height: f32) -> Result<Self> {
        Self::new(0.0, 0.0, width, height, width, height)
    }

    /// Horizontal client-to-logical scale factor.
    pub fn scale_x(&self) -> f32 {
        self.logical_width / self.client_width
    }

    /// Vertical client-to-logical scale factor.
    pub fn scale_y(&self) -> f32 {
        self.logical_height / self.client_height
    }
}

/// Converts raw pointer samples into normalized [`Point`]s.
pub struct PointSampler {
    geometry: CanvasGeometry,
}

impl PointSampler {
    /// Create a sampler for the given canvas geometry.
    pub fn new(geometry: CanvasGeometry) -> Self {
        Self { geometry }
    }

    /// The geometry this sampler normalizes against.
    pub fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    /// Normalize a raw sample into canvas logical space.
    pub fn sample(&self, raw: PointerSample) -> Point {
        let x = (raw.client_x - self.geometry.client_left) * self.geometry.scale_x();
        let y = (raw.client_y - self.geometry.client_top) * self.geometry.scale_y();
        Point::new(x, y, raw.pressure, raw.timestamp_ms)
    }

    /// Drain a source, normalizing every sample it produces.
    pub fn drain<S: PointSource>(&self, source: &mut S) -> Vec<Point> {
        let mut points = Vec::new();
        while let Some(raw) = source.next_sample() {
            points.push(self.sample(raw));
        }
        points
    }
}
