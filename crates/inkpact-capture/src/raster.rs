//! Deterministic raster rendering of sealed strokes.
//!
//! The surface composites strokes with a fixed white background, fixed
//! draw order, and integer round-brush geometry. Equal stroke lists always
//! produce byte-identical RGBA buffers, and therefore byte-identical PNG
//! encodings. Evidence hashing depends on this.

use serde::{Deserialize, Serialize};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{CaptureError, Result};
use crate::point::{Point, MAX_CANVAS_DIM};
use crate::stroke::Stroke;

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default pen color.
    pub const BLACK: Rgba8 = Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Opaque white, the fixed surface background.
    pub const WHITE: Rgba8 = Rgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A fixed-size RGBA drawing surface for stroke compositing.
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    /// Create a surface cleared to the fixed white background.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CanvasUnsupported`] when either dimension is
    /// zero or beyond the supported maximum.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::CanvasUnsupported {
                reason: format!("surface dimensions must be non-zero, got {width}x{height}"),
            });
        }
        if width as f32 > MAX_CANVAS_DIM || height as f32 > MAX_CANVAS_DIM {
            return Err(CaptureError::CanvasUnsupported {
                reason: format!("surface dimensions {width}x{height} exceed maximum"),
            });
        }
        let mut surface = Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        };
        surface.clear();
        Ok(surface)
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to the fixed white background.
    pub fn clear(&mut self) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = Rgba8::WHITE.r;
            chunk[1] = Rgba8::WHITE.g;
            chunk[2] = Rgba8::WHITE.b;
            chunk[3] = Rgba8::WHITE.a;
        }
    }

    /// Draw the incremental segment between two points.
    ///
    /// This is the hot path: `extend` renders only the segment between the
    /// last two points, so draw latency is independent of total ink.
    pub fn draw_segment(&mut self, a: Point, b: Point, color: Rgba8, width: f32) {
        let radius = brush_radius(width);
        let (ax, ay) = (a.x, a.y);
        let (bx, by) = (b.x, b.y);
        let steps = (bx - ax).abs().max((by - ay).abs()).ceil() as i64;
        if steps == 0 {
            self.stamp_disc(ax.round() as i64, ay.round() as i64, radius, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = ax + (bx - ax) * t;
            let y = ay + (by - ay) * t;
            self.stamp_disc(x.round() as i64, y.round() as i64, radius, color);
        }
    }

    /// Draw one complete stroke.
    pub fn draw_stroke(&mut self, stroke: &Stroke) {
        let points = stroke.points();
        if points.len() == 1 {
            let p = points[0];
            self.stamp_disc(
                p.x.round() as i64,
                p.y.round() as i64,
                brush_radius(stroke.width()),
                stroke.color(),
            );
            return;
        }
        for pair in points.windows(2) {
            self.draw_segment(pair[0], pair[1], stroke.color(), stroke.width());
        }
    }

    /// Clear and redraw every stroke in order.
    ///
    /// Used after undo and after a discarded stroke, where incremental
    /// state on the surface is no longer valid.
    pub fn render_all(&mut self, strokes: &[Stroke]) {
        self.clear();
        for stroke in strokes {
            self.draw_stroke(stroke);
        }
    }

    /// Encode the surface as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::RasterEncoding`] if the encoder rejects the
    /// buffer. This cannot occur for a surface constructed through
    /// [`RasterSurface::new`].
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf)
            .write_image(&self.pixels, self.width, self.height, ExtendedColorType::Rgba8)
            .map_err(|e| CaptureError::RasterEncoding(e.to_string()))?;
        Ok(buf)
    }

    /// Raw RGBA pixel access for tests and downstream comparison.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn stamp_disc(&mut self, cx: i64, cy: i64, radius: i64, color: Rgba8) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let x = cx + dx;
                let y = cy + dy;
                if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                    continue;
                }
                let idx = (y as usize * self.width as usize + x as usize) * 4;
                self.pixels[idx] = color.r;
                self.pixels[idx + 1] = color.g;
                self.pixels[idx + 2] = color.b;
                self.pixels[idx + 3] = color.a;
            }
        }
    }
}

/// Integer brush radius for a stroke width.
fn brush_radius(width: f32) -> i64 {
    ((width / 2.0).round() as i64).max(1)
}
