//! Error types for signature capture.

use thiserror::Error;

/// Errors that can occur during signature capture.
///
/// Capture has exactly one fatal failure mode: an unsupported canvas
/// environment, reported once when the surface is constructed. Recorder
/// mutations themselves never fail; raster encoding errors are surfaced
/// for completeness but cannot occur on a validated surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The canvas environment cannot be drawn to.
    ///
    /// Reported once at construction time when the requested geometry is
    /// degenerate (zero-sized, non-finite, or beyond supported limits).
    #[error("Canvas environment unsupported: {reason}")]
    CanvasUnsupported {
        /// Why the canvas was rejected.
        reason: String,
    },

    /// Raster PNG encoding failed.
    #[error("Raster encoding failed: {0}")]
    RasterEncoding(String),
}

/// Result type for capture operations.
pub type Result<T> = std::result::Result<T, CaptureError>;
