//! # inkpact-capture
//!
//! Real-time signature geometry capture for the INKPACT evidence pipeline.
//!
//! This crate provides:
//! - **Point / PointerSample**: normalized, pressure-tagged points in canvas
//!   logical space
//! - **StrokeRecorder**: pen-down-to-pen-up stroke grouping with undo/clear
//!   and incremental raster rendering
//! - **RasterSurface**: deterministic compositing of sealed strokes to PNG
//! - **SignatureMetadata**: bounding box, counts, and draw duration derived
//!   synchronously after every stroke-count-changing mutation
//!
//! ## Determinism
//!
//! Rendering is fully deterministic: a fixed background, a fixed stroke
//! order, and integer brush geometry mean that equal stroke lists always
//! produce byte-identical PNG output. Downstream evidence hashing depends
//! on this property.
//!
//! ## Concurrency
//!
//! One recorder owns one capture. All operations are synchronous and never
//! touch the network; hosts drive the recorder from their input loop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod metadata;
pub mod point;
pub mod raster;
pub mod recorder;
pub mod stroke;

pub use error::{CaptureError, Result};
pub use metadata::{BoundingBox, SignatureMetadata};
pub use point::{CanvasGeometry, Point, PointSampler, PointSource, PointerSample, DEFAULT_PRESSURE};
pub use raster::{RasterSurface, Rgba8};
pub use recorder::{CaptureUpdate, StrokeRecorder};
pub use stroke::{SignatureCapture, Stroke, MIN_SEALED_POINTS};

#[cfg(test)]
mod proptests;
