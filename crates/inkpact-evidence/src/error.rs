//! Error types for evidence operations.

use thiserror::Error;

/// Errors that can occur while building or handling evidence packages.
///
/// Integrity mismatches discovered during validation are NOT errors — they
/// are expected, inspectable outcomes reported as defects inside
/// [`crate::ValidationResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    /// No document content or precomputed hash was supplied.
    ///
    /// A package must never reference an unknown document version, so the
    /// builder fails fast here.
    #[error("Document content hash cannot be computed: {reason}")]
    MissingDocumentContent {
        /// What was missing.
        reason: String,
    },

    /// A required snapshot ingredient was not supplied to the builder.
    #[error("Evidence builder is missing {field}")]
    MissingBuilderField {
        /// The absent builder field.
        field: &'static str,
    },

    /// Raster rendering or encoding failed.
    #[error("Signature raster error: {0}")]
    Raster(#[from] inkpact_capture::CaptureError),

    /// Hash bytes had the wrong length.
    #[error("Invalid hash length: expected {expected}, got {actual}")]
    InvalidHashLength {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// Hash hex string could not be parsed.
    #[error("Invalid hash hex: {0}")]
    InvalidHexFormat(String),

    /// Snapshot serialization for hashing failed.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),

    /// The pluggable countersigner rejected the digest.
    #[error("Countersigning failed: {0}")]
    Signer(String),
}

/// Result type for evidence operations.
pub type Result<T> = std::result::Result<T, EvidenceError>;
