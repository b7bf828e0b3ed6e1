//! Error types for high-level session operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::endpoints::TransportError;

/// Errors that can occur during high-level session operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Capture error.
    #[error("Capture error: {0}")]
    Capture(#[from] inkpact_capture::CaptureError),

    /// Workflow error.
    #[error("Workflow error: {0}")]
    Workflow(#[from] inkpact_consent::WorkflowError),

    /// Evidence error.
    #[error("Evidence error: {0}")]
    Evidence(#[from] inkpact_evidence::EvidenceError),

    /// Transport error.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl CoreError {
    /// The guard violations carried by a workflow guard failure, empty for
    /// every other error.
    pub fn violations(&self) -> &[inkpact_consent::GuardViolation] {
        match self {
            Self::Workflow(err) => err.violations(),
            _ => &[],
        }
    }
}

/// Result type for high-level session operations.
pub type Result<T> = std::result::Result<T, CoreError>;
