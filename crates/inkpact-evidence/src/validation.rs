//! Evidence package validation.
//!
//! Validation re-verifies a stored package from its own snapshot: the
//! package hash is recomputed and compared, consent completeness is
//! checked against the key-set recorded at signing time, and attestor
//! records are re-examined. Every distinct defect is reported — the
//! service never stops at the first finding, and a hash mismatch is a
//! reported defect, never a thrown error.
//!
//! The default mode is as-signed: the package is compared to itself, so
//! legitimate post-signing amendments to the live document cannot
//! retroactively invalidate a prior signature. Comparing against the
//! current document is an explicit opt-in mode.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use inkpact_consent::AttestorRole;

use crate::hash::Hash256;
use crate::package::EvidencePackage;

/// Which document version to verify against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// Verify the package against the document hash recorded at signing
    /// time. The default.
    AsSigned,
    /// Additionally compare the recorded document hash against the live
    /// document's hash.
    CurrentDocument {
        /// Hash of the document as it exists now.
        live_hash: Hash256,
    },
}

/// A single validation defect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationDefect {
    /// The recomputed package hash differs from the persisted value.
    PackageHashMismatch {
        /// The persisted hash.
        stored: Hash256,
        /// The hash recomputed from the snapshot.
        recomputed: Hash256,
    },
    /// The live document hash differs from the as-signed hash
    /// (current-document mode only).
    DocumentHashMismatch {
        /// The hash recorded at signing time.
        as_signed: Hash256,
        /// The live document hash.
        current: Hash256,
    },
    /// A consent key required at signing time has no accepted record.
    MissingConsent {
        /// The unaccepted key.
        key: String,
    },
    /// A required attestor record is missing or has blank fields.
    IncompleteAttestor {
        /// Which attestor.
        role: AttestorRole,
        /// The blank or missing fields.
        fields: Vec<String>,
    },
    /// The snapshot contains no strokes.
    EmptySignature,
    /// The snapshot could not be re-serialized for hashing.
    Unverifiable {
        /// Why recomputation failed.
        reason: String,
    },
}

impl std::fmt::Display for ValidationDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PackageHashMismatch { .. } => write!(f, "package hash mismatch"),
            Self::DocumentHashMismatch { .. } => write!(f, "document hash mismatch"),
            Self::MissingConsent { key } => write!(f, "missing consent '{key}'"),
            Self::IncompleteAttestor { role, fields } => {
                write!(f, "incomplete {role} record ({})", fields.join(", "))
            }
            Self::EmptySignature => write!(f, "empty signature"),
            Self::Unverifiable { reason } => write!(f, "unverifiable: {reason}"),
        }
    }
}

/// The outcome of validating one package.
///
/// Ephemeral — never persisted by the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether no defects were found.
    pub is_valid: bool,
    /// Every defect found, in check order.
    pub defects: Vec<ValidationDefect>,
    /// When the validation ran, in milliseconds.
    pub checked_at_ms: u64,
    /// Human-readable summary.
    pub message: String,
}

/// Re-verifies stored evidence packages.
///
/// Stateless and idempotent: validating the same package twice yields the
/// same defects.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationService;

impl ValidationService {
    /// Create a validation service.
    pub fn new() -> Self {
        Self
    }

    /// Validate a package, reporting every distinct defect found.
    pub fn validate(&self, package: &EvidencePackage, mode: ValidationMode) -> ValidationResult {
        let mut defects = Vec::new();

        match package.recompute_hash() {
            Ok(recomputed) => {
                if recomputed != package.package_hash {
                    defects.push(ValidationDefect::PackageHashMismatch {
                        stored: package.package_hash.clone(),
                        recomputed,
                    });
                }
            }
            Err(e) => defects.push(ValidationDefect::Unverifiable {
                reason: e.to_string(),
            }),
        }

        if let ValidationMode::CurrentDocument { live_hash } = &mode {
            if *live_hash != package.document_content_hash {
                defects.push(ValidationDefect::DocumentHashMismatch {
                    as_signed: package.document_content_hash.clone(),
                    current: live_hash.clone(),
                });
            }
        }

        for key in &package.snapshot.required_consent_keys {
            let accepted = package
                .snapshot
                .consents
                .iter()
                .any(|c| &c.key == key && c.accepted);
            if !accepted {
                defects.push(ValidationDefect::MissingConsent { key: key.clone() });
            }
        }

        if let Some(witness) = &package.snapshot.witness {
            let fields = witness.missing_fields();
            if !fields.is_empty() {
                defects.push(ValidationDefect::IncompleteAttestor {
                    role: AttestorRole::Witness,
                    fields: fields.into_iter().map(String::from).collect(),
                });
            }
        }

        if let Some(notary) = &package.snapshot.notary {
            let fields = notary.missing_fields();
            if !fields.is_empty() {
                defects.push(ValidationDefect::IncompleteAttestor {
                    role: AttestorRole::Notary,
                    fields: fields.into_iter().map(String::from).collect(),
                });
            }
        }

        if package.snapshot.strokes.is_empty() {
            defects.push(ValidationDefect::EmptySignature);
        }

        let is_valid = defects.is_empty();
        let message = if is_valid {
            format!("package {} verified", package.id)
        } else {
            format!("package {} has {} defect(s)", package.id, defects.len())
        };
        debug!(package = %package.id, valid = is_valid, defects = defects.len(), "validated");

        ValidationResult {
            is_valid,
            defects,
            checked_at_ms: current_timestamp_ms(),
            message,
        }
    }
}

fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
