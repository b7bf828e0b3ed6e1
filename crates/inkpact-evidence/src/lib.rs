//! # inkpact-evidence
//!
//! Tamper-evident evidence packages for INKPACT signing events.
//!
//! This crate provides:
//! - **Hash256**: a 256-bit BLAKE3 hash with constant-time comparison
//! - **Domain separation**: `INKPACT-v1.`-prefixed labels so no hash from
//!   one context can be replayed in another
//! - **DeviceContext**: the frozen client environment record, including
//!   best-effort geolocation
//! - **EvidencePackageBuilder**: deterministic raster rendering, document
//!   content hashing, snapshot freezing, and package hashing in a fixed,
//!   documented field order
//! - **ValidationService**: independent recomputation of the package hash
//!   plus consent/attestor completeness, reporting every defect found
//!
//! ## Reproducibility
//!
//! The package hash covers the frozen snapshot fields in a fixed order
//! with length-prefixed inputs. Any independent implementation holding the
//! same snapshot reproduces the same hash; any change to a frozen field
//! changes it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod device;
pub mod domain;
pub mod error;
pub mod hash;
pub mod package;
pub mod validation;

pub use device::{DeviceContext, GeolocationFix, GeolocationStatus, ScreenProfile};
pub use error::{EvidenceError, Result};
pub use hash::Hash256;
pub use package::{
    document_content_hash, CounterSignature, EvidencePackage, EvidencePackageBuilder,
    EvidenceSigner, SignerSnapshot,
};
pub use validation::{ValidationDefect, ValidationMode, ValidationResult, ValidationService};

#[cfg(test)]
mod proptests;
