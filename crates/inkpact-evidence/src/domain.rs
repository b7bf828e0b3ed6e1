//! Structured domain separation for INKPACT hashing.
//!
//! Provides a consistent domain separation format across all hash
//! operations: `"INKPACT-v1." || purpose || "." || context_length || context`
//!
//! This prevents cross-context confusion where a valid hash from one
//! purpose (say, a document hash) could be presented as another (say, a
//! package hash).

use crate::hash::Hash256;

/// Build a domain-separated label.
///
/// Format: `"INKPACT-v1." || purpose || "." || len(context) as 4-byte BE || context`
pub fn build_domain_label(purpose: &str, context: &[u8]) -> Vec<u8> {
    let mut label = Vec::with_capacity(11 + purpose.len() + 1 + 4 + context.len());
    label.extend_from_slice(b"INKPACT-v1.");
    label.extend_from_slice(purpose.as_bytes());
    label.extend_from_slice(b".");
    label.extend_from_slice(&(context.len() as u32).to_be_bytes());
    label.extend_from_slice(context);
    label
}

/// Hash `parts` under a domain purpose, with every part length-prefixed.
pub fn domain_hash(purpose: &str, parts: &[&[u8]]) -> Hash256 {
    let label = build_domain_label(purpose, b"");
    let mut inputs: Vec<&[u8]> = Vec::with_capacity(parts.len() + 1);
    inputs.push(&label);
    inputs.extend_from_slice(parts);
    Hash256::hash_many(&inputs)
}

/// Well-known domain separation purposes.
pub mod purposes {
    /// Canonical agreement content hash.
    pub const DOCUMENT_HASH: &str = "DOCUMENT-HASH";
    /// Evidence package hash.
    pub const PACKAGE_HASH: &str = "PACKAGE-HASH";
    /// Device context fingerprint.
    pub const DEVICE_FINGERPRINT: &str = "DEVICE-FINGERPRINT";
}
