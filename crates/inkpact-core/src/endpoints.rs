//! External endpoint traits and wire types.
//!
//! The core consumes its collaborators as opaque traits: a contract
//! provider, a submission endpoint, and the evidence endpoints. The wire
//! contract is defined here, at the boundary — nothing inside the core
//! fabricates network responses outside of test doubles.
//!
//! All persistence lives behind these endpoints; the core keeps no
//! durable local state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use inkpact_capture::SignatureMetadata;
use inkpact_consent::{Notary, Party, Witness};
use inkpact_evidence::{EvidencePackage, Hash256, ValidationResult};

/// Errors crossing the network boundary.
///
/// Transport errors are recoverable: the workflow returns to its prior
/// state and the user retries explicitly. Submission never auto-retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The call did not complete within its bound.
    #[error("Request timed out after {elapsed_ms}ms")]
    Timeout {
        /// How long the call was allowed to run.
        elapsed_ms: u64,
    },

    /// The endpoint rejected the request.
    #[error("Request rejected: {reason}")]
    Rejected {
        /// Endpoint-supplied reason.
        reason: String,
    },

    /// The endpoint could not be reached.
    #[error("Network unavailable: {0}")]
    Unavailable(String),

    /// The call was cancelled by session close.
    #[error("Request cancelled")]
    Cancelled,
}

/// A contract as served by the document provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Contract identifier.
    pub id: String,
    /// Canonical agreement content shown to the signer.
    pub content: String,
    /// Provider-computed hash of `content`.
    ///
    /// This is the as-signed document version; the evidence package
    /// records it verbatim.
    pub content_hash: Hash256,
    /// The parties on the contract.
    pub parties: Vec<Party>,
    /// Term summaries for display.
    pub terms: Vec<String>,
}

/// The wire shape of one signature submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// The signing party's role (`primary`, `secondary`, `additional`).
    pub party_type: String,
    /// Index of the party within the contract's party list, if resolvable.
    pub party_index: Option<usize>,
    /// The composited signature raster, PNG-encoded.
    pub signature_image: Vec<u8>,
    /// Derived signature metadata.
    pub metadata: SignatureMetadata,
    /// The witness record, if entered.
    pub witness: Option<Witness>,
    /// The notary record, if entered.
    pub notary: Option<Notary>,
}

/// Acknowledgement of an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// The signature id the submission was recorded under.
    pub signature_id: String,
    /// When the endpoint accepted it, in milliseconds.
    pub accepted_at_ms: u64,
}

/// A downloadable evidence archive.
///
/// The buffer is owned and moves to the caller on use; nothing inside the
/// core retains a reference after export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArchive {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of the archive.
    pub media_type: String,
    /// Archive bytes.
    pub bytes: Vec<u8>,
}

impl ExportArchive {
    /// Consume the archive, releasing it to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Serves contract content and party lists.
#[allow(async_fn_in_trait)]
pub trait ContractProvider: Send + Sync {
    /// Fetch a contract by id.
    async fn get_contract(&self, contract_id: &str) -> Result<Contract, TransportError>;
}

/// Accepts signature submissions.
#[allow(async_fn_in_trait)]
pub trait SubmissionEndpoint: Send + Sync {
    /// Submit a signature. One attempt per call; the core never retries
    /// automatically.
    async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionReceipt, TransportError>;
}

/// Serves stored evidence packages.
#[allow(async_fn_in_trait)]
pub trait EvidenceEndpoint: Send + Sync {
    /// Fetch the package recorded for a signature.
    async fn fetch_by_signature(
        &self,
        signature_id: &str,
    ) -> Result<EvidencePackage, TransportError>;

    /// Ask the endpoint to validate a stored package.
    async fn validate(&self, package_id: &str) -> Result<ValidationResult, TransportError>;

    /// Export a package as a downloadable archive.
    async fn export(&self, package_id: &str) -> Result<ExportArchive, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_request_wire_shape() {
        let request = SubmissionRequest {
            party_type: "primary".into(),
            party_index: Some(0),
            signature_image: vec![1, 2, 3],
            metadata: SignatureMetadata::empty(),
            witness: None,
            notary: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"party_type\":\"primary\""));
        let back: SubmissionRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, back);
    }

    #[test]
    fn test_export_archive_releases_buffer() {
        let archive = ExportArchive {
            file_name: "evidence.zip".into(),
            media_type: "application/zip".into(),
            bytes: vec![0u8; 16],
        };
        let bytes = archive.into_bytes();
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn test_transport_error_messages() {
        assert_eq!(
            TransportError::Timeout { elapsed_ms: 30000 }.to_string(),
            "Request timed out after 30000ms"
        );
        assert_eq!(TransportError::Cancelled.to_string(), "Request cancelled");
    }
}
