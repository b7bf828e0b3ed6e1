//! Submission gateway and evidence client.
//!
//! The gateway serializes workflow output into the wire format, applies
//! the submission timeout, and commits workflow completion only when the
//! endpoint accepts. On any transport failure the workflow is returned to
//! `LegalAcknowledgment` with all captured data preserved — retry is a
//! deliberate user action, never automatic.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use inkpact_consent::{ConsentWorkflow, Notary, Party, Witness};
use inkpact_capture::SignatureMetadata;
use inkpact_evidence::{EvidencePackage, ValidationResult};

use crate::endpoints::{
    Contract, EvidenceEndpoint, ExportArchive, SubmissionEndpoint, SubmissionReceipt,
    SubmissionRequest, TransportError,
};
use crate::error::Result;

/// Build the wire request for one submission.
///
/// `party_index` is resolved by position of the signing party's id within
/// the contract's party list.
pub fn build_submission_request(
    contract: &Contract,
    party: &Party,
    signature_image: Vec<u8>,
    metadata: SignatureMetadata,
    witness: Option<Witness>,
    notary: Option<Notary>,
) -> SubmissionRequest {
    let party_index = contract.parties.iter().position(|p| p.id == party.id);
    SubmissionRequest {
        party_type: party.role.as_str().to_string(),
        party_index,
        signature_image,
        metadata,
        witness,
        notary,
    }
}

/// Serializes workflow output to the wire and commits completion.
pub struct SubmissionGateway<S> {
    endpoint: S,
    submission_timeout: Duration,
}

impl<S: SubmissionEndpoint> SubmissionGateway<S> {
    /// Create a gateway over a submission endpoint.
    pub fn new(endpoint: S, submission_timeout: Duration) -> Self {
        Self {
            endpoint,
            submission_timeout,
        }
    }

    /// Submit and commit.
    ///
    /// The workflow must be in `Submitting`. On endpoint acceptance the
    /// workflow moves to `Complete`; on failure it records the failure and
    /// resumes to `LegalAcknowledgment` before the error is returned, so
    /// the caller always observes a retryable state with capture retained.
    pub async fn submit_and_commit(
        &self,
        workflow: &mut ConsentWorkflow,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt> {
        let outcome = match timeout(self.submission_timeout, self.endpoint.submit(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                elapsed_ms: self.submission_timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(receipt) => {
                workflow.complete()?;
                info!(signature = %receipt.signature_id, "submission committed");
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, "submission failed, returning for manual retry");
                workflow.fail_submission(err.to_string())?;
                workflow.resume_after_failure()?;
                Err(err.into())
            }
        }
    }
}

/// Thin client over the evidence endpoints.
///
/// Futures are cancellable by dropping; an abandoned fetch or export
/// produces no orphaned effects, and exported buffers move to the caller.
pub struct EvidenceClient<E> {
    endpoint: E,
}

impl<E: EvidenceEndpoint> EvidenceClient<E> {
    /// Create a client over an evidence endpoint.
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    /// Fetch the package recorded for a signature.
    pub async fn fetch_by_signature(&self, signature_id: &str) -> Result<EvidencePackage> {
        Ok(self.endpoint.fetch_by_signature(signature_id).await?)
    }

    /// Ask the endpoint to validate a stored package.
    pub async fn validate(&self, package_id: &str) -> Result<ValidationResult> {
        Ok(self.endpoint.validate(package_id).await?)
    }

    /// Export a package as a downloadable archive.
    pub async fn export(&self, package_id: &str) -> Result<ExportArchive> {
        Ok(self.endpoint.export(package_id).await?)
    }
}
