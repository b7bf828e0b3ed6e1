//! The consent workflow state machine.
//!
//! A finite-state wizard gating progression on per-step validation:
//!
//! ```text
//! Identity -> Capture -> LegalAcknowledgment -> Submitting -> Complete
//!                             ^                    |
//!                             +---- Failed <-------+   (transport error)
//! ```
//!
//! `Failed` is reachable only from `Submitting` and resumes to
//! `LegalAcknowledgment` with all entered data preserved. `back` is
//! allowed everywhere except `Submitting` and never discards data.
//! `reset` (dialog reopen) returns to `Identity` and clears the session.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::attestor::{AttestorRequirements, Notary, Witness};
use crate::consent::{ConsentConfig, ConsentLedger};
use crate::error::{GuardViolation, WorkflowError};
use crate::party::Party;

/// The explicit workflow state.
///
/// Always a tagged enum, never a step number — transitions exist only
/// where a guarded method is defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    /// Selecting and validating the signing party.
    Identity,
    /// Drawing the signature and entering attestor records.
    Capture,
    /// Reviewing and accepting the configured consents.
    LegalAcknowledgment,
    /// Submission in flight; `back` is not allowed here.
    Submitting,
    /// Submission failed on transport; entered data preserved.
    Failed {
        /// Why the submission failed.
        reason: String,
    },
    /// Submission committed.
    Complete,
}

impl WorkflowState {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Capture => "Capture",
            Self::LegalAcknowledgment => "LegalAcknowledgment",
            Self::Submitting => "Submitting",
            Self::Failed { .. } => "Failed",
            Self::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for one workflow instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// The required consent key-set.
    pub consent: ConsentConfig,
    /// Which attestor records are required.
    pub attestors: AttestorRequirements,
}

/// The consent workflow controller for one signing session.
///
/// Owns the entered party, consents, and attestor records. Guarded
/// transition methods return `Ok(())` after moving to the next state, or
/// a [`WorkflowError::GuardFailed`] carrying the full violation list while
/// staying put.
#[derive(Clone, Debug)]
pub struct ConsentWorkflow {
    config: WorkflowConfig,
    state: WorkflowState,
    party: Option<Party>,
    consents: ConsentLedger,
    witness: Option<Witness>,
    notary: Option<Notary>,
}

impl ConsentWorkflow {
    /// Create a workflow in the `Identity` state.
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            state: WorkflowState::Identity,
            party: None,
            consents: ConsentLedger::new(),
            witness: None,
            notary: None,
        }
    }

    /// The current state.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// The workflow configuration.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Select the signing party. Allowed in any pre-submission state.
    pub fn set_party(&mut self, party: Party) {
        self.party = Some(party);
    }

    /// The selected signing party, if any.
    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    /// Record acceptance of a consent key.
    pub fn accept_consent(&mut self, key: impl Into<String>, accepted_at_ms: u64) {
        self.consents.accept(key, accepted_at_ms);
    }

    /// Withdraw a previously accepted consent key.
    pub fn withdraw_consent(&mut self, key: &str) {
        self.consents.withdraw(key);
    }

    /// The consent ledger.
    pub fn consents(&self) -> &ConsentLedger {
        &self.consents
    }

    /// Enter or replace the witness record.
    pub fn set_witness(&mut self, witness: Option<Witness>) {
        self.witness = witness;
    }

    /// The entered witness record.
    pub fn witness(&self) -> Option<&Witness> {
        self.witness.as_ref()
    }

    /// Enter or replace the notary record.
    pub fn set_notary(&mut self, notary: Option<Notary>) {
        self.notary = notary;
    }

    /// The entered notary record.
    pub fn notary(&self) -> Option<&Notary> {
        self.notary.as_ref()
    }

    /// Identity → Capture. Guard: a resolvable signing party.
    pub fn begin_capture(&mut self) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::Identity, "begin capture")?;
        let violations = self.party_violations();
        self.transition_or_fail(WorkflowState::Capture, violations)
    }

    /// Capture → LegalAcknowledgment.
    ///
    /// Guard: the capture is non-empty AND every attestor check passes.
    /// Both groups always run and report together.
    pub fn begin_acknowledgment(&mut self, capture_is_empty: bool) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::Capture, "begin acknowledgment")?;
        let mut violations = Vec::new();
        if capture_is_empty {
            violations.push(GuardViolation::EmptySignature);
        }
        violations.extend(self.attestor_violations());
        self.transition_or_fail(WorkflowState::LegalAcknowledgment, violations)
    }

    /// LegalAcknowledgment → Submitting.
    ///
    /// Guard: every configured consent key accepted. The party, capture,
    /// and attestor checks run again so `Submitting` is unreachable unless
    /// the whole precondition set holds, regardless of interleaved
    /// mutations.
    pub fn begin_submission(&mut self, capture_is_empty: bool) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::LegalAcknowledgment, "begin submission")?;
        let mut violations = self.party_violations();
        if capture_is_empty {
            violations.push(GuardViolation::EmptySignature);
        }
        violations.extend(self.attestor_violations());
        for key in self.consents.missing_required(&self.config.consent) {
            violations.push(GuardViolation::ConsentNotAccepted { key });
        }
        self.transition_or_fail(WorkflowState::Submitting, violations)
    }

    /// Submitting → Complete, after the gateway call resolved successfully.
    pub fn complete(&mut self) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::Submitting, "complete")?;
        debug!("workflow complete");
        self.state = WorkflowState::Complete;
        Ok(())
    }

    /// Submitting → Failed, on transport error. Entered data is preserved.
    pub fn fail_submission(&mut self, reason: impl Into<String>) -> Result<(), WorkflowError> {
        self.expect_state(WorkflowState::Submitting, "fail submission")?;
        let reason = reason.into();
        warn!(reason = %reason, "submission failed");
        self.state = WorkflowState::Failed { reason };
        Ok(())
    }

    /// Failed → LegalAcknowledgment, returning control for manual retry.
    pub fn resume_after_failure(&mut self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Failed { .. } => {
                self.state = WorkflowState::LegalAcknowledgment;
                Ok(())
            }
            _ => Err(WorkflowError::InvalidTransition {
                from: self.state.clone(),
                action: "resume after failure",
            }),
        }
    }

    /// Step back without discarding any entered data.
    ///
    /// Allowed from every state except `Submitting` (an in-flight
    /// submission cannot be abandoned mid-call) and the terminal ends of
    /// the wizard (`Identity`, `Complete`), which have nowhere to go.
    pub fn back(&mut self) -> Result<(), WorkflowError> {
        let next = match &self.state {
            WorkflowState::Capture => WorkflowState::Identity,
            WorkflowState::LegalAcknowledgment => WorkflowState::Capture,
            WorkflowState::Failed { .. } => WorkflowState::LegalAcknowledgment,
            WorkflowState::Identity | WorkflowState::Submitting | WorkflowState::Complete => {
                return Err(WorkflowError::InvalidTransition {
                    from: self.state.clone(),
                    action: "go back",
                });
            }
        };
        self.state = next;
        Ok(())
    }

    /// Reset for a reopened dialog: return to `Identity` and clear every
    /// entered record. No leakage between sessions.
    pub fn reset(&mut self) {
        debug!("workflow reset");
        self.state = WorkflowState::Identity;
        self.party = None;
        self.consents.clear();
        self.witness = None;
        self.notary = None;
    }

    fn party_violations(&self) -> Vec<GuardViolation> {
        match &self.party {
            None => vec![GuardViolation::MissingParty],
            Some(party) => party
                .missing_fields()
                .into_iter()
                .map(|field| GuardViolation::BlankPartyField { field })
                .collect(),
        }
    }

    fn attestor_violations(&self) -> Vec<GuardViolation> {
        self.config
            .attestors
            .violations(self.witness.as_ref(), self.notary.as_ref())
    }

    fn expect_state(
        &self,
        expected: WorkflowState,
        action: &'static str,
    ) -> Result<(), WorkflowError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                from: self.state.clone(),
                action,
            })
        }
    }

    fn transition_or_fail(
        &mut self,
        next: WorkflowState,
        violations: Vec<GuardViolation>,
    ) -> Result<(), WorkflowError> {
        if violations.is_empty() {
            debug!(from = %self.state, to = %next, "workflow transition");
            self.state = next;
            Ok(())
        } else {
            debug!(
                from = %self.state,
                count = violations.len(),
                "guard failed"
            );
            Err(WorkflowError::GuardFailed {
                from: self.state.clone(),
                violations,
            })
        }
    }
}
