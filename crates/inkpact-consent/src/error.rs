//! Workflow errors and guard violations.

use thiserror::Error;

use crate::attestor::AttestorRole;
use crate::workflow::WorkflowState;

/// A single step-guard violation.
///
/// Guards collect every applicable violation before failing a transition,
/// so hosts can surface the complete correction list at once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardViolation {
    /// No signing party has been selected.
    #[error("No signing party selected")]
    MissingParty,

    /// The selected party has a blank required field.
    #[error("Signing party field '{field}' is blank")]
    BlankPartyField {
        /// The blank field name.
        field: &'static str,
    },

    /// The signature capture has no sealed strokes.
    #[error("Signature has not been drawn")]
    EmptySignature,

    /// A required attestor record has not been entered.
    #[error("Required {role} record is missing")]
    MissingAttestor {
        /// Which attestor is missing.
        role: AttestorRole,
    },

    /// An entered attestor record has a blank required field.
    #[error("{role} field '{field}' is blank")]
    BlankAttestorField {
        /// Which attestor the field belongs to.
        role: AttestorRole,
        /// The blank field name.
        field: &'static str,
    },

    /// A configured consent key has not been accepted.
    #[error("Required consent '{key}' has not been accepted")]
    ConsentNotAccepted {
        /// The unaccepted consent key.
        key: String,
    },
}

/// Errors returned by workflow transition functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The requested transition is not defined from the current state.
    #[error("Cannot {action} from {from} state")]
    InvalidTransition {
        /// The state the workflow was in.
        from: WorkflowState,
        /// The attempted action.
        action: &'static str,
    },

    /// A step guard failed; the transition did not happen and entered data
    /// is preserved.
    #[error("Step validation failed with {} violation(s)", .violations.len())]
    GuardFailed {
        /// The state the workflow stayed in.
        from: WorkflowState,
        /// Every violation found, in check order.
        violations: Vec<GuardViolation>,
    },
}

impl WorkflowError {
    /// The violations carried by a guard failure, empty otherwise.
    pub fn violations(&self) -> &[GuardViolation] {
        match self {
            Self::GuardFailed { violations, .. } => violations,
            Self::InvalidTransition { .. } => &[],
        }
    }
}
