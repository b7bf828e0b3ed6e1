//! # inkpact-consent
//!
//! Parties, consents, attestors, and the consent workflow state machine
//! for the INKPACT signing pipeline.
//!
//! This crate provides:
//! - **Party**: externally supplied signer identity records
//! - **ConsentLedger**: acceptance tracking against a configured key-set
//! - **Witness / Notary**: optional attestor records with completeness
//!   checks
//! - **ConsentWorkflow**: the explicit tagged-state wizard
//!   (`Identity → Capture → LegalAcknowledgment → Submitting → Complete`)
//!   with guarded transitions that return either the next state or the
//!   full violation list — never a silently clamped step number
//!
//! ## Guard semantics
//!
//! Every guard runs all of its checks and reports every violation
//! together; nothing short-circuits. `back` never discards entered data.
//! `reset` (dialog reopen) returns to `Identity` and clears everything —
//! no leakage between sessions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attestor;
pub mod consent;
pub mod error;
pub mod party;
pub mod workflow;

pub use attestor::{AttestorRequirements, AttestorRole, Notary, Witness};
pub use consent::{Consent, ConsentConfig, ConsentLedger};
pub use error::{GuardViolation, WorkflowError};
pub use party::{Party, PartyKind, PartyRole};
pub use workflow::{ConsentWorkflow, WorkflowConfig, WorkflowState};
