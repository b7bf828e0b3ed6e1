//! # inkpact-core
//!
//! High-level API for the INKPACT signing pipeline.
//!
//! This is the main entry point for hosts embedding signature capture.
//!
//! ## Quick Start
//!
//! ```ignore
//! use inkpact_core::{SessionConfig, SigningSession};
//!
//! let config = SessionConfig::builder()
//!     .with_canvas(400, 200)
//!     .with_required_consents(["terms", "esign-act"])
//!     .build();
//!
//! let mut session =
//!     SigningSession::open(config, collector, provider, submission, "ctr_42").await?;
//!
//! session.set_party(party);
//! session.proceed_to_capture()?;
//! // ... drive begin_stroke/extend_stroke/end_stroke from pointer input ...
//! session.proceed_to_acknowledgment()?;
//! session.accept_consent("terms");
//! session.accept_consent("esign-act");
//! let evidence = session.submit().await?;
//! println!("package {}", evidence.package.id);
//! ```
//!
//! ## Architecture
//!
//! The session is generic over three injected collaborators:
//!
//! - **DeviceContextCollector**: wraps ambient host facilities as pure
//!   data, collected opportunistically in parallel with the Identity step
//! - **ContractProvider**: serves the canonical agreement content and the
//!   exact document hash the evidence records
//! - **SubmissionEndpoint**: accepts the wire-format submission; failures
//!   return the workflow to `LegalAcknowledgment` for explicit manual
//!   retry
//!
//! Evidence fetch/validate/export run through [`EvidenceClient`] over an
//! [`EvidenceEndpoint`]. All persistence lives behind the endpoints; the
//! core keeps no durable local state.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod session;

pub use config::{ConfigError, SessionConfig, SessionConfigBuilder};
pub use context::{DeviceContextCollector, StaticContextCollector};
pub use endpoints::{
    Contract, ContractProvider, EvidenceEndpoint, ExportArchive, SubmissionEndpoint,
    SubmissionReceipt, SubmissionRequest, TransportError,
};
pub use error::{CoreError, Result};
pub use gateway::{EvidenceClient, SubmissionGateway};
pub use session::{SigningSession, SubmittedEvidence};
