//! Evidence package assembly.
//!
//! The builder turns one signing event into an immutable, independently
//! verifiable record:
//!
//! 1. render the sealed strokes to one deterministic raster,
//! 2. hash the canonical agreement content (fail fast when absent),
//! 3. freeze party, consents, attestors, and device context into a
//!    [`SignerSnapshot`] deep copy,
//! 4. hash the frozen fields in a fixed, documented order.
//!
//! Later mutation of the live party or consent records never alters a
//! generated package — the snapshot is a deep copy taken at build time.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

use inkpact_capture::{RasterSurface, SignatureCapture, SignatureMetadata, Stroke};
use inkpact_consent::{Consent, Notary, Party, Witness};

use crate::device::DeviceContext;
use crate::domain::{domain_hash, purposes};
use crate::error::{EvidenceError, Result};
use crate::hash::Hash256;

/// Pluggable countersigner for package hashes.
///
/// Signing is CPU-bound and synchronous; async backends (e.g. a KMS)
/// should wrap their calls before implementing this. The cryptographic
/// primitive itself is out of scope for this crate.
pub trait EvidenceSigner: Send + Sync {
    /// Sign a pre-computed 32-byte digest, returning raw signature bytes.
    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>>;

    /// Algorithm identifier string (e.g. `ed25519`).
    fn algorithm(&self) -> &str;
}

/// A countersignature over the package hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSignature {
    /// Signing algorithm identifier.
    pub algorithm: String,
    /// Raw signature bytes over the package hash.
    pub signature: Vec<u8>,
}

/// The frozen deep copy of everything the signer saw and entered.
///
/// Field order here is load-bearing: the package hash covers these fields
/// in declaration order (see [`EvidencePackage::recompute_hash`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignerSnapshot {
    /// The signing party as resolved at submit time.
    pub party: Party,
    /// The consent keys the session was configured to require.
    pub required_consent_keys: Vec<String>,
    /// Every recorded consent, ordered by key.
    pub consents: Vec<Consent>,
    /// The entered witness record, if any.
    pub witness: Option<Witness>,
    /// The entered notary record, if any.
    pub notary: Option<Notary>,
    /// The client environment, geolocation included.
    pub device_context: DeviceContext,
    /// The sealed strokes as drawn.
    pub strokes: Vec<Stroke>,
    /// Metadata derived from the strokes.
    pub metadata: SignatureMetadata,
    /// The deterministic PNG raster of the strokes.
    pub raster_png: Vec<u8>,
}

/// An immutable evidence package for one signing event.
///
/// Immutable after creation except for the two later async flags
/// (`certificate_generated`, `is_archived`), which are outside the hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidencePackage {
    /// Package identifier.
    pub id: String,
    /// The contract this signature belongs to.
    pub contract_id: String,
    /// The submitted signature this package evidences.
    pub signature_id: String,
    /// Hash of the canonical agreement content shown to the signer.
    pub document_content_hash: Hash256,
    /// Hash over the frozen fields; see [`EvidencePackage::recompute_hash`].
    pub package_hash: Hash256,
    /// The frozen signer snapshot.
    pub snapshot: SignerSnapshot,
    /// Optional countersignature over `package_hash`.
    pub countersignature: Option<CounterSignature>,
    /// Whether a certificate has since been generated (async flag).
    pub certificate_generated: bool,
    /// Package creation time in milliseconds.
    pub created_at_ms: u64,
    /// Whether the package has since been archived (async flag).
    pub is_archived: bool,
}

impl EvidencePackage {
    /// Recompute the package hash from the stored fields.
    ///
    /// The hash covers, in this order, each input length-prefixed under
    /// the `PACKAGE-HASH` domain label:
    ///
    /// 1. `id`
    /// 2. `contract_id`
    /// 3. `signature_id`
    /// 4. `document_content_hash` bytes
    /// 5. `created_at_ms` as 8-byte big-endian
    /// 6. `party` as canonical JSON
    /// 7. `required_consent_keys` as canonical JSON
    /// 8. `consents` as canonical JSON
    /// 9. `witness` as canonical JSON (`null` when absent)
    /// 10. `notary` as canonical JSON (`null` when absent)
    /// 11. `device_context` as canonical JSON
    /// 12. `metadata` as canonical JSON
    /// 13. `raster_png` raw bytes
    ///
    /// Canonical JSON is `serde_json` over the declared struct field
    /// order. Independent implementations holding the same snapshot
    /// reproduce the hash exactly.
    ///
    /// # Errors
    ///
    /// Returns [`EvidenceError::Serialization`] if a snapshot field cannot
    /// be serialized.
    pub fn recompute_hash(&self) -> Result<Hash256> {
        compute_package_hash(
            &self.id,
            &self.contract_id,
            &self.signature_id,
            &self.document_content_hash,
            self.created_at_ms,
            &self.snapshot,
        )
    }

    /// Record that a certificate has been generated for this package.
    pub fn mark_certificate_generated(&mut self) {
        self.certificate_generated = true;
    }

    /// Record that this package has been archived.
    pub fn archive(&mut self) {
        self.is_archived = true;
    }
}

fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| EvidenceError::Serialization(e.to_string()))
}

fn compute_package_hash(
    id: &str,
    contract_id: &str,
    signature_id: &str,
    document_content_hash: &Hash256,
    created_at_ms: u64,
    snapshot: &SignerSnapshot,
) -> Result<Hash256> {
    let party = canonical_json(&snapshot.party)?;
    let required = canonical_json(&snapshot.required_consent_keys)?;
    let consents = canonical_json(&snapshot.consents)?;
    let witness = canonical_json(&snapshot.witness)?;
    let notary = canonical_json(&snapshot.notary)?;
    let device = canonical_json(&snapshot.device_context)?;
    let metadata = canonical_json(&snapshot.metadata)?;

    Ok(domain_hash(
        purposes::PACKAGE_HASH,
        &[
            id.as_bytes(),
            contract_id.as_bytes(),
            signature_id.as_bytes(),
            document_content_hash.as_bytes(),
            &created_at_ms.to_be_bytes(),
            &party,
            &required,
            &consents,
            &witness,
            &notary,
            &device,
            &metadata,
            &snapshot.raster_png,
        ],
    ))
}

/// Hash canonical agreement content under the document domain.
///
/// Always computed over the canonical text/version, never over rendered
/// presentation.
pub fn document_content_hash(content: &str) -> Hash256 {
    domain_hash(purposes::DOCUMENT_HASH, &[content.as_bytes()])
}

/// The document version a package will reference.
enum DocumentDigest {
    /// Canonical agreement content; hashed by the builder.
    Content(String),
    /// A hash already computed by the contract provider.
    Precomputed(Hash256),
}

/// Assembles an [`EvidencePackage`] from one signing session.
pub struct EvidencePackageBuilder {
    contract_id: String,
    package_id: Option<String>,
    signature_id: Option<String>,
    document: Option<DocumentDigest>,
    party: Option<Party>,
    required_consent_keys: Vec<String>,
    consents: Vec<Consent>,
    witness: Option<Witness>,
    notary: Option<Notary>,
    device_context: Option<DeviceContext>,
    capture: Option<(SignatureCapture, u32, u32)>,
    created_at_ms: Option<u64>,
}

impl EvidencePackageBuilder {
    /// Start a builder for the given contract.
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            package_id: None,
            signature_id: None,
            document: None,
            party: None,
            required_consent_keys: Vec::new(),
            consents: Vec::new(),
            witness: None,
            notary: None,
            device_context: None,
            capture: None,
            created_at_ms: None,
        }
    }

    /// Supply the canonical agreement content; the builder hashes it.
    pub fn document_content(mut self, content: impl Into<String>) -> Self {
        self.document = Some(DocumentDigest::Content(content.into()));
        self
    }

    /// Supply a document hash already computed by the contract provider.
    ///
    /// This must be the hash of the exact version shown to the signer.
    pub fn document_hash(mut self, hash: Hash256) -> Self {
        self.document = Some(DocumentDigest::Precomputed(hash));
        self
    }

    /// The signing party to freeze.
    pub fn party(mut self, party: Party) -> Self {
        self.party = Some(party);
        self
    }

    /// The configured required consent keys and the recorded consents.
    pub fn consents(mut self, required_keys: Vec<String>, consents: Vec<Consent>) -> Self {
        self.required_consent_keys = required_keys;
        self.consents = consents;
        self
    }

    /// The entered witness record, if any.
    pub fn witness(mut self, witness: Option<Witness>) -> Self {
        self.witness = witness;
        self
    }

    /// The entered notary record, if any.
    pub fn notary(mut self, notary: Option<Notary>) -> Self {
        self.notary = notary;
        self
    }

    /// The collected device context. Defaults to
    /// [`DeviceContext::unknown`] — context trouble never blocks a
    /// package.
    pub fn device_context(mut self, context: DeviceContext) -> Self {
        self.device_context = Some(context);
        self
    }

    /// The sealed capture and the logical surface size to render at.
    pub fn capture(mut self, capture: SignatureCapture, width: u32, height: u32) -> Self {
        self.capture = Some((capture, width, height));
        self
    }

    /// Explicit package id (defaults to a fresh random id).
    pub fn package_id(mut self, id: impl Into<String>) -> Self {
        self.package_id = Some(id.into());
        self
    }

    /// Explicit signature id (defaults to a fresh random id).
    pub fn signature_id(mut self, id: impl Into<String>) -> Self {
        self.signature_id = Some(id.into());
        self
    }

    /// Explicit creation timestamp (defaults to the system clock).
    pub fn created_at_ms(mut self, at: u64) -> Self {
        self.created_at_ms = Some(at);
        self
    }

    /// Build the package, optionally countersigning the hash.
    ///
    /// # Errors
    ///
    /// Fails fast with [`EvidenceError::MissingDocumentContent`] when no
    /// document content or hash was supplied — a package must never
    /// reference an unknown document version. Also fails when party or
    /// capture are missing, on raster errors, and on signer rejection.
    pub fn build(self, signer: Option<&dyn EvidenceSigner>) -> Result<EvidencePackage> {
        let document_content_hash = match self.document {
            Some(DocumentDigest::Content(content)) => document_content_hash(&content),
            Some(DocumentDigest::Precomputed(hash)) => hash,
            None => {
                return Err(EvidenceError::MissingDocumentContent {
                    reason: "no agreement content or precomputed hash supplied".into(),
                })
            }
        };

        let party = self
            .party
            .ok_or(EvidenceError::MissingBuilderField { field: "party" })?;
        let (capture, width, height) = self
            .capture
            .ok_or(EvidenceError::MissingBuilderField { field: "capture" })?;

        // Fixed order, fixed background: byte-identical for equal strokes.
        let mut surface = RasterSurface::new(width, height)?;
        surface.render_all(capture.strokes());
        let raster_png = surface.encode_png()?;

        let metadata = SignatureMetadata::of(&capture);
        let device_context = self.device_context.unwrap_or_else(DeviceContext::unknown);

        let snapshot = SignerSnapshot {
            party,
            required_consent_keys: self.required_consent_keys,
            consents: self.consents,
            witness: self.witness,
            notary: self.notary,
            device_context,
            strokes: capture.strokes().to_vec(),
            metadata,
            raster_png,
        };

        let id = self.package_id.unwrap_or_else(|| generate_id("pkg"));
        let signature_id = self.signature_id.unwrap_or_else(|| generate_id("sig"));
        let created_at_ms = self.created_at_ms.unwrap_or_else(current_timestamp_ms);

        let package_hash = compute_package_hash(
            &id,
            &self.contract_id,
            &signature_id,
            &document_content_hash,
            created_at_ms,
            &snapshot,
        )?;

        let countersignature = match signer {
            Some(signer) => Some(CounterSignature {
                algorithm: signer.algorithm().to_string(),
                signature: signer.sign_digest(package_hash.as_bytes())?,
            }),
            None => None,
        };

        debug!(package = %id, hash = %package_hash, "evidence package built");

        Ok(EvidencePackage {
            id,
            contract_id: self.contract_id,
            signature_id,
            document_content_hash,
            package_hash,
            snapshot,
            countersignature,
            certificate_generated: false,
            created_at_ms,
            is_archived: false,
        })
    }
}

/// Generate a prefixed random identifier (16 random bytes, hex-encoded).
fn generate_id(prefix: &str) -> String {
    let mut bytes = [0u8; 16];
    getrandom::getrandom(&mut bytes).expect("getrandom failed");
    format!("{prefix}_{}", hex::encode(bytes))
}

/// Current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
