//! Property-based tests for evidence components.
//!
//! These tests verify hashing invariants:
//!
//! - Package hashes are stable under unchanged-snapshot recomputation
//! - Any change to a frozen field changes the package hash
//! - Domain-separated hashes never collide across purposes
//! - Hex round-trips preserve hash values

use proptest::prelude::*;

use inkpact_capture::{Point, Rgba8, SignatureCapture, StrokeRecorder};
use inkpact_consent::{Consent, Party, PartyKind, PartyRole};

use crate::device::DeviceContext;
use crate::domain::{domain_hash, purposes};
use crate::hash::Hash256;
use crate::package::{EvidencePackage, EvidencePackageBuilder};
use crate::validation::{ValidationMode, ValidationService};

fn capture_from(points: &[(f32, f32, u64)]) -> SignatureCapture {
    let mut recorder = StrokeRecorder::new(64, 64, Rgba8::BLACK, 2.0).expect("surface");
    let mut iter = points.iter();
    if let Some(&(x, y, ts)) = iter.next() {
        recorder.begin(Point::new(x, y, None, ts)).expect("begin");
        for &(x, y, ts) in iter {
            recorder.extend(Point::new(x, y, None, ts)).expect("extend");
        }
        recorder.end().expect("end");
    }
    recorder.capture().clone()
}

fn package_with(name: &str, created_at_ms: u64, accepted_at: u64) -> EvidencePackage {
    EvidencePackageBuilder::new("ctr_prop")
        .document_content("Agreement under test")
        .party(Party {
            id: "pty_prop".into(),
            role: PartyRole::Primary,
            name: name.into(),
            email: "prop@example.com".into(),
            phone: None,
            kind: PartyKind::Individual,
        })
        .consents(
            vec!["terms".into()],
            vec![Consent {
                key: "terms".into(),
                accepted: true,
                accepted_at_ms: Some(accepted_at),
            }],
        )
        .device_context(DeviceContext::unknown())
        .capture(capture_from(&[(5.0, 5.0, 0), (20.0, 20.0, 30)]), 64, 64)
        .package_id("pkg_prop")
        .signature_id("sig_prop")
        .created_at_ms(created_at_ms)
        .build(None)
        .expect("build")
}

proptest! {
    /// Recomputation of an untouched package always reproduces its hash,
    /// and as-signed validation always passes.
    #[test]
    fn unchanged_snapshot_recomputes_identically(
        name in "[A-Za-z ]{1,24}",
        created in 1_600_000_000_000u64..1_800_000_000_000,
        accepted in 0u64..1_000_000,
    ) {
        let pkg = package_with(&name, created, accepted);
        prop_assert_eq!(pkg.recompute_hash().expect("recompute"), pkg.package_hash.clone());
        let result = ValidationService::new().validate(&pkg, ValidationMode::AsSigned);
        prop_assert!(result.is_valid);
    }

    /// Distinct frozen snapshot content yields distinct package hashes.
    #[test]
    fn distinct_names_yield_distinct_hashes(
        a in "[A-Za-z]{1,16}",
        b in "[A-Za-z]{1,16}",
    ) {
        prop_assume!(a != b);
        let pa = package_with(&a, 1_700_000_000_000, 10);
        let pb = package_with(&b, 1_700_000_000_000, 10);
        prop_assert_ne!(pa.package_hash, pb.package_hash);
    }

    /// Tampering with any consent timestamp after the fact is detected.
    #[test]
    fn tampered_consent_detected(original in 0u64..1_000_000, forged in 0u64..1_000_000) {
        prop_assume!(original != forged);
        let mut pkg = package_with("Ada", 1_700_000_000_000, original);
        pkg.snapshot.consents[0].accepted_at_ms = Some(forged);
        let result = ValidationService::new().validate(&pkg, ValidationMode::AsSigned);
        prop_assert!(!result.is_valid);
    }

    /// Domain purposes partition the hash space for identical input.
    #[test]
    fn purposes_never_collide(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let doc = domain_hash(purposes::DOCUMENT_HASH, &[&data]);
        let pkg = domain_hash(purposes::PACKAGE_HASH, &[&data]);
        let dev = domain_hash(purposes::DEVICE_FINGERPRINT, &[&data]);
        prop_assert_ne!(doc.clone(), pkg.clone());
        prop_assert_ne!(pkg, dev.clone());
        prop_assert_ne!(doc, dev);
    }

    /// Hex round-trips are lossless.
    #[test]
    fn hex_roundtrip_lossless(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        let h = Hash256::hash(&data);
        prop_assert_eq!(Hash256::from_hex(&h.to_hex()).expect("parse"), h);
    }
}
