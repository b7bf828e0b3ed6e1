//! Witness and notary attestor records.
//!
//! Whether an attestor is required is configuration; the records
//! themselves are entered during the Capture step. Completeness checks
//! return every blank field at once so the host can highlight all of them
//! together.

use serde::{Deserialize, Serialize};

use crate::error::GuardViolation;

/// Which attestor a violation refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestorRole {
    /// A witness to the signing.
    Witness,
    /// A commissioned notary.
    Notary,
}

impl std::fmt::Display for AttestorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Witness => f.write_str("witness"),
            Self::Notary => f.write_str("notary"),
        }
    }
}

/// A witness record accompanying a signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// Witness full name.
    pub name: String,
    /// Witness contact email.
    pub email: String,
    /// Optional contact phone.
    pub phone: Option<String>,
}

impl Witness {
    /// Blank required fields of this record.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }
}

/// A notary record accompanying a signature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notary {
    /// Notary full name.
    pub name: String,
    /// Commission identifier.
    pub commission_id: String,
    /// Commissioning jurisdiction.
    pub jurisdiction: String,
}

impl Notary {
    /// Blank required fields of this record.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.commission_id.trim().is_empty() {
            missing.push("commission_id");
        }
        if self.jurisdiction.trim().is_empty() {
            missing.push("jurisdiction");
        }
        missing
    }
}

/// Configured attestor requirements for a signing session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestorRequirements {
    /// Whether a complete witness record is required.
    pub witness_required: bool,
    /// Whether a complete notary record is required.
    pub notary_required: bool,
}

impl AttestorRequirements {
    /// No attestors required.
    pub fn none() -> Self {
        Self::default()
    }

    /// Collect every attestor violation for the entered records.
    ///
    /// A required attestor with no record yields a missing-attestor
    /// violation; a present record (required or not) with blank fields
    /// yields one violation per blank field. All violations are returned
    /// together.
    pub fn violations(
        &self,
        witness: Option<&Witness>,
        notary: Option<&Notary>,
    ) -> Vec<GuardViolation> {
        let mut violations = Vec::new();

        match witness {
            None if self.witness_required => violations.push(GuardViolation::MissingAttestor {
                role: AttestorRole::Witness,
            }),
            Some(w) => {
                for field in w.missing_fields() {
                    violations.push(GuardViolation::BlankAttestorField {
                        role: AttestorRole::Witness,
                        field,
                    });
                }
            }
            None => {}
        }

        match notary {
            None if self.notary_required => violations.push(GuardViolation::MissingAttestor {
                role: AttestorRole::Notary,
            }),
            Some(n) => {
                for field in n.missing_fields() {
                    violations.push(GuardViolation::BlankAttestorField {
                        role: AttestorRole::Notary,
                        field,
                    });
                }
            }
            None => {}
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn witness() -> Witness {
        Witness {
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            phone: None,
        }
    }

    fn notary() -> Notary {
        Notary {
            name: "Jean Bartik".into(),
            commission_id: "COM-42".into(),
            jurisdiction: "PA".into(),
        }
    }

    #[test]
    fn test_no_requirements_no_records_is_clean() {
        assert!(AttestorRequirements::none().violations(None, None).is_empty());
    }

    #[test]
    fn test_required_witness_missing() {
        let reqs = AttestorRequirements {
            witness_required: true,
            notary_required: false,
        };
        let violations = reqs.violations(None, None);
        assert_eq!(
            violations,
            vec![GuardViolation::MissingAttestor {
                role: AttestorRole::Witness
            }]
        );
    }

    #[test]
    fn test_blank_fields_reported_per_field() {
        let reqs = AttestorRequirements {
            witness_required: true,
            notary_required: true,
        };
        let incomplete = Witness {
            name: String::new(),
            email: String::new(),
            phone: None,
        };
        let violations = reqs.violations(Some(&incomplete), Some(&notary()));
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| matches!(
            v,
            GuardViolation::BlankAttestorField {
                role: AttestorRole::Witness,
                ..
            }
        )));
    }

    #[test]
    fn test_both_attestors_checked_together() {
        // Neither check may short-circuit the other.
        let reqs = AttestorRequirements {
            witness_required: true,
            notary_required: true,
        };
        let violations = reqs.violations(None, None);
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_optional_but_present_record_is_still_validated() {
        let reqs = AttestorRequirements::none();
        let incomplete = Notary {
            name: "N".into(),
            commission_id: String::new(),
            jurisdiction: String::new(),
        };
        let violations = reqs.violations(None, Some(&incomplete));
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_complete_records_are_clean() {
        let reqs = AttestorRequirements {
            witness_required: true,
            notary_required: true,
        };
        assert!(reqs.violations(Some(&witness()), Some(&notary())).is_empty());
    }
}
