//! Signing party records.
//!
//! Parties are supplied externally (by the contract provider); the core
//! validates that the signing party is resolvable before capture begins,
//! and freezes a deep copy into the evidence package at build time.

use serde::{Deserialize, Serialize};

/// The role a party plays on the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    /// The first-listed signer.
    Primary,
    /// The counter-signer.
    Secondary,
    /// Any further signer.
    Additional,
}

impl PartyRole {
    /// Wire-format string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Additional => "additional",
        }
    }
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the party signs as a person or an organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    /// A natural person.
    Individual,
    /// A company or other legal entity.
    Organization,
}

/// An externally supplied signing party.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Stable identifier assigned by the contract provider.
    pub id: String,
    /// Role on the contract.
    pub role: PartyRole,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Person or organization.
    pub kind: PartyKind,
}

impl Party {
    /// Whether this party is resolvable as a signer.
    ///
    /// A resolvable party has a non-blank id, name, and email.
    pub fn is_resolvable(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// The names of required fields that are blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.trim().is_empty() {
            missing.push("id");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }
}
