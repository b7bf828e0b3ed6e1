//! Consent records and the required key-set.
//!
//! The set of legally required consent keys is configuration supplied by
//! the host — the legal taxonomy itself is out of scope and never
//! hardcoded here. The ledger tracks acceptance per key and reports every
//! missing required key at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single consent acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    /// Configuration-supplied consent key (e.g. `terms`, `esign-act`).
    pub key: String,
    /// Whether the signer has accepted.
    pub accepted: bool,
    /// When acceptance happened, in milliseconds; `None` until accepted.
    pub accepted_at_ms: Option<u64>,
}

/// The configured set of required consent keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentConfig {
    required: Vec<String>,
}

impl ConsentConfig {
    /// Build a config from required keys, dropping blank and duplicate
    /// entries while preserving first-seen order.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut required: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if key.trim().is_empty() || required.contains(&key) {
                continue;
            }
            required.push(key);
        }
        Self { required }
    }

    /// The required keys in configuration order.
    pub fn required_keys(&self) -> &[String] {
        &self.required
    }

    /// Whether no keys are required.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

/// Tracks consent acceptance for one signing session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentLedger {
    entries: BTreeMap<String, Consent>,
}

impl ConsentLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record acceptance of a consent key at the given time.
    pub fn accept(&mut self, key: impl Into<String>, accepted_at_ms: u64) {
        let key = key.into();
        self.entries.insert(
            key.clone(),
            Consent {
                key,
                accepted: true,
                accepted_at_ms: Some(accepted_at_ms),
            },
        );
    }

    /// Withdraw a previously recorded acceptance.
    pub fn withdraw(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.accepted = false;
            entry.accepted_at_ms = None;
        }
    }

    /// Whether the given key has been accepted.
    pub fn is_accepted(&self, key: &str) -> bool {
        self.entries.get(key).map_or(false, |c| c.accepted)
    }

    /// Required keys from `config` that have not been accepted, in
    /// configuration order. Always the complete list, never the first hit.
    pub fn missing_required(&self, config: &ConsentConfig) -> Vec<String> {
        config
            .required_keys()
            .iter()
            .filter(|key| !self.is_accepted(key))
            .cloned()
            .collect()
    }

    /// All recorded consents, ordered by key.
    pub fn entries(&self) -> impl Iterator<Item = &Consent> {
        self.entries.values()
    }

    /// Snapshot of all recorded consents, ordered by key.
    pub fn to_vec(&self) -> Vec<Consent> {
        self.entries.values().cloned().collect()
    }

    /// Remove every recorded consent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deduplicates_and_drops_blank() {
        let config = ConsentConfig::new(["terms", "", "terms", "esign-act", "  "]);
        assert_eq!(config.required_keys(), &["terms", "esign-act"]);
    }

    #[test]
    fn test_missing_required_reports_all() {
        let config = ConsentConfig::new(["terms", "esign-act", "privacy"]);
        let mut ledger = ConsentLedger::new();
        ledger.accept("esign-act", 100);
        assert_eq!(ledger.missing_required(&config), vec!["terms", "privacy"]);
    }

    #[test]
    fn test_accept_then_withdraw() {
        let config = ConsentConfig::new(["terms"]);
        let mut ledger = ConsentLedger::new();
        ledger.accept("terms", 100);
        assert!(ledger.is_accepted("terms"));
        assert!(ledger.missing_required(&config).is_empty());

        ledger.withdraw("terms");
        assert!(!ledger.is_accepted("terms"));
        assert_eq!(ledger.missing_required(&config), vec!["terms"]);
    }

    #[test]
    fn test_acceptance_records_timestamp() {
        let mut ledger = ConsentLedger::new();
        ledger.accept("terms", 1234);
        let consent = ledger.to_vec().into_iter().next().unwrap();
        assert_eq!(consent.accepted_at_ms, Some(1234));
        assert!(consent.accepted);
    }

    #[test]
    fn test_unconfigured_acceptance_is_recorded_but_not_required() {
        let config = ConsentConfig::new(["terms"]);
        let mut ledger = ConsentLedger::new();
        ledger.accept("marketing-emails", 5);
        assert_eq!(ledger.missing_required(&config), vec!["terms"]);
        assert_eq!(ledger.to_vec().len(), 1);
    }

    #[test]
    fn test_clear_empties_ledger() {
        let mut ledger = ConsentLedger::new();
        ledger.accept("terms", 1);
        ledger.clear();
        assert_eq!(ledger.to_vec().len(), 0);
    }
}
