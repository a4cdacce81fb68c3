// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-subject record of named validation outcomes.

use crate::error::{HarnessError, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Outcomes per subject (usually a cluster name), per operation key.
///
/// Writes to an existing key are ANDed with the stored value, so once a key
/// failed it stays failed for the rest of the scenario.
#[derive(Debug, Default)]
pub struct ValidationLedger {
    subjects: BTreeMap<String, BTreeMap<String, bool>>,
}

impl ValidationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, subject: &str, key: &str, value: bool) {
        let entry = self
            .subjects
            .entry(subject.to_string())
            .or_default()
            .entry(key.to_string())
            .or_insert(value);
        *entry = *entry && value;
        debug!("Ledger {}/{} <- {} (now {})", subject, key, value, *entry);
    }

    /// `None` when the key was never written for this subject
    pub fn get(&self, subject: &str, key: &str) -> Option<bool> {
        self.subjects.get(subject)?.get(key).copied()
    }

    /// Recorded outcomes for a subject, ordered by key
    pub fn outcomes(&self, subject: &str) -> impl Iterator<Item = (&str, bool)> {
        self.subjects
            .get(subject)
            .into_iter()
            .flatten()
            .map(|(key, passed)| (key.as_str(), *passed))
    }

    /// Fails with every failed key when any recorded outcome is false.
    /// A subject with no outcomes passes.
    pub fn assert_all_passed(&self, subject: &str) -> Result<()> {
        let failed: Vec<String> = self
            .outcomes(subject)
            .filter(|(_, passed)| !passed)
            .map(|(key, _)| key.to_string())
            .collect();

        if failed.is_empty() {
            info!("All validations passed for {}", subject);
            Ok(())
        } else {
            Err(HarnessError::ValidationError {
                subject: subject.to_string(),
                failed,
            })
        }
    }

    /// Drop everything recorded for a subject at scenario teardown
    pub fn discard(&mut self, subject: &str) {
        self.subjects.remove(subject);
    }
}
