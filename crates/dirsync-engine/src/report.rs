//! Reconciliation report and per-key outcomes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// What the run did (or would do) for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateType {
    /// No corrective action was or will be taken.
    None,
    /// The role was (or, in dry-run, would be) created downstream.
    Insert,
    /// The role was (or, in dry-run, would be) updated downstream.
    Update,
    /// A corrective write failed for this key.
    Error,
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// Outcome for one key: the key, a human-readable difference
/// description, and the action classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    /// Natural key (role code or username).
    pub key: String,
    /// Human-readable description of the differences found.
    pub differences: String,
    /// Action classification for this key.
    pub update_type: UpdateType,
}

impl SyncOutcome {
    /// Create an outcome with its classification-derived update type.
    #[must_use]
    pub fn new(key: impl Into<String>, differences: impl Into<String>, update_type: UpdateType) -> Self {
        Self {
            key: key.into(),
            differences: differences.into(),
            update_type,
        }
    }

    /// Transition this outcome to ERROR after a failed corrective write.
    pub fn mark_failed(&mut self) {
        self.update_type = UpdateType::Error;
    }
}

/// Accumulated outcomes of one reconciliation run, keyed by natural key.
///
/// Serializes as a JSON object keyed by the natural key, each value
/// carrying `{key, differences, updateType}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReconciliationReport {
    outcomes: BTreeMap<String, SyncOutcome>,
}

impl ReconciliationReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one key.
    pub fn record(&mut self, outcome: SyncOutcome) {
        self.outcomes.insert(outcome.key.clone(), outcome);
    }

    /// Look up the outcome for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SyncOutcome> {
        self.outcomes.get(key)
    }

    /// Iterate outcomes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SyncOutcome)> {
        self.outcomes.iter()
    }

    /// Number of recorded outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Remove every outcome whose final update type resolved to NONE,
    /// leaving only keys with effective drift or an error.
    pub fn strip_no_action(&mut self) {
        self.outcomes
            .retain(|_, outcome| outcome.update_type != UpdateType::None);
    }

    /// Summarize outcome counts by update type.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let mut by_type: HashMap<String, u32> = HashMap::new();
        for outcome in self.outcomes.values() {
            *by_type.entry(outcome.update_type.to_string()).or_insert(0) += 1;
        }
        ReportSummary {
            total: self.outcomes.len() as u32,
            by_type,
        }
    }
}

/// Summary of a report: outcome counts by update type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total outcomes in the report.
    pub total: u32,
    /// Counts keyed by update-type literal.
    pub by_type: HashMap<String, u32>,
}

impl ReportSummary {
    /// Count for one update type.
    #[must_use]
    pub fn count(&self, update_type: UpdateType) -> u32 {
        self.by_type
            .get(&update_type.to_string())
            .copied()
            .unwrap_or(0)
    }
}
