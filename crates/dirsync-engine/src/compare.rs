//! Symmetric snapshot comparison and key classification.

use std::collections::BTreeSet;

use crate::snapshot::{DirectoryRecordSet, FieldSnapshot, FieldValue};

/// Symmetric comparison of two optional snapshots for the same key.
///
/// `differing` maps a field name to `(target value, source value)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonResult {
    /// Fields present only in the source-of-truth snapshot.
    pub only_in_source: Vec<(&'static str, FieldValue)>,
    /// Fields present only in the downstream snapshot.
    pub only_in_target: Vec<(&'static str, FieldValue)>,
    /// Fields present in both with differing values, as (target, source).
    pub differing: Vec<(&'static str, (FieldValue, FieldValue))>,
}

impl ComparisonResult {
    /// Whether the two snapshots are identical.
    #[must_use]
    pub fn is_equal(&self) -> bool {
        self.only_in_source.is_empty()
            && self.only_in_target.is_empty()
            && self.differing.is_empty()
    }

    /// Render a human-readable description of the differences.
    ///
    /// One segment per non-empty set, joined with `"; "`, e.g.
    /// `only in source: roleName=Audit Viewer, adminRoleOnly=true` or
    /// `adminRoleOnly: (true, false)`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut segments = Vec::new();

        if !self.differing.is_empty() {
            segments.push(
                self.differing
                    .iter()
                    .map(|(name, (target, source))| format!("{name}: ({target}, {source})"))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        if !self.only_in_source.is_empty() {
            segments.push(format!(
                "only in source: {}",
                self.only_in_source
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        if !self.only_in_target.is_empty() {
            segments.push(format!(
                "only in target: {}",
                self.only_in_target
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        segments.join("; ")
    }
}

/// Compare two optional snapshots for the same key.
///
/// Both-absent is handled defensively as equal (classification should
/// never produce that pairing). Value equality is exact: case-sensitive
/// for text, exact for booleans — any normalization happened during
/// snapshot construction.
#[must_use]
pub fn compare(
    source: Option<&FieldSnapshot>,
    target: Option<&FieldSnapshot>,
) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    match (source, target) {
        (None, None) => {}
        (Some(source), None) => {
            result.only_in_source = source
                .iter()
                .map(|(name, value)| (name, value.clone()))
                .collect();
        }
        (None, Some(target)) => {
            result.only_in_target = target
                .iter()
                .map(|(name, value)| (name, value.clone()))
                .collect();
        }
        (Some(source), Some(target)) => {
            let names: BTreeSet<&'static str> = source
                .iter()
                .map(|(name, _)| name)
                .chain(target.iter().map(|(name, _)| name))
                .collect();

            for name in names {
                match (source.get(name), target.get(name)) {
                    (Some(s), Some(t)) if s == t => {}
                    (Some(s), Some(t)) => {
                        result.differing.push((name, (t.clone(), s.clone())));
                    }
                    (Some(s), None) => result.only_in_source.push((name, s.clone())),
                    (None, Some(t)) => result.only_in_target.push((name, t.clone())),
                    (None, None) => unreachable!("name came from one of the snapshots"),
                }
            }
        }
    }

    result
}

/// Partition of the union of two key spaces into three disjoint sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPartition {
    /// Keys present in both directories — candidates for update.
    pub matched: BTreeSet<String>,
    /// Keys present only in the source of truth — candidates for insert.
    pub source_only: BTreeSet<String>,
    /// Keys present only downstream — anomalies, never auto-corrected.
    pub target_only: BTreeSet<String>,
}

/// Classify the union of both key spaces.
///
/// The three sets are disjoint and together cover every key from both
/// inputs exactly once.
#[must_use]
pub fn classify(source: &DirectoryRecordSet, target: &DirectoryRecordSet) -> KeyPartition {
    let mut partition = KeyPartition::default();

    for key in source.keys() {
        if target.contains_key(key) {
            partition.matched.insert(key.clone());
        } else {
            partition.source_only.insert(key.clone());
        }
    }
    for key in target.keys() {
        if !source.contains_key(key) {
            partition.target_only.insert(key.clone());
        }
    }

    partition
}
