//! Corrective role reconciliation.
//!
//! Compares the authentication directory's roles (source of truth) with
//! the prison-systems directory's copy and, outside dry-run mode, pushes
//! corrective creates/updates downstream. The engine never deletes:
//! roles that exist only downstream are anomalies, surfaced through the
//! report and the audit sink for manual triage.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use dirsync_connector::{SourceDirectory, TargetDirectory};

use crate::audit::AuditSink;
use crate::compare::{classify, compare};
use crate::error::{SyncError, SyncResult};
use crate::report::{ReconciliationReport, SyncOutcome, UpdateType};
use crate::snapshot::{auth_role_snapshot, nomis_role_snapshot, record_set, FieldSnapshot};

/// Audit event for a successfully applied corrective change.
pub const EVENT_ROLE_APPLIED: &str = "role.sync.applied";
/// Audit event for a failed corrective write.
pub const EVENT_ROLE_FAILURE: &str = "role.sync.failure";
/// Audit event for a role that exists downstream but not in the source.
pub const EVENT_ROLE_ORPHANED: &str = "role.sync.orphaned";

/// Orchestrates role reconciliation between the two directories.
pub struct RoleReconciler {
    source: Arc<dyn SourceDirectory>,
    target: Arc<dyn TargetDirectory>,
    audit: Arc<dyn AuditSink>,
}

impl RoleReconciler {
    /// Create a reconciler over the given collaborators.
    #[must_use]
    pub fn new(
        source: Arc<dyn SourceDirectory>,
        target: Arc<dyn TargetDirectory>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            source,
            target,
            audit,
        }
    }

    /// Run one role reconciliation.
    ///
    /// With `dry_run` set, computes and reports drift without issuing any
    /// write. Otherwise drifted roles are updated and missing roles
    /// created downstream, one key at a time; a failed write is isolated
    /// to that key's outcome and never aborts the batch.
    ///
    /// The returned report contains only keys with effective drift or an
    /// error — outcomes that resolved to NONE are stripped.
    ///
    /// # Errors
    ///
    /// Fails only when one of the two bulk fetches fails; no partial
    /// report is returned in that case.
    pub async fn sync_roles(&self, dry_run: bool) -> SyncResult<ReconciliationReport> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, dry_run, "starting role reconciliation");

        let source_roles = self
            .source
            .fetch_all_roles()
            .await
            .map_err(SyncError::SourceFetch)?;
        let target_roles = self
            .target
            .fetch_all_roles()
            .await
            .map_err(SyncError::TargetFetch)?;

        debug!(
            run_id = %run_id,
            source_count = source_roles.len(),
            target_count = target_roles.len(),
            "fetched role sets"
        );

        let source_set = record_set(source_roles.iter().map(auth_role_snapshot));
        let target_set = record_set(target_roles.iter().map(nomis_role_snapshot));

        let partition = classify(&source_set, &target_set);
        let mut report = ReconciliationReport::new();

        for key in &partition.matched {
            let result = compare(source_set.get(key), target_set.get(key));
            if result.is_equal() {
                continue;
            }

            let mut outcome = SyncOutcome::new(key, result.describe(), UpdateType::Update);
            warn!(run_id = %run_id, role_code = %key, differences = %outcome.differences, "role drift detected");

            if !dry_run {
                match self.apply_update(key, &source_set[key]).await {
                    Ok(()) => self.emit_applied(key, &outcome.differences),
                    Err(e) => {
                        error!(run_id = %run_id, role_code = %key, error = %e, "role update failed");
                        outcome.mark_failed();
                        self.emit_failure(key);
                    }
                }
            }
            report.record(outcome);
        }

        for key in &partition.source_only {
            let result = compare(source_set.get(key), None);
            let mut outcome = SyncOutcome::new(key, result.describe(), UpdateType::Insert);
            warn!(run_id = %run_id, role_code = %key, "role missing downstream");

            if !dry_run {
                match self.apply_create(key, &source_set[key]).await {
                    Ok(()) => self.emit_applied(key, &outcome.differences),
                    Err(e) => {
                        error!(run_id = %run_id, role_code = %key, error = %e, "role create failed");
                        outcome.mark_failed();
                        self.emit_failure(key);
                    }
                }
            }
            report.record(outcome);
        }

        for key in &partition.target_only {
            // Anomaly: downstream has a role the source no longer
            // recognises. Never written, never deleted — alerted only.
            let result = compare(None, target_set.get(key));
            warn!(run_id = %run_id, role_code = %key, "role exists only downstream");
            if !dry_run {
                self.audit.emit(
                    EVENT_ROLE_ORPHANED,
                    HashMap::from([("roleCode".to_string(), key.clone())]),
                );
            }
            report.record(SyncOutcome::new(key, result.describe(), UpdateType::None));
        }

        report.strip_no_action();

        let summary = report.summary();
        info!(
            run_id = %run_id,
            dry_run,
            total = summary.total,
            updates = summary.count(UpdateType::Update),
            inserts = summary.count(UpdateType::Insert),
            errors = summary.count(UpdateType::Error),
            "role reconciliation completed"
        );

        Ok(report)
    }

    async fn apply_update(
        &self,
        key: &str,
        source: &FieldSnapshot,
    ) -> dirsync_connector::ConnectorResult<()> {
        let (name, admin_role_only) = denormalized_fields(source);
        self.target.update_role(key, name, admin_role_only).await
    }

    async fn apply_create(
        &self,
        key: &str,
        source: &FieldSnapshot,
    ) -> dirsync_connector::ConnectorResult<()> {
        let (name, admin_role_only) = denormalized_fields(source);
        self.target.create_role(key, name, admin_role_only).await
    }

    fn emit_applied(&self, key: &str, differences: &str) {
        self.audit.emit(
            EVENT_ROLE_APPLIED,
            HashMap::from([
                ("roleCode".to_string(), key.to_string()),
                ("differences".to_string(), differences.to_string()),
            ]),
        );
    }

    /// Failure events carry the key only — difference payloads stay out
    /// of generic telemetry.
    fn emit_failure(&self, key: &str) {
        self.audit.emit(
            EVENT_ROLE_FAILURE,
            HashMap::from([("roleCode".to_string(), key.to_string())]),
        );
    }
}

/// Extract the write-call fields from a source role snapshot.
fn denormalized_fields(snapshot: &FieldSnapshot) -> (&str, bool) {
    (
        snapshot.text("roleName").unwrap_or(""),
        snapshot.flag("adminRoleOnly").unwrap_or(true),
    )
}
