//! Read-only user drift reporting.
//!
//! Same fetch/snapshot/classify/compare mechanics as role reconciliation
//! but restricted to users and purely observational: no corrective call
//! is ever issued, every outcome carries update type NONE, and nothing
//! is stripped from the report — callers rely on seeing every drifted
//! key to drive manual triage.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use dirsync_connector::{SourceDirectory, TargetDirectory};

use crate::compare::{classify, compare};
use crate::error::{SyncError, SyncResult};
use crate::report::{ReconciliationReport, SyncOutcome, UpdateType};
use crate::snapshot::{auth_user_snapshot, nomis_user_snapshot, record_set};

/// Reports drift between the two directories' user records.
pub struct UserDriftReporter {
    source: Arc<dyn SourceDirectory>,
    target: Arc<dyn TargetDirectory>,
}

impl UserDriftReporter {
    /// Create a reporter over the given collaborators.
    #[must_use]
    pub fn new(source: Arc<dyn SourceDirectory>, target: Arc<dyn TargetDirectory>) -> Self {
        Self { source, target }
    }

    /// Compute the current user drift between the two directories.
    ///
    /// # Errors
    ///
    /// Fails only when one of the two bulk fetches fails.
    pub async fn report_user_drift(&self) -> SyncResult<ReconciliationReport> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, "starting user drift report");

        let source_users = self
            .source
            .fetch_all_users()
            .await
            .map_err(SyncError::SourceFetch)?;
        let target_users = self
            .target
            .fetch_all_users()
            .await
            .map_err(SyncError::TargetFetch)?;

        debug!(
            run_id = %run_id,
            source_count = source_users.len(),
            target_count = target_users.len(),
            "fetched user sets"
        );

        let source_set = record_set(source_users.iter().map(auth_user_snapshot));
        let target_set = record_set(target_users.iter().map(nomis_user_snapshot));

        let partition = classify(&source_set, &target_set);
        let mut report = ReconciliationReport::new();

        for key in &partition.matched {
            let result = compare(source_set.get(key), target_set.get(key));
            if result.is_equal() {
                continue;
            }
            warn!(run_id = %run_id, username = %key, differences = %result.describe(), "user drift detected");
            report.record(SyncOutcome::new(key, result.describe(), UpdateType::None));
        }

        for key in &partition.source_only {
            let result = compare(source_set.get(key), None);
            report.record(SyncOutcome::new(key, result.describe(), UpdateType::None));
        }

        for key in &partition.target_only {
            let result = compare(None, target_set.get(key));
            report.record(SyncOutcome::new(key, result.describe(), UpdateType::None));
        }

        info!(
            run_id = %run_id,
            drifted = report.len(),
            "user drift report completed"
        );

        Ok(report)
    }
}
