//! Engine error types.
//!
//! Only bulk-fetch failures cross the engine boundary as errors. A
//! failed corrective write becomes an ERROR outcome in the report, and a
//! target-only anomaly is a recorded condition, not a failure.

use dirsync_connector::ConnectorError;
use thiserror::Error;

/// Result alias for reconciliation runs.
pub type SyncResult<T> = Result<T, SyncError>;

/// Fatal errors for a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source-of-truth directory could not be fetched.
    #[error("failed to fetch from the authentication directory: {0}")]
    SourceFetch(#[source] ConnectorError),

    /// The downstream directory could not be fetched.
    #[error("failed to fetch from the prison-systems directory: {0}")]
    TargetFetch(#[source] ConnectorError),
}
