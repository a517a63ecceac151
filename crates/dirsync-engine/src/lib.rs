//! # Directory Reconciliation Engine
//!
//! Detects and (for roles) corrects drift between the authentication
//! directory — the source of truth — and the prison-systems directory,
//! its downstream copy.
//!
//! ## Overview
//!
//! A reconciliation run is stateless: it starts from one bulk fetch of
//! each side, builds a deterministic [`FieldSnapshot`] per record, splits
//! the key space into matched / source-only / target-only partitions,
//! compares matched pairs field by field, and accumulates the outcome per
//! key into a [`ReconciliationReport`].
//!
//! Two orchestrators share that machinery:
//!
//! - [`RoleReconciler`] — the corrective path. Outside dry-run mode it
//!   issues update/create calls against the target directory for drifted
//!   and missing roles, isolating per-key write failures so one bad
//!   record never stops the batch. Target-only roles are anomalies: they
//!   are reported and alerted, never written and never deleted.
//! - [`UserDriftReporter`] — the read-only path. Identical comparison
//!   mechanics for users, purely for observability; it never writes.
//!
//! ## Data flow
//!
//! ```text
//! ┌──────────────┐   fetch    ┌───────────────┐   classify   ┌──────────────┐
//! │ Source/Target│ ─────────► │ FieldSnapshots│ ───────────► │  matched /   │
//! │  directories │            │  (per key)    │              │ source-only /│
//! └──────────────┘            └───────────────┘              │ target-only  │
//!                                                            └──────┬───────┘
//!                                 compare + corrective writes       │
//!                             ┌─────────────────────────────────────┘
//!                             ▼
//!                  ┌──────────────────────┐        ┌──────────────┐
//!                  │ ReconciliationReport │        │  AuditSink   │
//!                  │  (key → SyncOutcome) │        │ (per change) │
//!                  └──────────────────────┘        └──────────────┘
//! ```
//!
//! Only bulk-fetch failures cross this crate's boundary as errors; every
//! other condition is captured in the report and/or an audit event.

pub mod audit;
pub mod compare;
pub mod error;
pub mod report;
pub mod roles;
pub mod snapshot;
pub mod users;

pub use audit::{AuditSink, TracingAuditSink};
pub use compare::{classify, compare, ComparisonResult, KeyPartition};
pub use error::{SyncError, SyncResult};
pub use report::{ReconciliationReport, ReportSummary, SyncOutcome, UpdateType};
pub use roles::RoleReconciler;
pub use snapshot::{DirectoryRecordSet, FieldSnapshot, FieldValue};
pub use users::UserDriftReporter;
