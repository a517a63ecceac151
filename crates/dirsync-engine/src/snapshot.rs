//! Deterministic field snapshots of directory records.
//!
//! A [`FieldSnapshot`] is a flat, ordered field-name → scalar-value view
//! of the syncable fields of one record. Builders normalize both sides
//! into the same shape before any comparison happens, so the comparator
//! never needs to know which directory a snapshot came from:
//!
//! - role names are truncated to the downstream 30-character limit, so a
//!   target record that merely reflects truncation is not drift;
//! - `adminRoleOnly` is derived from the admin-type set before
//!   snapshotting, so both sides compare on the same boolean;
//! - a missing email is normalized to the empty string, because one
//!   system models "no email" as null and the other as `""`.

use std::collections::BTreeMap;

use dirsync_connector::{AdminType, AuthRole, AuthUser, NomisRole, NomisUser};

/// Maximum role-name length in the prison-systems directory.
pub const ROLE_NAME_LIMIT: usize = 30;

/// Prefix carried by role codes in the authentication directory,
/// stripped before comparison.
const ROLE_CODE_PREFIX: &str = "ROLE_";

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    /// String-valued field; equality is exact and case-sensitive.
    Text(String),
    /// Boolean-valued field.
    Flag(bool),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// Ordered field-name → value map for one record.
///
/// Two structurally equal records always produce identical snapshots;
/// absent fields are omitted rather than stored as nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    fields: BTreeMap<&'static str, FieldValue>,
}

impl FieldSnapshot {
    fn insert_text(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.insert(name, FieldValue::Text(value.into()));
    }

    fn insert_flag(&mut self, name: &'static str, value: bool) {
        self.fields.insert(name, FieldValue::Flag(value));
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look up a text field, if present and text-valued.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a boolean field, if present and boolean-valued.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name) {
            Some(FieldValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Number of fields in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the snapshot has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The full result of one directory fetch: natural key → snapshot.
pub type DirectoryRecordSet = BTreeMap<String, FieldSnapshot>;

/// Normalize a role code: strip the `ROLE_` prefix when present.
#[must_use]
pub fn normalize_role_code(code: &str) -> String {
    code.strip_prefix(ROLE_CODE_PREFIX).unwrap_or(code).to_string()
}

fn truncate_role_name(name: &str) -> String {
    name.chars().take(ROLE_NAME_LIMIT).collect()
}

/// Whether a role with this admin-type set may only be administered
/// centrally: true unless local system administrators are included.
#[must_use]
pub fn derive_admin_role_only(admin_types: &[AdminType]) -> bool {
    !admin_types.contains(&AdminType::DpsLsa)
}

/// Snapshot a source-of-truth role. Returns `(key, snapshot)`; the role
/// code is the key and is not part of the comparable body.
#[must_use]
pub fn auth_role_snapshot(role: &AuthRole) -> (String, FieldSnapshot) {
    let mut snapshot = FieldSnapshot::default();
    snapshot.insert_text("roleName", truncate_role_name(&role.role_name));
    snapshot.insert_flag("adminRoleOnly", derive_admin_role_only(&role.admin_type));
    (normalize_role_code(&role.role_code), snapshot)
}

/// Snapshot a downstream role.
#[must_use]
pub fn nomis_role_snapshot(role: &NomisRole) -> (String, FieldSnapshot) {
    let mut snapshot = FieldSnapshot::default();
    snapshot.insert_text("roleName", truncate_role_name(&role.name));
    snapshot.insert_flag("adminRoleOnly", role.admin_role_only);
    (normalize_role_code(&role.code), snapshot)
}

/// Snapshot a source-of-truth user.
#[must_use]
pub fn auth_user_snapshot(user: &AuthUser) -> (String, FieldSnapshot) {
    user_snapshot(&user.username, user.email.as_deref())
}

/// Snapshot a downstream user.
#[must_use]
pub fn nomis_user_snapshot(user: &NomisUser) -> (String, FieldSnapshot) {
    user_snapshot(&user.username, user.email.as_deref())
}

fn user_snapshot(username: &str, email: Option<&str>) -> (String, FieldSnapshot) {
    let mut snapshot = FieldSnapshot::default();
    snapshot.insert_text("userName", username);
    snapshot.insert_text("email", email.unwrap_or(""));
    (username.to_string(), snapshot)
}

/// Build a record set from snapshotted records.
///
/// The fetch collaborators are assumed to deliver deduplicated data;
/// a duplicate key here indicates an upstream defect and is surfaced
/// loudly rather than silently last-write-wins.
pub fn record_set<I>(snapshots: I) -> DirectoryRecordSet
where
    I: IntoIterator<Item = (String, FieldSnapshot)>,
{
    let mut set = DirectoryRecordSet::new();
    for (key, snapshot) in snapshots {
        if let Some(previous) = set.insert(key.clone(), snapshot) {
            tracing::warn!(key = %key, ?previous, "duplicate key in directory fetch");
        }
    }
    set
}
