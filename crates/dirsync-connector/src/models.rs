//! Wire DTOs for the authentication and prison-systems directories.

use serde::{Deserialize, Serialize};

/// Administration type attached to a role in the authentication directory.
///
/// Controls who may administer (grant/revoke) the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminType {
    /// External-users administrator.
    #[serde(rename = "EXT_ADM")]
    ExtAdm,
    /// Central prison-systems administrator.
    #[serde(rename = "DPS_ADM")]
    DpsAdm,
    /// Local system administrator.
    #[serde(rename = "DPS_LSA")]
    DpsLsa,
}

impl AdminType {
    /// The wire code for this admin type.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ExtAdm => "EXT_ADM",
            Self::DpsAdm => "DPS_ADM",
            Self::DpsLsa => "DPS_LSA",
        }
    }
}

/// A role as held by the authentication directory (source of truth).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRole {
    /// Role code, usually carrying a `ROLE_` prefix on the wire.
    pub role_code: String,
    /// Human-readable role name.
    pub role_name: String,
    /// Admin types that may administer this role.
    #[serde(default)]
    pub admin_type: Vec<AdminType>,
}

/// A user as held by the authentication directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Username, the natural key.
    pub username: String,
    /// Primary email address, absent when the user has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A role as held by the prison-systems directory (downstream copy).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NomisRole {
    /// Role code without any prefix.
    pub code: String,
    /// Role name, limited to 30 characters by the downstream system.
    pub name: String,
    /// Whether the role can only be administered centrally.
    #[serde(default)]
    pub admin_role_only: bool,
}

/// A user as held by the prison-systems directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NomisUser {
    /// Username, the natural key.
    pub username: String,
    /// Primary email address; some accounts model "no email" as an
    /// empty string rather than omitting the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
