//! Collaborator contracts for the two directories of record.
//!
//! The reconciliation engine depends on these traits rather than on the
//! HTTP clients, so every orchestration path can be exercised against
//! in-memory fakes.

use async_trait::async_trait;

use crate::error::ConnectorResult;
use crate::models::{AdminType, AuthRole, AuthUser, NomisRole, NomisUser};

/// The authentication directory — source of truth for roles and users.
#[async_trait]
pub trait SourceDirectory: Send + Sync {
    /// Fetch every role in one bulk call.
    async fn fetch_all_roles(&self) -> ConnectorResult<Vec<AuthRole>>;

    /// Fetch every user in one bulk call.
    async fn fetch_all_users(&self) -> ConnectorResult<Vec<AuthUser>>;

    /// Create a role in the authentication directory.
    async fn create_role(&self, role: &AuthRole) -> ConnectorResult<()>;

    /// Update a role's name.
    async fn update_role(&self, code: &str, name: &str) -> ConnectorResult<()>;

    /// Replace a role's admin-type set.
    async fn update_role_admin_type(
        &self,
        code: &str,
        types: &[AdminType],
    ) -> ConnectorResult<()>;
}

/// The prison-systems directory — downstream copy that should mirror
/// source-of-truth roles.
#[async_trait]
pub trait TargetDirectory: Send + Sync {
    /// Fetch every role in one bulk call.
    async fn fetch_all_roles(&self) -> ConnectorResult<Vec<NomisRole>>;

    /// Fetch every user in one bulk call.
    async fn fetch_all_users(&self) -> ConnectorResult<Vec<NomisUser>>;

    /// Create a role in the prison-systems directory.
    async fn create_role(
        &self,
        code: &str,
        name: &str,
        admin_role_only: bool,
    ) -> ConnectorResult<()>;

    /// Update a role in the prison-systems directory.
    async fn update_role(
        &self,
        code: &str,
        name: &str,
        admin_role_only: bool,
    ) -> ConnectorResult<()>;
}
