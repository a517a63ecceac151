//! # Directory Connectors
//!
//! Collaborator contracts and HTTP clients for the two directories of
//! record that the reconciliation engine works against:
//!
//! - the **authentication directory** (source of truth for roles and
//!   users), reached through [`AuthDirectoryClient`];
//! - the **prison-systems directory** (downstream copy), reached through
//!   [`NomisDirectoryClient`].
//!
//! The engine itself only depends on the [`SourceDirectory`] and
//! [`TargetDirectory`] traits, so it can be tested without any HTTP
//! stack. The clients here are reqwest-based implementations of those
//! traits with OAuth2 client-credentials authentication and retry on
//! transient read failures.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod traits;

pub use auth::{DirectoryAuth, DirectoryCredentials};
pub use client::{AuthDirectoryClient, NomisDirectoryClient};
pub use config::DirectoryConfig;
pub use error::{ConnectorError, ConnectorResult};
pub use models::{AdminType, AuthRole, AuthUser, NomisRole, NomisUser};
pub use retry::RetryPolicy;
pub use traits::{SourceDirectory, TargetDirectory};
