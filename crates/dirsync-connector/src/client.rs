//! Reqwest-based directory clients.
//!
//! [`AuthDirectoryClient`] talks to the authentication directory and
//! [`NomisDirectoryClient`] to the prison-systems directory. Both wrap a
//! shared [`HttpDirectory`] helper that handles authentication, status
//! mapping and JSON decoding. Bulk reads go through the configured
//! [`RetryPolicy`]; writes are never retried (the reconciliation engine
//! treats a failed write as a per-key error, and a blind retry could
//! double-apply a create).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::DirectoryAuth;
use crate::config::DirectoryConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::models::{AdminType, AuthRole, AuthUser, NomisRole, NomisUser};
use crate::retry::RetryPolicy;
use crate::traits::{SourceDirectory, TargetDirectory};

/// Shared HTTP plumbing for both directory clients.
#[derive(Debug, Clone)]
struct HttpDirectory {
    base_url: String,
    auth: DirectoryAuth,
    http_client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpDirectory {
    fn from_config(config: DirectoryConfig) -> ConnectorResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(!config.tls_verify)
            .user_agent(concat!("dirsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ConnectorError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;

        let auth = DirectoryAuth::new(config.credentials, http_client.clone());

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
            http_client,
            retry: config.retry,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ConnectorResult<T> {
        debug!(url = %self.url(path), "directory GET");
        let builder = self.http_client.get(self.url(path));
        let builder = self.auth.apply(builder).await?;
        let response = builder.send().await?;
        self.handle_response(response).await
    }

    /// GET with the configured retry policy, for the bulk fetches.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
    ) -> ConnectorResult<T> {
        let retry = self.retry.clone();
        retry.execute(operation, || self.get(path)).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> ConnectorResult<()> {
        debug!(url = %self.url(path), "directory POST");
        let builder = self.http_client.post(self.url(path));
        let builder = self.auth.apply(builder).await?;
        let response = builder.json(body).send().await?;
        self.handle_empty_response(response).await
    }

    async fn put<B: Serialize>(&self, path: &str, body: &B) -> ConnectorResult<()> {
        debug!(url = %self.url(path), "directory PUT");
        let builder = self.http_client.put(self.url(path));
        let builder = self.auth.apply(builder).await?;
        let response = builder.json(body).send().await?;
        self.handle_empty_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ConnectorResult<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ConnectorError::Decode(format!("failed to parse response: {e}")))
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_empty_response(&self, response: reqwest::Response) -> ConnectorResult<()> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: reqwest::Response) -> ConnectorResult<T> {
        let status = response.status();

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(retry_after_secs = ?retry_after, "directory rate limited");
                Err(ConnectorError::RateLimited {
                    retry_after_secs: retry_after,
                })
            }
            StatusCode::UNAUTHORIZED => {
                // A cached token may have been revoked; drop it so the
                // next request fetches a fresh one.
                self.auth.invalidate_cache().await;
                Err(ConnectorError::AuthenticationFailed(format!(
                    "directory returned 401: {body}"
                )))
            }
            _ => {
                let detail = if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                };
                Err(ConnectorError::HttpStatus {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

/// Client for the authentication directory.
#[derive(Debug, Clone)]
pub struct AuthDirectoryClient {
    inner: HttpDirectory,
}

impl AuthDirectoryClient {
    /// Create a client from configuration.
    pub fn new(config: DirectoryConfig) -> ConnectorResult<Self> {
        Ok(Self {
            inner: HttpDirectory::from_config(config)?,
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRoleNameRequest<'a> {
    role_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminTypeRequest<'a> {
    admin_type: &'a [AdminType],
}

#[async_trait]
impl SourceDirectory for AuthDirectoryClient {
    async fn fetch_all_roles(&self) -> ConnectorResult<Vec<AuthRole>> {
        self.inner.get_with_retry("fetch_all_roles", "/roles").await
    }

    async fn fetch_all_users(&self) -> ConnectorResult<Vec<AuthUser>> {
        self.inner.get_with_retry("fetch_all_users", "/users").await
    }

    async fn create_role(&self, role: &AuthRole) -> ConnectorResult<()> {
        self.inner.post("/roles", role).await
    }

    async fn update_role(&self, code: &str, name: &str) -> ConnectorResult<()> {
        self.inner
            .put(
                &format!("/roles/{code}"),
                &UpdateRoleNameRequest { role_name: name },
            )
            .await
    }

    async fn update_role_admin_type(
        &self,
        code: &str,
        types: &[AdminType],
    ) -> ConnectorResult<()> {
        self.inner
            .put(
                &format!("/roles/{code}/admintype"),
                &UpdateAdminTypeRequest { admin_type: types },
            )
            .await
    }
}

/// Client for the prison-systems directory.
#[derive(Debug, Clone)]
pub struct NomisDirectoryClient {
    inner: HttpDirectory,
}

impl NomisDirectoryClient {
    /// Create a client from configuration.
    pub fn new(config: DirectoryConfig) -> ConnectorResult<Self> {
        Ok(Self {
            inner: HttpDirectory::from_config(config)?,
        })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NomisRoleRequest<'a> {
    code: &'a str,
    name: &'a str,
    admin_role_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NomisRoleUpdateRequest<'a> {
    name: &'a str,
    admin_role_only: bool,
}

#[async_trait]
impl TargetDirectory for NomisDirectoryClient {
    async fn fetch_all_roles(&self) -> ConnectorResult<Vec<NomisRole>> {
        self.inner.get_with_retry("fetch_all_roles", "/roles").await
    }

    async fn fetch_all_users(&self) -> ConnectorResult<Vec<NomisUser>> {
        self.inner.get_with_retry("fetch_all_users", "/users").await
    }

    async fn create_role(
        &self,
        code: &str,
        name: &str,
        admin_role_only: bool,
    ) -> ConnectorResult<()> {
        self.inner
            .post(
                "/roles",
                &NomisRoleRequest {
                    code,
                    name,
                    admin_role_only,
                },
            )
            .await
    }

    async fn update_role(
        &self,
        code: &str,
        name: &str,
        admin_role_only: bool,
    ) -> ConnectorResult<()> {
        self.inner
            .put(
                &format!("/roles/{code}"),
                &NomisRoleUpdateRequest {
                    name,
                    admin_role_only,
                },
            )
            .await
    }
}
