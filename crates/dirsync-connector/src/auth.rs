//! Directory authentication — Bearer token and OAuth2 client credentials.

use crate::error::{ConnectorError, ConnectorResult};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Credentials for a directory endpoint.
///
/// The [`Debug`] impl redacts secrets to prevent accidental credential
/// exposure in log output.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum DirectoryCredentials {
    /// Static bearer token.
    #[serde(rename = "bearer")]
    Bearer { token: String },

    /// OAuth2 client credentials grant.
    #[serde(rename = "clientCredentials")]
    ClientCredentials {
        client_id: String,
        client_secret: String,
        token_endpoint: String,
        #[serde(default)]
        scopes: Vec<String>,
    },
}

impl std::fmt::Debug for DirectoryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"[REDACTED]")
                .finish(),
            Self::ClientCredentials {
                client_id,
                token_endpoint,
                scopes,
                ..
            } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"[REDACTED]")
                .field("token_endpoint", token_endpoint)
                .field("scopes", scopes)
                .finish(),
        }
    }
}

/// Token response from the OAuth2 token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Cached access token with expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<std::time::Instant>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => std::time::Instant::now() >= exp,
            None => false,
        }
    }
}

/// Authentication handler shared by the directory clients.
///
/// Supports a static bearer token and OAuth2 client credentials with
/// token caching; cached tokens are shared across clones.
#[derive(Debug, Clone)]
pub struct DirectoryAuth {
    credentials: DirectoryCredentials,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token endpoint requests.
    http_client: reqwest::Client,
}

impl DirectoryAuth {
    /// Create a new auth handler.
    #[must_use]
    pub fn new(credentials: DirectoryCredentials, http_client: reqwest::Client) -> Self {
        Self {
            credentials,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Get the bearer token to use for requests.
    ///
    /// For static bearer auth, returns the token as-is. For client
    /// credentials, returns the cached token or fetches a fresh one.
    pub async fn bearer_token(&self) -> ConnectorResult<String> {
        match &self.credentials {
            DirectoryCredentials::Bearer { token } => Ok(token.clone()),
            DirectoryCredentials::ClientCredentials {
                client_id,
                client_secret,
                token_endpoint,
                scopes,
            } => {
                {
                    let cache = self.cached_token.read().await;
                    if let Some(cached) = cache.as_ref() {
                        if !cached.is_expired() {
                            return Ok(cached.access_token.clone());
                        }
                    }
                }

                debug!(endpoint = %token_endpoint, "fetching OAuth2 access token");
                let mut form = vec![("grant_type", "client_credentials")];
                let scope_str = scopes.join(" ");
                if !scopes.is_empty() {
                    form.push(("scope", &scope_str));
                }

                let response = self
                    .http_client
                    .post(token_endpoint)
                    .basic_auth(client_id, Some(client_secret))
                    .form(&form)
                    .send()
                    .await
                    .map_err(|e| {
                        ConnectorError::AuthenticationFailed(format!("token request failed: {e}"))
                    })?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<no body>".to_string());
                    return Err(ConnectorError::AuthenticationFailed(format!(
                        "token endpoint returned {status}: {body}"
                    )));
                }

                let token_response: TokenResponse = response.json().await.map_err(|e| {
                    ConnectorError::AuthenticationFailed(format!(
                        "failed to parse token response: {e}"
                    ))
                })?;

                let expires_at = token_response.expires_in.map(|secs| {
                    // Expire 30 seconds early to avoid using stale tokens.
                    std::time::Instant::now()
                        + std::time::Duration::from_secs(secs.saturating_sub(30))
                });

                let access_token = token_response.access_token.clone();

                {
                    let mut cache = self.cached_token.write().await;
                    *cache = Some(CachedToken {
                        access_token: token_response.access_token,
                        expires_at,
                    });
                }

                Ok(access_token)
            }
        }
    }

    /// Apply authentication to a request builder.
    pub async fn apply(&self, builder: RequestBuilder) -> ConnectorResult<RequestBuilder> {
        let token = self.bearer_token().await?;
        Ok(builder.bearer_auth(token))
    }

    /// Invalidate the cached token (e.g. on a 401 response).
    pub async fn invalidate_cache(&self) {
        let mut cache = self.cached_token.write().await;
        *cache = None;
    }
}
