//! Directory client configuration.

use crate::auth::DirectoryCredentials;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    30
}

fn default_tls_verify() -> bool {
    true
}

/// Configuration for one directory endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the directory API, without a trailing slash.
    pub base_url: String,
    /// Credentials used when calling the directory.
    pub credentials: DirectoryCredentials,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Whether to verify TLS certificates.
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,
    /// Retry policy for transient read failures.
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl DirectoryConfig {
    /// Create a configuration with a static bearer token and defaults.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: DirectoryCredentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            request_timeout_secs: default_timeout_secs(),
            tls_verify: default_tls_verify(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Disable TLS verification (test environments only).
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_omitted() {
        let config: DirectoryConfig = serde_json::from_str(
            r#"{"base_url":"https://auth.example","credentials":{"type":"bearer","token":"t"}}"#,
        )
        .unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.tls_verify);
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = DirectoryConfig::new(
            "https://auth.example",
            DirectoryCredentials::Bearer {
                token: "t".to_string(),
            },
        )
        .with_timeout_secs(5)
        .with_tls_verify(false)
        .with_retry(RetryPolicy::disabled());

        assert_eq!(config.request_timeout_secs, 5);
        assert!(!config.tls_verify);
        assert_eq!(config.retry.max_retries, 0);
    }
}
