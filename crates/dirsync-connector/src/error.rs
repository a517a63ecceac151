//! Connector error types with transient/permanent classification.

use thiserror::Error;

/// Result alias for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Error that can occur while talking to a directory.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Failed to reach the directory at all.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Authentication against the directory failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The directory asked us to back off.
    #[error("rate limited by directory{}", retry_after_secs.map(|s| format!(", retry after {s}s")).unwrap_or_default())]
    RateLimited {
        /// Value of the `Retry-After` header, when present.
        retry_after_secs: Option<u64>,
    },

    /// The directory returned a non-success status.
    #[error("directory returned HTTP {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    /// The response body could not be decoded.
    #[error("failed to decode directory response: {0}")]
    Decode(String),

    /// The client configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Retries were exhausted without a successful response.
    #[error("{message}")]
    MaxRetriesExceeded { attempts: u32, message: String },
}

impl ConnectorError {
    /// Whether a retry might succeed: network-level failures, timeouts
    /// and rate limiting are transient; everything else is permanent.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::Timeout | Self::RateLimited { .. }
        )
    }

    /// Whether this is a server-side (5xx) HTTP error.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::HttpStatus { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ConnectionFailed {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::ConnectionFailed {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}
