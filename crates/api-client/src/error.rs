//! Error types for the upstream client

use busproxy_core::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for upstream operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Upstream client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection or protocol failure
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No complete response within the configured bound
    #[error("Upstream did not answer within {0:?}")]
    Timeout(Duration),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {status}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Maps a transport error, singling out timeouts.
    pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Request(error)
        }
    }

    /// Returns the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Request(_) | Self::Timeout(_) | Self::ApiResponse { .. } => {
                ErrorCode::UpstreamUnavailable
            }
            Self::Config(_) | Self::InvalidUrl(_) => ErrorCode::InvalidConfigValue,
        }
    }

    /// Whether the call was abandoned because it took too long
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
