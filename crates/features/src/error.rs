//! Error types for feature translation.

use busproxy_core::ErrorCode;
use busproxy_geo::GeoError;
use thiserror::Error;

/// Result type alias for translation operations.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors raised while turning an upstream document into a response body.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Upstream body is not JSON
    #[error("Upstream returned invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A feature has no usable `geometry.coordinates` pair
    #[error("Feature {index} has no coordinate pair")]
    MissingGeometry {
        /// Position in `features`
        index: usize,
    },

    /// A feature is structurally unusable
    #[error("Feature {index} is malformed: {reason}")]
    InvalidFeature {
        /// Position in `features`
        index: usize,
        /// What was wrong
        reason: String,
    },

    /// A feature's coordinates could not be reprojected
    #[error(transparent)]
    Reprojection(#[from] GeoError),

    /// JSONP callback name failed validation
    #[error("Invalid JSONP callback: {0:?}")]
    InvalidCallback(String),

    /// Output could not be written
    #[error("Serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl TranslateError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TranslateError::InvalidJson(_)
            | TranslateError::MissingGeometry { .. }
            | TranslateError::InvalidFeature { .. } => ErrorCode::UpstreamDataError,
            TranslateError::Reprojection(e) => e.code(),
            TranslateError::InvalidCallback(_) => ErrorCode::InvalidCallback,
            TranslateError::Serialize(_) => ErrorCode::Internal,
        }
    }
}
