//! Error types for the geo crate.

use busproxy_core::ErrorCode;
use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Coordinates outside the domain of the projection
    #[error("Reprojection failed: {0}")]
    Reprojection(String),

    /// Literal bounding box failed structural or ordering checks
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Radius is not a finite positive number
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),

    /// A projection definition could not be parsed
    #[error("Invalid projection definition for {name}: {reason}")]
    Definition {
        /// Which system failed
        name: &'static str,
        /// Parser message
        reason: String,
    },
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GeoError::Reprojection(_) => ErrorCode::ReprojectionError,
            GeoError::InvalidBoundingBox(_) => ErrorCode::InvalidBoundingBox,
            GeoError::InvalidRadius(_) => ErrorCode::InvalidParameter,
            GeoError::Definition { .. } => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeoError::Reprojection("nan".into()).code(), ErrorCode::ReprojectionError);
        assert_eq!(GeoError::InvalidBoundingBox("x".into()).code(), ErrorCode::InvalidBoundingBox);
        assert_eq!(GeoError::InvalidRadius(-1.0).code(), ErrorCode::InvalidParameter);
    }
}
