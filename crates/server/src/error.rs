//! Request-level errors and their HTTP rendering

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use busproxy_api_client::ApiError;
use busproxy_core::ErrorCode;
use busproxy_features::TranslateError;
use busproxy_geo::GeoError;
use thiserror::Error;

/// Result type alias for request handling
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Anything that can end a request early.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Malformed caller parameter
    #[error(transparent)]
    Parameter(#[from] busproxy_core::Error),

    /// Box construction or reprojection failed
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// Upstream call failed
    #[error(transparent)]
    Upstream(#[from] ApiError),

    /// Upstream body could not be turned into a response
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

impl ProxyError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProxyError::Parameter(e) => e.code,
            ProxyError::Geo(e) => e.code(),
            ProxyError::Upstream(e) => e.code(),
            ProxyError::Translate(e) => e.code(),
        }
    }

    /// HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        if let ProxyError::Upstream(e) = self {
            if e.is_timeout() {
                return StatusCode::GATEWAY_TIMEOUT;
            }
        }
        status_for(self.code())
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidCallback => StatusCode::OK,
        ErrorCode::ValidationError | ErrorCode::InvalidParameter | ErrorCode::InvalidBoundingBox => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::GeodesyError | ErrorCode::ReprojectionError => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::UpstreamError | ErrorCode::UpstreamUnavailable | ErrorCode::UpstreamDataError => {
            StatusCode::BAD_GATEWAY
        }
        ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let param: ProxyError = busproxy_core::Error::invalid_parameter("limit", "nope").into();
        assert_eq!(param.status(), StatusCode::BAD_REQUEST);

        let bbox: ProxyError = GeoError::InvalidBoundingBox("x".into()).into();
        assert_eq!(bbox.status(), StatusCode::BAD_REQUEST);

        let radius: ProxyError = GeoError::InvalidRadius(-1.0).into();
        assert_eq!(radius.status(), StatusCode::BAD_REQUEST);

        let reproject: ProxyError = GeoError::Reprojection("far".into()).into();
        assert_eq!(reproject.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let down: ProxyError = ApiError::ApiResponse { status: 500 }.into();
        assert_eq!(down.status(), StatusCode::BAD_GATEWAY);

        let slow: ProxyError = ApiError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(slow.status(), StatusCode::GATEWAY_TIMEOUT);

        let data: ProxyError = TranslateError::MissingGeometry { index: 0 }.into();
        assert_eq!(data.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_errors_are_500() {
        let definition: ProxyError = GeoError::Definition {
            name: "EPSG:2169",
            reason: "bad".into(),
        }
        .into();
        assert_eq!(definition.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_is_plain_text() {
        let response = ProxyError::from(GeoError::InvalidRadius(0.0)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
