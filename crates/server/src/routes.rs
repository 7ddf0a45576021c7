//! HTTP surface

use crate::error::ProxyError;
use crate::proxy::{Area, Payload, Proxy};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use busproxy_api_client::FeatureSource;
use busproxy_core::params::RawParameters;
use std::sync::Arc;

/// Body of `GET /`.
pub const HELP_TEXT: &str = "Try /around/6.12/49.61 , perhaps with ?radius=100 . \
                             Or /bbox/6.11,49.59,6.15,49.60 . \
                             Data from Verkéiersverbond, Geoportail.";

/// Shared handler state.
pub type AppState<S> = Arc<Proxy<S>>;

/// Builds the router for `proxy`.
pub fn router<S: FeatureSource + 'static>(proxy: AppState<S>) -> Router {
    Router::new()
        .route("/", get(help))
        .route("/health", get(health))
        .route("/around/:lon/:lat", get(around::<S>))
        .route("/bbox/:wsen", get(bbox::<S>))
        .with_state(proxy)
}

impl IntoResponse for Payload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, self.content_type),
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            ],
            self.body,
        )
            .into_response()
    }
}

async fn help() -> Html<&'static str> {
    Html(HELP_TEXT)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn around<S: FeatureSource>(
    State(proxy): State<AppState<S>>,
    Path((lon, lat)): Path<(String, String)>,
    query: Result<Query<RawParameters>, QueryRejection>,
) -> Result<Payload, ProxyError> {
    let lon = parse_degrees("lon", &lon)?;
    let lat = parse_degrees("lat", &lat)?;
    let raw = query_parameters(query)?;
    proxy.handle(Area::Around { lon, lat }, raw).await
}

async fn bbox<S: FeatureSource>(
    State(proxy): State<AppState<S>>,
    Path(wsen): Path<String>,
    query: Result<Query<RawParameters>, QueryRejection>,
) -> Result<Payload, ProxyError> {
    let raw = query_parameters(query)?;
    proxy.handle(Area::Wsen(&wsen), raw).await
}

fn parse_degrees(name: &str, value: &str) -> Result<f64, ProxyError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(busproxy_core::Error::invalid_parameter(
            name,
            format!("'{value}' is not a number of degrees"),
        )
        .into()),
    }
}

fn query_parameters(
    query: Result<Query<RawParameters>, QueryRejection>,
) -> Result<RawParameters, ProxyError> {
    query.map(|Query(raw)| raw).map_err(|rejection| {
        busproxy_core::Error::invalid_parameter("query", rejection.body_text()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use busproxy_api_client::{ApiError, ApiResult, SearchQuery};
    use busproxy_core::config::DefaultsConfig;
    use busproxy_core::validation::INVALID_CALLBACK_MESSAGE;
    use busproxy_geo::Reprojector;
    use regex::bytes::Regex;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    struct FixedSource {
        body: String,
        calls: AtomicUsize,
    }

    impl FeatureSource for FixedSource {
        async fn search(&self, _query: &SearchQuery) -> ApiResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone().into_bytes())
        }
    }

    struct SlowSource;

    impl FeatureSource for SlowSource {
        async fn search(&self, _query: &SearchQuery) -> ApiResult<Vec<u8>> {
            Err(ApiError::Timeout(Duration::from_secs(10)))
        }
    }

    fn upstream_body() -> String {
        let p = Reprojector::global().unwrap().to_projected(6.13, 49.61).unwrap();
        format!(
            r#"{{"type":"FeatureCollection","features":[{{"id":7,"geometry":{{"coordinates":[{},{}]}},"properties":{{"html":"h","name":"Gare"}}}}]}}"#,
            p.x, p.y
        )
    }

    fn state() -> AppState<FixedSource> {
        let source = FixedSource {
            body: upstream_body(),
            calls: AtomicUsize::new(0),
        };
        Arc::new(Proxy::new(source, DefaultsConfig::default()).unwrap())
    }

    async fn get_raw(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_help_page() {
        let (status, headers, body) = get_raw(router(state()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("/around/"));
        assert!(text.contains("radius"));
        assert!(text.contains("Verkéiersverbond"));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get_raw(router(state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let doc: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["status"], "ok");
        assert!(doc["version"].is_string());
    }

    #[tokio::test]
    async fn test_around() {
        let (status, headers, body) = get_raw(router(state()), "/around/6.13/49.61").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let doc: Value = serde_json::from_slice(&body).unwrap();
        let feature = &doc["features"][0];
        assert_eq!(feature["properties"]["mobiliteitid"], 7);
        assert_eq!(feature["properties"]["name"], "Gare");
        assert!(feature["properties"].get("html").is_none());
        assert!(feature["geometry"]["coordinates"][0].is_string());
    }

    #[tokio::test]
    async fn test_around_with_jsonp() {
        let (status, headers, body) =
            get_raw(router(state()), "/around/6.13/49.61?callback=foo&radius=100").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(Regex::new(r"(?s)^foo\(.*\);$").unwrap().is_match(&body));
    }

    #[tokio::test]
    async fn test_invalid_callback_is_200_with_message() {
        let app_state = state();
        let (status, _, body) =
            get_raw(router(app_state.clone()), "/around/6.13/49.61?callback=a;b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, INVALID_CALLBACK_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_bbox() {
        let (status, _, body) = get_raw(router(state()), "/bbox/6.11,49.59,6.15,49.60").await;
        assert_eq!(status, StatusCode::OK);
        let doc: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_bad_requests() {
        for uri in [
            "/bbox/6.11,49.59,6.15",
            "/bbox/6.11,49.59,x,49.60",
            "/around/abc/49.61",
            "/around/6.13/49.61?limit=many",
            "/around/6.13/49.61?radius=0",
        ] {
            let (status, headers, _) = get_raw(router(state()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_out_of_area_is_unprocessable() {
        let (status, _, _) = get_raw(router(state()), "/around/-74.0/40.7").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_504() {
        let proxy = Arc::new(Proxy::new(SlowSource, DefaultsConfig::default()).unwrap());
        let (status, _, _) = get_raw(router(proxy), "/around/6.13/49.61").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_debug_flag() {
        let (_, _, body) = get_raw(router(state()), "/around/6.13/49.61?debug=1").await;
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("\n    "));
        assert!(text.contains("\"html\": \"h\""));
    }
}
