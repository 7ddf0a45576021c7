//! Query orchestration
//!
//! One request runs parse, callback check, box construction, a single
//! upstream fetch, translation and optional JSONP wrapping, in that order.
//! Any failure short-circuits; nothing partial is ever returned.

use crate::error::{ProxyError, Result};
use busproxy_api_client::{FeatureSource, SearchQuery};
use busproxy_core::config::DefaultsConfig;
use busproxy_core::params::{RawParameters, RequestParameters};
use busproxy_core::validation::{is_valid_callback, INVALID_CALLBACK_MESSAGE};
use busproxy_features::{feature_count, jsonp, serialize, translate, TranslateError};
use busproxy_geo::{bbox, BoundingBox, Reprojector};
use busproxy_telemetry::Timer;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Content type of every successful proxy response, JSONP included.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Body and metadata for a 200 response.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    /// Bytes to send
    pub body: Vec<u8>,
    /// `Content-Type` header value
    pub content_type: &'static str,
    /// Features in the body, when it is a collection
    pub features: Option<usize>,
}

impl Payload {
    fn callback_rejected() -> Self {
        Self {
            body: INVALID_CALLBACK_MESSAGE.as_bytes().to_vec(),
            content_type: JSON_CONTENT_TYPE,
            features: None,
        }
    }
}

/// Where the search box comes from.
#[derive(Debug, Clone, Copy)]
pub enum Area<'a> {
    /// WGS84 point, radius from the parameters
    Around {
        /// Longitude, degrees
        lon: f64,
        /// Latitude, degrees
        lat: f64,
    },
    /// Literal `W,S,E,N` string in WGS84
    Wsen(&'a str),
}

impl Area<'_> {
    fn route(&self) -> &'static str {
        match self {
            Area::Around { .. } => "around",
            Area::Wsen(_) => "bbox",
        }
    }
}

/// Request pipeline over a [`FeatureSource`].
#[derive(Debug)]
pub struct Proxy<S> {
    source: S,
    reprojector: &'static Reprojector,
    defaults: DefaultsConfig,
}

impl<S: FeatureSource> Proxy<S> {
    /// Create a pipeline using the shared reprojector.
    pub fn new(source: S, defaults: DefaultsConfig) -> Result<Self> {
        Ok(Self {
            source,
            reprojector: Reprojector::global()?,
            defaults,
        })
    }

    /// Per-parameter defaults in effect.
    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    /// Run one request end to end.
    pub async fn handle(&self, area: Area<'_>, raw: RawParameters) -> Result<Payload> {
        let timer = Timer::start("request");
        let route = area.route();

        let result = self.run(area, raw).await;
        match &result {
            Ok(payload) => info!(
                route,
                features = payload.features,
                bytes = payload.body.len(),
                elapsed_ms = timer.elapsed_ms(),
                "Request served"
            ),
            Err(e) if e.code().is_client_error() => info!(
                route,
                code = %e.code(),
                error = %e,
                elapsed_ms = timer.elapsed_ms(),
                "Request rejected"
            ),
            Err(e) => warn!(
                route,
                code = %e.code(),
                error = %e,
                elapsed_ms = timer.elapsed_ms(),
                "Request failed"
            ),
        }
        timer.stop();
        result
    }

    async fn run(&self, area: Area<'_>, raw: RawParameters) -> Result<Payload> {
        let params = RequestParameters::from_raw(raw, &self.defaults)?;

        // Callback goes first: a rejected callback never reaches bbox
        // validation or the upstream.
        if let Some(callback) = params.callback.as_deref() {
            if !is_valid_callback(callback) {
                debug!(callback, "Rejecting JSONP callback");
                return Ok(Payload::callback_rejected());
            }
        }

        let area = self.search_area(area, &params)?;
        let query = SearchQuery::new(params.layer.clone(), area, params.limit)?;
        let body = self.source.search(&query).await?;

        let document: Value = serde_json::from_slice(&body).map_err(TranslateError::InvalidJson)?;
        let translated = translate(&document, self.reprojector, params.debug)?;
        let features = feature_count(&translated);
        let json = serialize(&translated, params.debug)?;

        let body = match params.callback.as_deref() {
            Some(callback) => jsonp::wrap(callback, &json)?,
            None => json,
        };

        Ok(Payload {
            body,
            content_type: JSON_CONTENT_TYPE,
            features,
        })
    }

    fn search_area(&self, area: Area<'_>, params: &RequestParameters) -> Result<BoundingBox> {
        let built = match area {
            Area::Around { lon, lat } => bbox::around(self.reprojector, lon, lat, params.radius),
            Area::Wsen(wsen) => bbox::from_wsen(self.reprojector, wsen),
        };
        built.map_err(ProxyError::from)
    }
}
