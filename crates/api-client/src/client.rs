//! Upstream feature-search client

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use busproxy_geo::{BoundingBox, CoordinateSystem};
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// One upstream search: a layer, a projected box and a result cap.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Upstream layer name
    pub layer: String,
    /// Search area, in LUREF
    pub bbox: BoundingBox,
    /// `maxFeatures`
    pub limit: u32,
}

impl SearchQuery {
    /// Create a query; the box must already be projected.
    pub fn new(layer: impl Into<String>, bbox: BoundingBox, limit: u32) -> ApiResult<Self> {
        if bbox.system() != CoordinateSystem::Luref {
            return Err(ApiError::config(format!(
                "search box must be in {}, got {}",
                CoordinateSystem::Luref,
                bbox.system()
            )));
        }
        Ok(Self {
            layer: layer.into(),
            bbox,
            limit,
        })
    }

    /// Full request URL against `search_url`.
    ///
    /// `{search_url}?layers={layer}&bbox={minx,miny,maxx,maxy}&maxFeatures={limit}`
    #[must_use]
    pub fn url(&self, search_url: &str) -> String {
        format!(
            "{}?layers={}&bbox={}&maxFeatures={}",
            search_url,
            urlencoding::encode(&self.layer),
            self.bbox,
            self.limit
        )
    }
}

/// Something that answers search queries with a raw JSON body.
///
/// The proxy is generic over this so request handling can be exercised
/// without a network.
pub trait FeatureSource: Send + Sync {
    /// Run one query and return the response body untouched.
    fn search(&self, query: &SearchQuery) -> impl Future<Output = ApiResult<Vec<u8>>> + Send;
}

/// Client for the geoportail search endpoint.
///
/// One call per query: no retries, no caching. The underlying connection
/// pool is shared by clones.
#[derive(Clone)]
pub struct SearchClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SearchClient {
    /// Create a new client with default configuration
    pub fn new() -> ApiResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer)
                .map_err(|_| ApiError::config(format!("invalid referer: {:?}", config.referer)))?,
        );
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|_| {
                ApiError::config(format!("invalid user agent: {:?}", config.user_agent))
            })?,
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue `query` and return the body of a 2xx response.
    #[instrument(skip(self, query), fields(layer = %query.layer, request_id))]
    pub async fn fetch(&self, query: &SearchQuery) -> ApiResult<Vec<u8>> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let url = query.url(&self.config.search_url);
        debug!(request_id = %request_id, url = %url, "Querying upstream");

        let start = Instant::now();
        let response = self
            .inner
            .get(&url)
            .header(X_REQUEST_ID, &request_id)
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis(),
                "Upstream returned an error status"
            );
            return Err(ApiError::ApiResponse {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(e, self.config.timeout))?;

        debug!(
            request_id = %request_id,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Upstream answered"
        );

        Ok(body.to_vec())
    }
}

impl FeatureSource for SearchClient {
    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<u8>> {
        self.fetch(query).await
    }
}
