//! Configuration for the upstream client

use crate::error::{ApiError, ApiResult};
use busproxy_core::config::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Search endpoint, without query string
    pub search_url: String,
    /// Value sent as `Referer`; the upstream refuses requests without it
    pub referer: String,
    /// Value sent as `User-Agent`
    pub user_agent: String,
    /// Bound on one upstream call, connect through body
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&UpstreamConfig::default())
    }
}

impl From<&UpstreamConfig> for ClientConfig {
    fn from(upstream: &UpstreamConfig) -> Self {
        Self {
            search_url: upstream.search_url.clone(),
            referer: upstream.referer.clone(),
            user_agent: upstream.user_agent.clone(),
            timeout: Duration::from_secs(upstream.timeout_secs),
        }
    }
}

impl ClientConfig {
    /// Set the search endpoint
    #[must_use]
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.search_url.is_empty() {
            return Err(ApiError::config("search_url cannot be empty"));
        }

        if !self.search_url.starts_with("http://") && !self.search_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "search_url must start with http:// or https://: {}",
                self.search_url
            )));
        }

        if self.search_url.contains('?') {
            return Err(ApiError::InvalidUrl(format!(
                "search_url must not carry a query string: {}",
                self.search_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
