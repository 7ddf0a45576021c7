//! Configuration schema definitions
//!
//! Every section and field carries a default so an empty file (or no file)
//! yields a working configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Listening socket
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream feature-search endpoint
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Per-request parameter defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl ConfigSchema {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = &self.upstream.search_url;
        if url.is_empty() {
            return Err(Error::invalid_config_value("upstream.search_url", "cannot be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::invalid_config_value(
                "upstream.search_url",
                "must start with http:// or https://",
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::invalid_config_value("upstream.timeout_secs", "cannot be zero"));
        }
        if self.defaults.limit == 0 {
            return Err(Error::invalid_config_value("defaults.limit", "cannot be zero"));
        }
        if !(self.defaults.radius.is_finite() && self.defaults.radius > 0.0) {
            return Err(Error::invalid_config_value("defaults.radius", "must be a positive number"));
        }
        if self.defaults.layer.trim().is_empty() {
            return Err(Error::invalid_config_value("defaults.layer", "cannot be empty"));
        }
        Ok(())
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Upstream feature-search configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpstreamConfig {
    /// Search endpoint, without query string
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Referer header the upstream requires
    #[serde(default = "default_referer")]
    pub referer: String,

    /// User-Agent identifying this proxy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on a single upstream call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_search_url() -> String {
    "http://map.geoportail.lu/bodfeature/search".to_string()
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_user_agent() -> String {
    concat!("busproxy/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Defaults applied when the caller omits a parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Upstream layer name
    #[serde(default = "default_layer")]
    pub layer: String,

    /// Maximum number of features requested upstream
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Half-width of the point+radius box, in projected metres
    #[serde(default = "default_radius")]
    pub radius: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            layer: default_layer(),
            limit: default_limit(),
            radius: default_radius(),
        }
    }
}

fn default_layer() -> String {
    "arrets_bus".to_string()
}

fn default_limit() -> u32 {
    9999
}

fn default_radius() -> f64 {
    1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.server.port, 5000);
        assert_eq!(schema.upstream.referer, "http://localhost");
        assert_eq!(schema.upstream.timeout_secs, 10);
        assert_eq!(schema.defaults.layer, "arrets_bus");
        assert_eq!(schema.defaults.limit, 9999);
        assert!((schema.defaults.radius - 1000.0).abs() < f64::EPSILON);
        assert!(schema.upstream.user_agent.starts_with("busproxy/"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [server]
            port = 8080

            [defaults]
            limit = 50
            "#,
        )
        .unwrap();

        assert_eq!(schema.server.port, 8080);
        assert_eq!(schema.server.host, "0.0.0.0");
        assert_eq!(schema.defaults.limit, 50);
        assert_eq!(schema.defaults.layer, "arrets_bus");
        assert_eq!(schema.upstream, UpstreamConfig::default());
    }

    #[test]
    fn test_validate_default_is_ok() {
        assert!(ConfigSchema::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut schema = ConfigSchema::default();
        schema.upstream.search_url = "ftp://example.com".to_string();
        assert!(schema.validate().is_err());

        let mut schema = ConfigSchema::default();
        schema.upstream.timeout_secs = 0;
        assert!(schema.validate().is_err());

        let mut schema = ConfigSchema::default();
        schema.defaults.radius = -5.0;
        assert!(schema.validate().is_err());

        let mut schema = ConfigSchema::default();
        schema.defaults.limit = 0;
        assert!(schema.validate().is_err());
    }
}
