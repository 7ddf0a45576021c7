//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed and overridden settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path (or a standard location), then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    pub fn load_with_env<F>(path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = match path {
            Some(p) if !Path::new(p).exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_string()),
            None => find_config_file(),
        };

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        apply_env_overrides(&mut schema, lookup)?;
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["busproxy.toml", ".busproxy.toml", ".config/busproxy.toml"];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_context(format!("reading config file {path}")))?;

    toml::from_str(&content).map_err(|e| Error::from(e).with_context(format!("config file {path}")))
}

fn apply_env_overrides<F>(schema: &mut ConfigSchema, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        schema.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::invalid_config_value("PORT", format!("'{port}' is not a port number")))?;
    }
    if let Some(url) = lookup("BUSPROXY_UPSTREAM_URL") {
        schema.upstream.search_url = url;
    }
    if let Some(referer) = lookup("BUSPROXY_REFERER") {
        schema.upstream.referer = referer;
    }
    if let Some(secs) = lookup("BUSPROXY_TIMEOUT_SECS") {
        schema.upstream.timeout_secs = secs.trim().parse().map_err(|_| {
            Error::invalid_config_value("BUSPROXY_TIMEOUT_SECS", format!("'{secs}' is not a number of seconds"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_file_no_env_is_defaults() {
        let config = Config::load_with_env(None, env(&[])).unwrap();
        assert!(config.path.is_none());
        assert_eq!(config.schema, ConfigSchema::default());
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap().to_string();
        let err = Config::load_with_env(Some(&path), env(&[])).unwrap_err();
        assert!(matches!(err.code, ErrorCode::IoError | ErrorCode::PermissionDenied));
    }

    #[test]
    fn test_port_env_override() {
        let config = Config::load_with_env(None, env(&[("PORT", "8123")])).unwrap();
        assert_eq!(config.schema.server.port, 8123);
    }

    #[test]
    fn test_bad_port_env_is_config_error() {
        let err = Config::load_with_env(None, env(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load_with_env(Some("/nonexistent/busproxy.toml"), env(&[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[upstream]\nreferer = \"http://example.lu\"\ntimeout_secs = 3\n\n[defaults]\nlayer = \"arrets_tram\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config =
            Config::load_with_env(Some(&path), env(&[("BUSPROXY_TIMEOUT_SECS", "7")])).unwrap();

        assert_eq!(config.path.as_deref(), Some(path.as_str()));
        assert_eq!(config.schema.upstream.referer, "http://example.lu");
        assert_eq!(config.schema.upstream.timeout_secs, 7);
        assert_eq!(config.schema.defaults.layer, "arrets_tram");
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let err =
            Config::load_with_env(None, env(&[("BUSPROXY_UPSTREAM_URL", "not-a-url")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }
}
