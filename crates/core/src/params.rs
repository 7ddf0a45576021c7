//! Typed request parameters
//!
//! Every inbound parameter is optional. [`RawParameters`] holds them exactly
//! as they arrived; [`RequestParameters::from_raw`] fills in defaults and
//! rejects malformed values before any other work happens.

use crate::config::DefaultsConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Query parameters as received, all untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RawParameters {
    pub layer: Option<String>,
    pub limit: Option<String>,
    pub debug: Option<String>,
    pub callback: Option<String>,
    pub radius: Option<String>,
}

/// Validated, defaulted parameters for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameters {
    /// Upstream layer name
    pub layer: String,
    /// `maxFeatures` forwarded upstream
    pub limit: u32,
    /// Keep verbose fields and pretty-print
    pub debug: bool,
    /// JSONP callback name; not yet validated
    pub callback: Option<String>,
    /// Half-width of the point+radius box, projected metres
    pub radius: f64,
}

impl RequestParameters {
    /// Parameters with every value defaulted.
    pub fn defaults(defaults: &DefaultsConfig) -> Self {
        Self {
            layer: defaults.layer.clone(),
            limit: defaults.limit,
            debug: false,
            callback: None,
            radius: defaults.radius,
        }
    }

    /// Type-check and default the raw parameters.
    pub fn from_raw(raw: RawParameters, defaults: &DefaultsConfig) -> Result<Self> {
        let mut params = Self::defaults(defaults);

        if let Some(layer) = non_empty(raw.layer) {
            params.layer = layer;
        }

        if let Some(limit) = non_empty(raw.limit) {
            params.limit = match limit.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(Error::invalid_parameter(
                        "limit",
                        format!("'{limit}' is not a positive integer"),
                    ));
                }
            };
        }

        if let Some(debug) = non_empty(raw.debug) {
            params.debug = parse_flag(&debug)
                .ok_or_else(|| Error::invalid_parameter("debug", format!("'{debug}' is not a boolean")))?;
        }

        params.callback = non_empty(raw.callback);

        if let Some(radius) = non_empty(raw.radius) {
            params.radius = parse_radius(&radius)?;
        }

        Ok(params)
    }
}

/// Parses a radius, which must be a finite positive number.
pub fn parse_radius(value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(r) if r.is_finite() && r > 0.0 => Ok(r),
        Ok(_) => Err(Error::invalid_parameter(
            "radius",
            format!("'{value}' must be a positive number"),
        )),
        Err(_) => Err(Error::invalid_parameter(
            "radius",
            format!("'{value}' is not a number"),
        )),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn raw() -> RawParameters {
        RawParameters::default()
    }

    #[test]
    fn test_all_defaults() {
        let params = RequestParameters::from_raw(raw(), &DefaultsConfig::default()).unwrap();
        assert_eq!(params.layer, "arrets_bus");
        assert_eq!(params.limit, 9999);
        assert!(!params.debug);
        assert!(params.callback.is_none());
        assert!((params.radius - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_supplied_values() {
        let params = RequestParameters::from_raw(
            RawParameters {
                layer: Some("arrets_tram".into()),
                limit: Some("25".into()),
                debug: Some("True".into()),
                callback: Some("cb".into()),
                radius: Some("250.5".into()),
            },
            &DefaultsConfig::default(),
        )
        .unwrap();

        assert_eq!(params.layer, "arrets_tram");
        assert_eq!(params.limit, 25);
        assert!(params.debug);
        assert_eq!(params.callback.as_deref(), Some("cb"));
        assert!((params.radius - 250.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let params = RequestParameters::from_raw(
            RawParameters {
                callback: Some(String::new()),
                layer: Some(String::new()),
                ..raw()
            },
            &DefaultsConfig::default(),
        )
        .unwrap();
        assert!(params.callback.is_none());
        assert_eq!(params.layer, "arrets_bus");
    }

    #[test]
    fn test_bad_limit() {
        for bad in ["ten", "1.5", "-3", "0"] {
            let err = RequestParameters::from_raw(
                RawParameters { limit: Some(bad.into()), ..raw() },
                &DefaultsConfig::default(),
            )
            .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidParameter, "limit={bad}");
        }
    }

    #[test]
    fn test_bad_debug() {
        let err = RequestParameters::from_raw(
            RawParameters { debug: Some("maybe".into()), ..raw() },
            &DefaultsConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_bad_radius() {
        for bad in ["0", "-10", "abc", "inf", "NaN"] {
            let err = parse_radius(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidParameter, "radius={bad}");
        }
        assert!((parse_radius("1e3").unwrap() - 1000.0).abs() < f64::EPSILON);
    }
}
