//! Response shaping for busproxy.
//!
//! Takes the upstream search result (a GeoJSON-like feature collection in
//! LUREF metres) and produces the body served to clients:
//!
//! - [`translate`]: coordinates back to WGS84, verbose properties scrubbed,
//!   feature ids moved into the properties
//! - [`serialize`]: compact or debug-pretty UTF-8 JSON
//! - [`jsonp::wrap`]: optional JSONP envelope
//!
//! # Example
//!
//! ```
//! use busproxy_features::{translate, feature_count};
//! use busproxy_geo::Reprojector;
//! use serde_json::json;
//!
//! let upstream = json!({
//!     "type": "FeatureCollection",
//!     "features": [{
//!         "id": 110101,
//!         "geometry": {"type": "Point", "coordinates": [77000.0, 75000.0]},
//!         "properties": {"html": "<b>Gare</b>", "name": "Gare"}
//!     }]
//! });
//!
//! let out = translate(&upstream, Reprojector::global()?, false)?;
//! assert_eq!(feature_count(&out), Some(1));
//! assert_eq!(out["features"][0]["properties"]["mobiliteitid"], 110101);
//! assert!(out["features"][0]["properties"].get("html").is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod error;
pub mod jsonp;
mod translate;

pub use error::{Result, TranslateError};
pub use translate::{
    feature_count, is_feature_collection, serialize, translate, translate_body,
    COORDINATE_DECIMALS, FEATURE_COLLECTION, ID_PROPERTY, VERBOSE_PROPERTY,
};
