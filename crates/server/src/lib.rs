//! Query orchestration and HTTP surface for busproxy.
//!
//! [`Proxy`] runs the per-request pipeline against any
//! [`FeatureSource`](busproxy_api_client::FeatureSource); [`router`] exposes
//! it over HTTP:
//!
//! | Route | Mode |
//! |-------|------|
//! | `GET /` | help text |
//! | `GET /health` | liveness |
//! | `GET /around/{lon}/{lat}` | point plus `radius` |
//! | `GET /bbox/{w,s,e,n}` | literal WGS84 box |
//!
//! Both query routes take the optional `layer`, `limit`, `debug`, `callback`
//! (and, for `around`, `radius`) query parameters.

#![warn(missing_docs)]

mod error;
mod proxy;
mod routes;

pub use error::{ProxyError, Result};
pub use proxy::{Area, Payload, Proxy, JSON_CONTENT_TYPE};
pub use routes::{router, AppState, HELP_TEXT};
