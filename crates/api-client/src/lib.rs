//! Client for the upstream feature-search endpoint
//!
//! Builds the search URL from a layer, a LUREF bounding box and a result cap,
//! sends it with the `Referer` the upstream insists on, and hands back the raw
//! body. Translation of that body is someone else's job.
//!
//! # Example
//!
//! ```rust,no_run
//! use busproxy_api_client::{SearchClient, SearchQuery};
//! use busproxy_geo::{bbox, Reprojector};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchClient::new()?;
//!     let area = bbox::around(Reprojector::global()?, 6.13, 49.61, 500.0)?;
//!     let body = client.fetch(&SearchQuery::new("arrets_bus", area, 50)?).await?;
//!     println!("{} bytes", body.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{FeatureSource, SearchClient, SearchQuery};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
