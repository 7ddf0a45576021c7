//! Core utilities for the busproxy geospatial proxy
//!
//! This crate provides the request-independent pieces shared by every other
//! busproxy crate:
//!
//! - **Error handling**: structured errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with environment overrides and validation
//! - **Validation**: grammar checks for literal WSEN bounding boxes and JSONP callback names
//! - **Request parameters**: typed, defaulted extraction of the optional query parameters
//!
//! # Example
//!
//! ```rust
//! use busproxy_core::validation::{is_valid_callback, is_valid_wsen};
//!
//! assert!(is_valid_callback("ns.cb"));
//! assert!(!is_valid_callback("alert(1)"));
//! assert!(is_valid_wsen("6.11,49.59,6.15,49.60"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod params;
pub mod validation;

pub use error::{Error, ErrorCode, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::params::{RawParameters, RequestParameters};
    pub use crate::validation::{is_valid_callback, is_valid_wsen};
}
