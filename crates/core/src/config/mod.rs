//! Configuration loading and schema definitions
//!
//! A TOML file provides the base settings; a handful of environment
//! variables (`PORT` first among them) override it.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
