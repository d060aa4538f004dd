//! Configuration management for toolsets.
//!
//! A [`ToolsetConfig`] describes the filters and policy of one toolset in
//! JSON; a catalog file supplies the tools it is built from.

#![warn(missing_docs, clippy::pedantic)]

pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigResult, catalog_from_json_str, load_catalog};
pub use schema::{FilterConfig, PolicyConfig, ToolsetConfig};
