//! Core shared types for composable tool collections.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod schema;
mod tool;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Composite identifier of a tool within a toolset.
pub use ids::ToolId;
/// JSON-Schema-like contract trees and the features they can use.
pub use schema::{JsonSchema, SchemaFeature};
/// Protocol-independent tool descriptor.
pub use tool::{CanonicalTool, DEFAULT_SOURCE_FORMAT};
