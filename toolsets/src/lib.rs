//! Composable tool collections.
//!
//! Depend on this crate via `cargo add toolsets`. It bundles the workspace
//! crates behind feature flags: primitives, collections, predicates, and the
//! adapter contract are always present; assembly and export (`kernel`),
//! configuration (`config`), and subscriber setup (`telemetry`) can be turned
//! off.

#![warn(missing_docs, clippy::pedantic)]

/// Canonical tool descriptors and schema trees.
pub use toolset_primitives as primitives;

/// Concurrent toolsets and registries.
pub use toolset_collection as collection;

/// Filter predicates and access policies.
pub use toolset_policy as policy;

/// Protocol adapter contract.
pub use toolset_adapters as adapters;

/// Builder and exposure pipeline (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use toolset_kernel as kernel;

/// Configuration and catalog loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use toolset_config as config;

/// Tracing subscriber setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use toolset_telemetry as telemetry;

pub use toolset_collection::{Registry, StaticRegistry, Toolset};
pub use toolset_primitives::{CanonicalTool, JsonSchema, SchemaFeature, ToolId};

#[cfg(feature = "kernel")]
pub use toolset_kernel::{Builder, ExportReport, Exposure};
