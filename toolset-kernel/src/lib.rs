//! Assembly and exposure of toolsets.
//!
//! [`Builder`] turns a source of tools into a filtered, policy-gated
//! [`Toolset`](toolset_collection::Toolset); [`Exposure`] converts a toolset
//! through an [`Adapter`](toolset_adapters::Adapter) and reports the schema
//! features the adapter would drop.

#![warn(missing_docs, clippy::pedantic)]

mod builder;
mod exposure;
mod features;

pub use builder::{BuildError, BuildResult, Builder};
pub use exposure::{ExportReport, Exposure, ExposureError, ExposureResult, feature_loss};
pub use features::{detect_features, detect_tool_features};
