//! Protocol adapters used to expose toolsets.
//!
//! Concrete converters live with the protocols they target; this crate only
//! defines the shared contract in [`traits`].

#![warn(missing_docs, clippy::pedantic)]

pub mod traits;

pub use traits::{Adapter, AdapterError, AdapterResult, FeatureLossWarning, FeatureSupport};
