//! Tool collections and the registry capability that feeds them.
//!
//! A [`Toolset`] owns shared handles to canonical tools keyed by identifier and
//! always enumerates them in lexicographic identifier order. A [`Registry`] is
//! anything that can hand out a snapshot of tools.

#![warn(missing_docs, clippy::pedantic)]

pub mod registry;
pub mod toolset;

pub use registry::{Registry, StaticRegistry};
pub use toolset::{FILTERED_SUFFIX, Toolset};
