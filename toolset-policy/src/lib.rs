//! Admission predicates for tool collections.
//!
//! [`Filter`] values narrow a collection during assembly; an [`AccessPolicy`]
//! is the single authorization gate applied after every filter. Both reject by
//! returning `false` and never fail.

#![warn(missing_docs, clippy::pedantic)]

pub mod filter;
pub mod policy;

pub use filter::{CustomFilter, Filter, ToolPredicate};
pub use policy::{AccessPolicy, Policy, PolicyFn};
