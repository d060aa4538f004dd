//! Shared adapter trait and data structures.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use toolset_primitives::{CanonicalTool, SchemaFeature};

/// Result alias used by adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The tool cannot be expressed in the target format.
    #[error("tool not representable: {reason}")]
    Unsupported {
        /// Why the tool was rejected.
        reason: String,
    },

    /// The conversion itself failed.
    #[error("conversion failed: {reason}")]
    Conversion {
        /// Additional context for the failure.
        reason: String,
    },

    /// The converted representation could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AdapterError {
    /// Convenience constructor for unsupported tools.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for conversion failures.
    #[must_use]
    pub fn conversion(reason: impl Into<String>) -> Self {
        Self::Conversion {
            reason: reason.into(),
        }
    }
}

/// Converts canonical tools into one protocol's representation.
///
/// Only the canonical-to-external direction is required.
pub trait Adapter: Send + Sync {
    /// Label of the target format (e.g. `openai`).
    fn name(&self) -> &str;

    /// Converts one tool.
    ///
    /// # Errors
    ///
    /// Returns an [`AdapterError`] when the tool cannot be converted.
    fn convert(&self, tool: &CanonicalTool) -> AdapterResult<Value>;

    /// Returns true when the target format can carry `feature`.
    fn supports_feature(&self, feature: SchemaFeature) -> bool;
}

/// Set of schema features a target format can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSupport {
    unsupported: BTreeSet<SchemaFeature>,
}

impl FeatureSupport {
    /// Supports every feature.
    #[must_use]
    pub fn all() -> Self {
        Self {
            unsupported: BTreeSet::new(),
        }
    }

    /// Supports every feature except the listed ones.
    #[must_use]
    pub fn except<I>(unsupported: I) -> Self
    where
        I: IntoIterator<Item = SchemaFeature>,
    {
        Self {
            unsupported: unsupported.into_iter().collect(),
        }
    }

    /// Supports only the listed features.
    #[must_use]
    pub fn only<I>(supported: I) -> Self
    where
        I: IntoIterator<Item = SchemaFeature>,
    {
        let supported: BTreeSet<_> = supported.into_iter().collect();
        Self::except(
            SchemaFeature::ALL
                .into_iter()
                .filter(|feature| !supported.contains(feature)),
        )
    }

    /// Returns true when `feature` is supported.
    #[must_use]
    pub fn supports(&self, feature: SchemaFeature) -> bool {
        !self.unsupported.contains(&feature)
    }

    /// Returns the unsupported features in order.
    pub fn unsupported(&self) -> impl Iterator<Item = SchemaFeature> + '_ {
        self.unsupported.iter().copied()
    }
}

impl Default for FeatureSupport {
    fn default() -> Self {
        Self::all()
    }
}

/// Advisory signal that a tool uses a feature the target format drops.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureLossWarning {
    /// Feature that will be lost.
    pub feature: SchemaFeature,
    /// Source format of the tool.
    pub from_format: String,
    /// Name of the destination adapter.
    pub to_adapter: String,
}

impl fmt::Display for FeatureLossWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not supported converting {} -> {}",
            self.feature, self.from_format, self.to_adapter
        )
    }
}
