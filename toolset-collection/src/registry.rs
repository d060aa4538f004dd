//! Registry capability supplying tool snapshots.

use std::sync::Arc;

use toolset_primitives::CanonicalTool;

use crate::toolset::Toolset;

/// Source of tools for building toolsets.
///
/// `tools` returns the current snapshot. Callers read it once per build and
/// never hold on to the registry's internal storage.
pub trait Registry: Send + Sync {
    /// Returns the current snapshot of tools.
    fn tools(&self) -> Vec<Arc<CanonicalTool>>;
}

impl Registry for Toolset {
    fn tools(&self) -> Vec<Arc<CanonicalTool>> {
        Toolset::tools(self)
    }
}

impl<R> Registry for Arc<R>
where
    R: Registry + ?Sized,
{
    fn tools(&self) -> Vec<Arc<CanonicalTool>> {
        (**self).tools()
    }
}

/// Registry backed by a fixed catalog of tools.
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    tools: Vec<Arc<CanonicalTool>>,
}

impl StaticRegistry {
    /// Creates a registry serving the supplied tools in the given order.
    #[must_use]
    pub fn new<I>(tools: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<CanonicalTool>>,
    {
        Self {
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the number of catalogued tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Registry for StaticRegistry {
    fn tools(&self) -> Vec<Arc<CanonicalTool>> {
        self.tools.clone()
    }
}

impl FromIterator<CanonicalTool> for StaticRegistry {
    fn from_iter<T: IntoIterator<Item = CanonicalTool>>(iter: T) -> Self {
        Self::new(iter)
    }
}
