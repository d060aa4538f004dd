//! Thread-safe, identifier-keyed tool collection.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use toolset_primitives::{CanonicalTool, ToolId};
use tracing::trace;

/// Suffix appended to a toolset's name by [`Toolset::filter`].
pub const FILTERED_SUFFIX: &str = "-filtered";

/// Named collection of canonical tools keyed by [`ToolId`].
///
/// Tools are held as shared handles; the toolset never copies their contents.
/// Mutations take the write lock, every read takes the read lock, and
/// enumeration is sorted on each call so no ordering state survives a
/// mutation.
pub struct Toolset {
    name: String,
    tools: RwLock<HashMap<ToolId, Arc<CanonicalTool>>>,
}

impl fmt::Debug for Toolset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolset")
            .field("name", &self.name)
            .field("tools", &self.ids())
            .finish()
    }
}

impl Toolset {
    /// Creates an empty toolset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the toolset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a tool, replacing any tool with the same identifier.
    ///
    /// Empty tools (no name) are ignored.
    pub fn add(&self, tool: impl Into<Arc<CanonicalTool>>) {
        let tool = tool.into();
        if tool.is_empty() {
            trace!(toolset = %self.name, "ignoring empty tool");
            return;
        }
        let id = tool.id();
        trace!(toolset = %self.name, tool = %id, "tool added");
        self.write().insert(id, tool);
    }

    /// Inserts every tool under a single write lock. Later entries win over
    /// earlier ones sharing an identifier; empty tools are ignored.
    pub fn extend<I>(&self, tools: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<CanonicalTool>>,
    {
        let mut guard = self.write();
        for tool in tools {
            let tool = tool.into();
            if !tool.is_empty() {
                guard.insert(tool.id(), tool);
            }
        }
    }

    /// Returns the tool stored under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<CanonicalTool>> {
        self.read().get(id).cloned()
    }

    /// Returns true when a tool is stored under `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Removes the tool stored under `id`, returning whether one existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.write().remove(id).is_some();
        if removed {
            trace!(toolset = %self.name, tool = id, "tool removed");
        }
        removed
    }

    /// Returns the number of stored tools.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Returns true when no tools are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns the identifiers in ascending lexicographic order.
    #[must_use]
    pub fn ids(&self) -> Vec<ToolId> {
        let mut ids: Vec<ToolId> = self.read().keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Returns the tools in the same order as [`Toolset::ids`].
    ///
    /// The returned vector is a fresh copy of the handles.
    #[must_use]
    pub fn tools(&self) -> Vec<Arc<CanonicalTool>> {
        let guard = self.read();
        let mut entries: Vec<(&ToolId, &Arc<CanonicalTool>)> = guard.iter().collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        entries.into_iter().map(|(_, tool)| Arc::clone(tool)).collect()
    }

    /// Returns a new toolset holding the tools accepted by `predicate`.
    ///
    /// The receiver is left untouched. Matching handles are snapshotted under
    /// the read lock, which is released before the new toolset is populated.
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Toolset
    where
        P: Fn(&CanonicalTool) -> bool,
    {
        let matches: Vec<(ToolId, Arc<CanonicalTool>)> = {
            let guard = self.read();
            guard
                .iter()
                .filter(|(_, tool)| predicate(tool))
                .map(|(id, tool)| (id.clone(), Arc::clone(tool)))
                .collect()
        };

        Toolset {
            name: format!("{}{FILTERED_SUFFIX}", self.name),
            tools: RwLock::new(matches.into_iter().collect()),
        }
    }

    // A panic while a guard is held cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ToolId, Arc<CanonicalTool>>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ToolId, Arc<CanonicalTool>>> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }
}
