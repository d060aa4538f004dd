//! Access policies applied after every filter.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use toolset_primitives::CanonicalTool;

/// Final admission gate for a tool.
///
/// Contract:
/// - safe for unlimited concurrent use after construction;
/// - never mutates the inspected tool;
/// - returns a stable result for a given tool;
/// - encodes denial as `false` and returns `false` for an empty tool.
pub trait AccessPolicy: Send + Sync {
    /// Returns true when the tool is allowed.
    fn allow(&self, tool: &CanonicalTool) -> bool;
}

impl<P> AccessPolicy for Arc<P>
where
    P: AccessPolicy + ?Sized,
{
    fn allow(&self, tool: &CanonicalTool) -> bool {
        (**self).allow(tool)
    }
}

/// Built-in access policies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    /// Allow every non-empty tool.
    AllowAll,
    /// Deny every tool.
    DenyAll,
    /// Allow only tools in the listed namespaces.
    AllowNamespaces {
        /// Permitted namespaces.
        namespaces: BTreeSet<String>,
    },
    /// Deny tools carrying any of the listed tags.
    DenyTags {
        /// Forbidden tags.
        tags: BTreeSet<String>,
    },
    /// Allow tools whose every required scope is granted. Tools that require
    /// no scopes are always allowed.
    AllowScopes {
        /// Granted scopes.
        scopes: BTreeSet<String>,
    },
}

impl Policy {
    /// Policy allowing only the listed namespaces.
    #[must_use]
    pub fn allow_namespaces<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllowNamespaces {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy denying tools with any of the tags.
    #[must_use]
    pub fn deny_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::DenyTags {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy allowing tools whose required scopes are all granted.
    #[must_use]
    pub fn allow_scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllowScopes {
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a concise label for logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AllowAll => "allow_all",
            Self::DenyAll => "deny_all",
            Self::AllowNamespaces { .. } => "allow_namespaces",
            Self::DenyTags { .. } => "deny_tags",
            Self::AllowScopes { .. } => "allow_scopes",
        }
    }
}

impl AccessPolicy for Policy {
    fn allow(&self, tool: &CanonicalTool) -> bool {
        if tool.is_empty() {
            return false;
        }
        match self {
            Self::AllowAll => true,
            Self::DenyAll => false,
            Self::AllowNamespaces { namespaces } => namespaces.contains(&tool.namespace),
            Self::DenyTags { tags } => !tool.tags.iter().any(|tag| tags.contains(tag)),
            Self::AllowScopes { scopes } => tool
                .required_scopes
                .iter()
                .all(|scope| scopes.contains(scope)),
        }
    }
}

/// Adapts a closure into an [`AccessPolicy`]. Empty tools are denied before
/// the closure runs.
#[derive(Clone)]
pub struct PolicyFn<F>(F);

impl<F> PolicyFn<F>
where
    F: Fn(&CanonicalTool) -> bool + Send + Sync,
{
    /// Wraps the supplied closure.
    pub fn new(decide: F) -> Self {
        Self(decide)
    }
}

impl<F> AccessPolicy for PolicyFn<F>
where
    F: Fn(&CanonicalTool) -> bool + Send + Sync,
{
    fn allow(&self, tool: &CanonicalTool) -> bool {
        !tool.is_empty() && (self.0)(tool)
    }
}

impl<F> fmt::Debug for PolicyFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PolicyFn")
    }
}
