//! Fluent assembly pipeline: source, filters, policy, toolset.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use toolset_collection::{Registry, Toolset};
use toolset_policy::{AccessPolicy, Filter, ToolPredicate};
use toolset_primitives::CanonicalTool;
use tracing::debug;

/// Result alias for build operations.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors surfaced while building a toolset.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Neither an explicit tool list nor a registry was configured.
    #[error("no source configured: call from_tools or from_registry")]
    NoSource,
}

/// Builds a [`Toolset`] from one source through ordered filters and an
/// optional access policy.
///
/// Filters are AND-composed, so their order never changes the result. The
/// policy, if any, only sees tools that passed every filter.
///
/// When both a registry and an explicit list are configured, the registry is
/// used and the list is ignored, whatever the call order.
#[derive(Clone)]
pub struct Builder {
    name: String,
    tools: Option<Vec<Arc<CanonicalTool>>>,
    registry: Option<Arc<dyn Registry>>,
    filters: Vec<Filter>,
    policy: Option<Arc<dyn AccessPolicy>>,
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match (&self.registry, &self.tools) {
            (Some(_), _) => "registry".to_owned(),
            (None, Some(tools)) => format!("tools({})", tools.len()),
            (None, None) => "none".to_owned(),
        };
        f.debug_struct("Builder")
            .field("name", &self.name)
            .field("source", &source)
            .field("filters", &self.filters)
            .field("policy", &self.policy.is_some())
            .finish()
    }
}

impl Builder {
    /// Creates a builder producing a toolset with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tools: None,
            registry: None,
            filters: Vec::new(),
            policy: None,
        }
    }

    /// Returns the name given to built toolsets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured filters in application order.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns true when an access policy is attached.
    #[must_use]
    pub fn has_policy(&self) -> bool {
        self.policy.is_some()
    }

    /// Uses an explicit list of tools as the source. An empty list is a valid
    /// source and yields an empty toolset. A configured registry takes
    /// precedence over the list.
    #[must_use]
    pub fn from_tools<I>(mut self, tools: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<CanonicalTool>>,
    {
        self.tools = Some(tools.into_iter().map(Into::into).collect());
        self
    }

    /// Uses a registry as the source, replacing any earlier registry. Its
    /// snapshot is read once per build.
    #[must_use]
    pub fn from_registry<R>(mut self, registry: R) -> Self
    where
        R: Registry + 'static,
    {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Keeps tools in a single namespace.
    #[must_use]
    pub fn with_namespace(self, namespace: impl Into<String>) -> Self {
        self.with_filter(Filter::namespaces([namespace.into()]))
    }

    /// Keeps tools in any of the namespaces.
    #[must_use]
    pub fn with_namespaces<I, S>(self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::namespaces(namespaces))
    }

    /// Keeps tools carrying all of the tags.
    #[must_use]
    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::tags_all(tags))
    }

    /// Keeps tools carrying any of the tags.
    #[must_use]
    pub fn with_any_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::tags_any(tags))
    }

    /// Drops tools carrying any of the tags.
    #[must_use]
    pub fn without_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::tags_none(tags))
    }

    /// Keeps tools in any of the categories.
    #[must_use]
    pub fn with_categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::categories(categories))
    }

    /// Keeps only the listed tool identifiers.
    #[must_use]
    pub fn with_tools<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::allow_ids(ids))
    }

    /// Drops the listed tool identifiers.
    #[must_use]
    pub fn exclude_tools<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_filter(Filter::deny_ids(ids))
    }

    /// Appends a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends a caller-supplied predicate.
    #[must_use]
    pub fn with_predicate<P>(self, label: impl Into<String>, predicate: P) -> Self
    where
        P: ToolPredicate + 'static,
    {
        self.with_filter(Filter::custom(label, predicate))
    }

    /// Attaches the access policy, replacing any earlier one.
    #[must_use]
    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: AccessPolicy + 'static,
    {
        self.policy = Some(Arc::new(policy));
        self
    }

    /// Builds the toolset.
    ///
    /// The source is never mutated; the registry, if any, is read exactly
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoSource`] when no source was configured.
    pub fn build(&self) -> BuildResult<Toolset> {
        let mut tools = match (&self.registry, &self.tools) {
            (Some(registry), _) => registry.tools(),
            (None, Some(tools)) => tools.clone(),
            (None, None) => return Err(BuildError::NoSource),
        };
        let sourced = tools.len();

        for filter in &self.filters {
            tools.retain(|tool| filter.matches(tool));
            debug!(toolset = %self.name, %filter, remaining = tools.len(), "filter applied");
        }

        if let Some(policy) = &self.policy {
            tools.retain(|tool| {
                let allowed = policy.allow(tool);
                if !allowed {
                    debug!(toolset = %self.name, tool = %tool.id(), "policy denied tool");
                }
                allowed
            });
        }

        let toolset = Toolset::new(self.name.clone());
        toolset.extend(tools);
        debug!(
            toolset = %self.name,
            sourced,
            retained = toolset.count(),
            "toolset built"
        );
        Ok(toolset)
    }
}
