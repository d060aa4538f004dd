//! Strongly typed configuration schemas.

use serde::{Deserialize, Serialize};
use toolset_kernel::Builder;
use toolset_policy::Policy;

/// Declarative access policy; the same tagged form the policy crate decodes.
pub type PolicyConfig = Policy;

/// Declarative description of one toolset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsetConfig {
    /// Name given to the built toolset.
    pub name: String,
    /// Filters applied in declaration order.
    #[serde(default)]
    pub filters: FilterConfig,
    /// Optional policy applied after every filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyConfig>,
}

/// Filter section of a [`ToolsetConfig`].
///
/// An absent field adds no filter. A present but empty list is applied as
/// written, so `namespaces: []` keeps nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Keep tools in any of these namespaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Vec<String>>,
    /// Keep tools carrying every one of these tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Keep tools carrying at least one of these tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_tags: Option<Vec<String>>,
    /// Drop tools carrying any of these tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<Vec<String>>,
    /// Keep tools in any of these categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Keep only these tool identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    /// Drop these tool identifiers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl FilterConfig {
    /// Returns true when no filter is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Appends the configured filters to `builder`.
    #[must_use]
    pub fn apply(&self, mut builder: Builder) -> Builder {
        if let Some(namespaces) = &self.namespaces {
            builder = builder.with_namespaces(namespaces.iter().cloned());
        }
        if let Some(tags) = &self.tags {
            builder = builder.with_tags(tags.iter().cloned());
        }
        if let Some(tags) = &self.any_tags {
            builder = builder.with_any_tags(tags.iter().cloned());
        }
        if let Some(tags) = &self.exclude_tags {
            builder = builder.without_tags(tags.iter().cloned());
        }
        if let Some(categories) = &self.categories {
            builder = builder.with_categories(categories.iter().cloned());
        }
        if let Some(ids) = &self.include {
            builder = builder.with_tools(ids.iter().cloned());
        }
        if let Some(ids) = &self.exclude {
            builder = builder.exclude_tools(ids.iter().cloned());
        }
        builder
    }
}

impl ToolsetConfig {
    /// Creates a configuration with no filters and no policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns a builder carrying the configured name, filters, and policy.
    ///
    /// The builder has no source yet; attach one with `from_tools` or
    /// `from_registry` before building.
    #[must_use]
    pub fn builder(&self) -> Builder {
        let builder = self.filters.apply(Builder::new(self.name.clone()));
        match &self.policy {
            Some(policy) => builder.with_policy(policy.clone()),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use toolset_primitives::CanonicalTool;

    use super::*;

    fn catalog() -> Vec<CanonicalTool> {
        vec![
            CanonicalTool::new("github", "create_issue").with_tags(["write"]),
            CanonicalTool::new("github", "list_issues").with_tags(["read"]),
            CanonicalTool::new("slack", "post").with_tags(["write"]),
        ]
    }

    #[test]
    fn empty_filter_config_adds_nothing() {
        let config = ToolsetConfig::new("all");
        assert!(config.filters.is_empty());
        assert!(config.builder().filters().is_empty());
        assert!(!config.builder().has_policy());
    }

    #[test]
    fn builder_applies_filters_and_policy() {
        let config = ToolsetConfig {
            name: "writers".into(),
            filters: FilterConfig {
                tags: Some(vec!["write".into()]),
                exclude: Some(vec!["slack:post".into()]),
                ..FilterConfig::default()
            },
            policy: Some(Policy::allow_namespaces(["github"])),
        };

        let builder = config.builder();
        assert_eq!(builder.name(), "writers");
        assert_eq!(builder.filters().len(), 2);
        assert!(builder.has_policy());

        let toolset = builder.from_tools(catalog()).build().expect("build");
        assert_eq!(toolset.name(), "writers");
        assert_eq!(toolset.ids(), ["github:create_issue"]);
    }

    #[test]
    fn present_but_empty_list_is_applied() {
        let config = ToolsetConfig {
            name: "none".into(),
            filters: FilterConfig {
                namespaces: Some(Vec::new()),
                ..FilterConfig::default()
            },
            policy: None,
        };
        let toolset = config.builder().from_tools(catalog()).build().expect("build");
        assert!(toolset.is_empty());
    }
}
