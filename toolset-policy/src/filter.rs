//! Reusable filter predicates.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use toolset_primitives::CanonicalTool;

/// Pure admit/reject test over a tool.
///
/// Implementations must not mutate shared state and must reject empty tools.
pub trait ToolPredicate: Send + Sync {
    /// Returns true when the tool is admitted.
    fn matches(&self, tool: &CanonicalTool) -> bool;
}

impl<F> ToolPredicate for F
where
    F: Fn(&CanonicalTool) -> bool + Send + Sync,
{
    fn matches(&self, tool: &CanonicalTool) -> bool {
        !tool.is_empty() && (self)(tool)
    }
}

/// Caller-supplied predicate carried with a label for diagnostics.
#[derive(Clone)]
pub struct CustomFilter {
    label: String,
    predicate: Arc<dyn ToolPredicate>,
}

impl CustomFilter {
    /// Wraps a predicate under the supplied label.
    pub fn new<P>(label: impl Into<String>, predicate: P) -> Self
    where
        P: ToolPredicate + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Returns the diagnostic label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for CustomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFilter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Filter predicate over namespaces, tags, categories, or identifiers.
///
/// | Variant | Accepts a tool iff | Empty set |
/// |---|---|---|
/// | `Namespaces` | namespace is listed | accepts nothing |
/// | `TagsAny` | at least one tag is listed | accepts nothing |
/// | `TagsAll` | every listed tag is present | accepts everything |
/// | `TagsNone` | no listed tag is present | accepts everything |
/// | `Categories` | category is listed | accepts nothing |
/// | `AllowIds` | identifier is listed | accepts nothing |
/// | `DenyIds` | identifier is not listed | accepts everything |
///
/// Every variant rejects empty tools.
#[derive(Clone, Debug)]
pub enum Filter {
    /// Match any of the listed namespaces.
    Namespaces(BTreeSet<String>),
    /// Match tools carrying at least one listed tag.
    TagsAny(BTreeSet<String>),
    /// Match tools carrying every listed tag.
    TagsAll(BTreeSet<String>),
    /// Match tools carrying none of the listed tags.
    TagsNone(BTreeSet<String>),
    /// Match any of the listed categories.
    Categories(BTreeSet<String>),
    /// Match only the listed identifiers.
    AllowIds(BTreeSet<String>),
    /// Match everything except the listed identifiers.
    DenyIds(BTreeSet<String>),
    /// Caller-supplied predicate.
    Custom(CustomFilter),
}

impl Filter {
    /// Matches tools in any of the namespaces.
    #[must_use]
    pub fn namespaces<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Namespaces(collect(namespaces))
    }

    /// Matches tools with any of the tags.
    #[must_use]
    pub fn tags_any<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TagsAny(collect(tags))
    }

    /// Matches tools with all of the tags.
    #[must_use]
    pub fn tags_all<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TagsAll(collect(tags))
    }

    /// Matches tools with none of the tags.
    #[must_use]
    pub fn tags_none<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TagsNone(collect(tags))
    }

    /// Matches tools in any of the categories.
    #[must_use]
    pub fn categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Categories(collect(categories))
    }

    /// Matches only the listed tool identifiers.
    #[must_use]
    pub fn allow_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AllowIds(collect(ids))
    }

    /// Excludes the listed tool identifiers.
    #[must_use]
    pub fn deny_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::DenyIds(collect(ids))
    }

    /// Wraps a caller-supplied predicate.
    pub fn custom<P>(label: impl Into<String>, predicate: P) -> Self
    where
        P: ToolPredicate + 'static,
    {
        Self::Custom(CustomFilter::new(label, predicate))
    }
}

impl ToolPredicate for Filter {
    fn matches(&self, tool: &CanonicalTool) -> bool {
        if tool.is_empty() {
            return false;
        }
        match self {
            Self::Namespaces(set) => set.contains(&tool.namespace),
            Self::TagsAny(set) => tool.tags.iter().any(|tag| set.contains(tag)),
            Self::TagsAll(set) => set.iter().all(|tag| tool.has_tag(tag)),
            Self::TagsNone(set) => !tool.tags.iter().any(|tag| set.contains(tag)),
            Self::Categories(set) => set.contains(&tool.category),
            Self::AllowIds(set) => set.contains(tool.id().as_str()),
            Self::DenyIds(set) => !set.contains(tool.id().as_str()),
            Self::Custom(custom) => custom.predicate.matches(tool),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, set) = match self {
            Self::Namespaces(set) => ("namespaces", set),
            Self::TagsAny(set) => ("tags_any", set),
            Self::TagsAll(set) => ("tags_all", set),
            Self::TagsNone(set) => ("tags_none", set),
            Self::Categories(set) => ("categories", set),
            Self::AllowIds(set) => ("allow_ids", set),
            Self::DenyIds(set) => ("deny_ids", set),
            Self::Custom(custom) => return write!(f, "custom({})", custom.label),
        };
        let joined: Vec<&str> = set.iter().map(String::as_str).collect();
        write!(f, "{kind}[{}]", joined.join(","))
    }
}

fn collect<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
