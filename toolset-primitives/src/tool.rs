//! Protocol-independent tool descriptors.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::ToolId;
use crate::schema::JsonSchema;

/// Source-format label reported for tools that do not declare one.
pub const DEFAULT_SOURCE_FORMAT: &str = "canonical";

/// Describes one capability independently of any wire format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTool {
    /// Grouping namespace; may be empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Tool name, unique within its namespace.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Optional category label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Authorization scopes a caller must hold to use the tool.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_scopes: Vec<String>,
    /// Contract for the tool's arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<JsonSchema>,
    /// Contract for the tool's result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<JsonSchema>,
    /// Label of the format the descriptor was converted from (e.g. `mcp`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_format: String,
}

impl CanonicalTool {
    /// Creates a descriptor with the given namespace and name.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decodes a descriptor from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTool`] if the text is not a valid descriptor.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::InvalidTool { source })
    }

    /// Returns the composite identifier.
    #[must_use]
    pub fn id(&self) -> ToolId {
        ToolId::new(&self.namespace, &self.name)
    }

    /// Returns true for a descriptor without a name. Such descriptors are
    /// never stored in a toolset and never pass a filter or policy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }

    /// Returns true when the tool carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns the declared source format, or [`DEFAULT_SOURCE_FORMAT`].
    #[must_use]
    pub fn source_format_or_default(&self) -> &str {
        if self.source_format.is_empty() {
            DEFAULT_SOURCE_FORMAT
        } else {
            &self.source_format
        }
    }

    /// Iterates the input and output schemas that are present.
    pub fn schemas(&self) -> impl Iterator<Item = &JsonSchema> {
        self.input_schema.iter().chain(self.output_schema.iter())
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the required scope list.
    #[must_use]
    pub fn with_required_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, schema: JsonSchema) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Sets the output schema.
    #[must_use]
    pub fn with_output_schema(mut self, schema: JsonSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Sets the source-format label.
    #[must_use]
    pub fn with_source_format(mut self, format: impl Into<String>) -> Self {
        self.source_format = format.into();
        self
    }
}
