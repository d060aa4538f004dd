//! JSON-Schema-like contract trees attached to tool inputs and outputs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Schema keyword that a protocol adapter may or may not be able to carry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum SchemaFeature {
    /// `$ref` pointer to another schema.
    #[serde(rename = "$ref")]
    Ref,
    /// `$defs` table of shared definitions.
    #[serde(rename = "$defs")]
    Defs,
    /// `anyOf` combinator.
    #[serde(rename = "anyOf")]
    AnyOf,
    /// `oneOf` combinator.
    #[serde(rename = "oneOf")]
    OneOf,
    /// `allOf` combinator.
    #[serde(rename = "allOf")]
    AllOf,
    /// `not` combinator.
    #[serde(rename = "not")]
    Not,
    /// `pattern` regular expression constraint.
    #[serde(rename = "pattern")]
    Pattern,
    /// `format` annotation (e.g. `email`, `uri`).
    #[serde(rename = "format")]
    Format,
    /// `additionalProperties` constraint.
    #[serde(rename = "additionalProperties")]
    AdditionalProperties,
    /// `minimum` numeric bound.
    #[serde(rename = "minimum")]
    Minimum,
    /// `maximum` numeric bound.
    #[serde(rename = "maximum")]
    Maximum,
    /// `minLength` string bound.
    #[serde(rename = "minLength")]
    MinLength,
    /// `maxLength` string bound.
    #[serde(rename = "maxLength")]
    MaxLength,
    /// `enum` value list.
    #[serde(rename = "enum")]
    Enum,
    /// `const` value.
    #[serde(rename = "const")]
    Const,
    /// `default` value.
    #[serde(rename = "default")]
    Default,
}

impl SchemaFeature {
    /// Every detectable feature, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Ref,
        Self::Defs,
        Self::AnyOf,
        Self::OneOf,
        Self::AllOf,
        Self::Not,
        Self::Pattern,
        Self::Format,
        Self::AdditionalProperties,
        Self::Minimum,
        Self::Maximum,
        Self::MinLength,
        Self::MaxLength,
        Self::Enum,
        Self::Const,
        Self::Default,
    ];

    /// Returns the JSON Schema keyword that carries the feature.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Ref => "$ref",
            Self::Defs => "$defs",
            Self::AnyOf => "anyOf",
            Self::OneOf => "oneOf",
            Self::AllOf => "allOf",
            Self::Not => "not",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::AdditionalProperties => "additionalProperties",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Enum => "enum",
            Self::Const => "const",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for SchemaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SchemaFeature {
    type Err = Error;

    /// Parses a JSON Schema keyword; the leading `$` of `$ref` and `$defs` is
    /// optional.
    fn from_str(keyword: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|feature| {
                let known = feature.keyword();
                known == keyword || known.strip_prefix('$') == Some(keyword)
            })
            .ok_or_else(|| Error::UnknownFeature {
                keyword: keyword.to_owned(),
            })
    }
}

/// Recursive JSON Schema subset describing a tool's input or output.
///
/// Subtrees are owned, so a tree is always finite. `$ref` is kept as an opaque
/// pointer string and never resolved.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    /// JSON type name (`object`, `string`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object property schemas keyed by property name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchema>,
    /// Names of required object properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    /// Shared named definitions.
    #[serde(rename = "$defs", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defs: BTreeMap<String, JsonSchema>,
    /// Pointer to another schema.
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Branches of which at least one must hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<JsonSchema>,
    /// Branches of which exactly one must hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchema>,
    /// Branches that must all hold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<JsonSchema>,
    /// Branch that must not hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<JsonSchema>>,
    /// Regular expression constraint for strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Format annotation for strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Boolean or schema constraining undeclared properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,
    /// Inclusive lower numeric bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper numeric bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum string length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    /// Single allowed value.
    ///
    /// A JSON `null` decodes as `None`, so `"const": null` is not reported
    /// as the `const` feature even though `Some(Value::Null)` built in memory
    /// is.
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Value>,
    /// Default value.
    ///
    /// As with [`JsonSchema::const_value`], a decoded `"default": null` is
    /// `None` and does not count as the `default` feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl JsonSchema {
    /// Creates a schema node of the given JSON type.
    #[must_use]
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }

    /// Creates an `object` schema node.
    #[must_use]
    pub fn object() -> Self {
        Self::of_type("object")
    }

    /// Creates a `string` schema node.
    #[must_use]
    pub fn string() -> Self {
        Self::of_type("string")
    }

    /// Creates an `array` schema node with the supplied item schema.
    #[must_use]
    pub fn array(items: JsonSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type("array")
        }
    }

    /// Creates a node that only points at another schema.
    #[must_use]
    pub fn reference(pointer: impl Into<String>) -> Self {
        Self {
            reference: Some(pointer.into()),
            ..Self::default()
        }
    }

    /// Decodes a schema from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] if the text is not a valid schema.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::InvalidSchema { source })
    }

    /// Adds an object property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, schema: JsonSchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Marks a property as required.
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Adds a shared definition.
    #[must_use]
    pub fn with_def(mut self, name: impl Into<String>, schema: JsonSchema) -> Self {
        self.defs.insert(name.into(), schema);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the string pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the string format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the numeric bounds; `None` leaves a bound unset.
    #[must_use]
    pub fn with_bounds(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Sets the allowed values.
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = values;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Adds `anyOf` branches.
    #[must_use]
    pub fn with_any_of(mut self, branches: Vec<JsonSchema>) -> Self {
        self.any_of.extend(branches);
        self
    }

    /// Adds `oneOf` branches.
    #[must_use]
    pub fn with_one_of(mut self, branches: Vec<JsonSchema>) -> Self {
        self.one_of.extend(branches);
        self
    }

    /// Adds `allOf` branches.
    #[must_use]
    pub fn with_all_of(mut self, branches: Vec<JsonSchema>) -> Self {
        self.all_of.extend(branches);
        self
    }

    /// Sets the `not` branch.
    #[must_use]
    pub fn with_not(mut self, branch: JsonSchema) -> Self {
        self.not = Some(Box::new(branch));
        self
    }

    /// Returns true when this node itself uses `feature`; subtrees are not
    /// consulted.
    #[must_use]
    pub fn uses(&self, feature: SchemaFeature) -> bool {
        match feature {
            SchemaFeature::Ref => non_empty(self.reference.as_deref()),
            SchemaFeature::Defs => !self.defs.is_empty(),
            SchemaFeature::AnyOf => !self.any_of.is_empty(),
            SchemaFeature::OneOf => !self.one_of.is_empty(),
            SchemaFeature::AllOf => !self.all_of.is_empty(),
            SchemaFeature::Not => self.not.is_some(),
            SchemaFeature::Pattern => non_empty(self.pattern.as_deref()),
            SchemaFeature::Format => non_empty(self.format.as_deref()),
            SchemaFeature::AdditionalProperties => self.additional_properties.is_some(),
            SchemaFeature::Minimum => self.minimum.is_some(),
            SchemaFeature::Maximum => self.maximum.is_some(),
            SchemaFeature::MinLength => self.min_length.is_some(),
            SchemaFeature::MaxLength => self.max_length.is_some(),
            SchemaFeature::Enum => !self.enum_values.is_empty(),
            SchemaFeature::Const => self.const_value.is_some(),
            SchemaFeature::Default => self.default.is_some(),
        }
    }

    /// Iterates the features used by this node itself.
    pub fn used_features(&self) -> impl Iterator<Item = SchemaFeature> + '_ {
        SchemaFeature::ALL
            .into_iter()
            .filter(move |feature| self.uses(*feature))
    }

    /// Iterates the direct subtrees: property values, array items, shared
    /// definitions, and every combinator branch.
    pub fn children(&self) -> impl Iterator<Item = &JsonSchema> {
        self.properties
            .values()
            .chain(self.items.as_deref())
            .chain(self.defs.values())
            .chain(self.any_of.iter())
            .chain(self.one_of.iter())
            .chain(self.all_of.iter())
            .chain(self.not.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_json_schema_keywords() {
        let schema = JsonSchema::from_json(
            r##"{
                "type": "object",
                "properties": {
                    "user": { "$ref": "#/$defs/User" },
                    "email": { "type": "string", "format": "email", "maxLength": 64 }
                },
                "$defs": { "User": { "type": "object", "additionalProperties": false } },
                "anyOf": [{ "required": ["user"] }],
                "not": { "const": 3 }
            }"##,
        )
        .expect("decode");

        assert_eq!(schema.schema_type.as_deref(), Some("object"));
        assert_eq!(
            schema.properties["user"].reference.as_deref(),
            Some("#/$defs/User")
        );
        assert_eq!(schema.properties["email"].max_length, Some(64));
        assert_eq!(
            schema.defs["User"].additional_properties,
            Some(json!(false))
        );
        assert_eq!(schema.any_of.len(), 1);
        assert!(schema.not.is_some());
    }

    #[test]
    fn used_features_reports_only_local_keywords() {
        let schema = JsonSchema::object()
            .with_property("name", JsonSchema::string().with_pattern("^[a-z]+$"))
            .with_default(json!({}))
            .with_bounds(Some(1.0), None);

        let features: Vec<_> = schema.used_features().collect();
        assert_eq!(features, [SchemaFeature::Minimum, SchemaFeature::Default]);
    }

    #[test]
    fn empty_strings_do_not_count_as_features() {
        let schema = JsonSchema {
            pattern: Some(String::new()),
            format: Some(String::new()),
            reference: Some(String::new()),
            ..JsonSchema::default()
        };
        assert_eq!(schema.used_features().count(), 0);
    }

    #[test]
    fn children_cover_every_branch() {
        let schema = JsonSchema::object()
            .with_property("a", JsonSchema::string())
            .with_def("b", JsonSchema::string())
            .with_any_of(vec![JsonSchema::string()])
            .with_one_of(vec![JsonSchema::string()])
            .with_all_of(vec![JsonSchema::string()])
            .with_not(JsonSchema::string());
        let array = JsonSchema::array(schema.clone());

        assert_eq!(schema.children().count(), 6);
        assert_eq!(array.children().count(), 1);
    }

    #[test]
    fn feature_serializes_as_keyword() {
        let encoded = serde_json::to_string(&SchemaFeature::AdditionalProperties).expect("encode");
        assert_eq!(encoded, "\"additionalProperties\"");
        assert_eq!(SchemaFeature::Ref.to_string(), "$ref");
    }

    #[test]
    fn decoded_null_default_is_not_a_feature() {
        let built = JsonSchema::string().with_default(Value::Null);
        assert_eq!(built.used_features().collect::<Vec<_>>(), [SchemaFeature::Default]);

        let encoded = serde_json::to_string(&built).expect("encode");
        assert!(encoded.contains(r#""default":null"#), "{encoded}");
        let decoded = JsonSchema::from_json(&encoded).expect("decode");
        assert_eq!(decoded.default, None);
        assert_eq!(decoded.used_features().count(), 0);
    }

    #[test]
    fn feature_parses_from_keyword() {
        assert_eq!("pattern".parse::<SchemaFeature>().ok(), Some(SchemaFeature::Pattern));
        assert_eq!("defs".parse::<SchemaFeature>().ok(), Some(SchemaFeature::Defs));
        assert_eq!("$ref".parse::<SchemaFeature>().ok(), Some(SchemaFeature::Ref));
        assert!(matches!(
            "regex".parse::<SchemaFeature>(),
            Err(Error::UnknownFeature { keyword }) if keyword == "regex"
        ));
    }
}
