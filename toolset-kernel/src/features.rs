//! Schema feature detection.

use std::collections::BTreeSet;

use toolset_primitives::{CanonicalTool, JsonSchema, SchemaFeature};

/// Returns the distinct features used anywhere in `schema`.
#[must_use]
pub fn detect_features(schema: &JsonSchema) -> BTreeSet<SchemaFeature> {
    let mut found = BTreeSet::new();
    collect(std::iter::once(schema), &mut found);
    found
}

/// Returns the distinct features used anywhere in the tool's input and output
/// schemas combined.
#[must_use]
pub fn detect_tool_features(tool: &CanonicalTool) -> BTreeSet<SchemaFeature> {
    let mut found = BTreeSet::new();
    collect(tool.schemas(), &mut found);
    found
}

// Depth-first, pre-order walk over properties, items, $defs and every
// combinator branch. `$ref` targets are never followed, so the walk is bounded
// by the size of the owned tree.
fn collect<'a, I>(roots: I, found: &mut BTreeSet<SchemaFeature>)
where
    I: IntoIterator<Item = &'a JsonSchema>,
{
    let mut stack: Vec<&JsonSchema> = roots.into_iter().collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        found.extend(node.used_features());
        if found.len() == SchemaFeature::ALL.len() {
            return;
        }
        let pending = stack.len();
        stack.extend(node.children());
        stack[pending..].reverse();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_object_uses_nothing() {
        let schema = JsonSchema::object().with_property("name", JsonSchema::string());
        assert!(detect_features(&schema).is_empty());
    }

    #[test]
    fn finds_features_at_every_depth() {
        let schema = JsonSchema::object()
            .with_property(
                "list",
                JsonSchema::array(JsonSchema::string().with_pattern("^[a-z]+$")),
            )
            .with_def("Inner", JsonSchema::string().with_format("email"))
            .with_any_of(vec![JsonSchema::object().with_not(
                JsonSchema::object().with_all_of(vec![JsonSchema {
                    max_length: Some(4),
                    ..JsonSchema::default()
                }]),
            )]);

        let found = detect_features(&schema);
        let expected: BTreeSet<_> = [
            SchemaFeature::Pattern,
            SchemaFeature::Format,
            SchemaFeature::Defs,
            SchemaFeature::AnyOf,
            SchemaFeature::Not,
            SchemaFeature::AllOf,
            SchemaFeature::MaxLength,
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn repeated_feature_is_recorded_once() {
        let schema = JsonSchema::object()
            .with_property("a", JsonSchema::string().with_pattern("a"))
            .with_property("b", JsonSchema::string().with_pattern("b"))
            .with_one_of(vec![
                JsonSchema::string().with_pattern("c"),
                JsonSchema::string().with_pattern("d"),
            ]);

        let found = detect_features(&schema);
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            [SchemaFeature::OneOf, SchemaFeature::Pattern]
        );
    }

    #[test]
    fn tool_features_merge_input_and_output() {
        let tool = CanonicalTool::new("ns", "t")
            .with_input_schema(
                JsonSchema::object().with_property("id", JsonSchema::reference("#/$defs/Id")),
            )
            .with_output_schema(
                JsonSchema::object()
                    .with_property("status", JsonSchema::string().with_enum(vec![json!("ok")]))
                    .with_property("count", JsonSchema::reference("#/$defs/Count")),
            );

        let found: Vec<_> = detect_tool_features(&tool).into_iter().collect();
        assert_eq!(found, [SchemaFeature::Ref, SchemaFeature::Enum]);
    }

    #[test]
    fn tool_without_schemas_uses_nothing() {
        assert!(detect_tool_features(&CanonicalTool::new("ns", "bare")).is_empty());
    }

    #[test]
    fn self_referencing_definition_terminates() {
        let schema = JsonSchema::object()
            .with_def(
                "Node",
                JsonSchema::object()
                    .with_property("next", JsonSchema::reference("#/$defs/Node"))
                    .with_default(json!(null)),
            )
            .with_property("head", JsonSchema::reference("#/$defs/Node"));

        let found: Vec<_> = detect_features(&schema).into_iter().collect();
        assert_eq!(
            found,
            [SchemaFeature::Ref, SchemaFeature::Defs, SchemaFeature::Default]
        );
    }

    #[test]
    fn deeply_nested_tree_does_not_overflow() {
        let mut schema = JsonSchema::string().with_format("uri");
        for _ in 0..10_000 {
            schema = JsonSchema::array(schema);
        }
        assert_eq!(
            detect_features(&schema).into_iter().collect::<Vec<_>>(),
            [SchemaFeature::Format]
        );
        // Unwind by hand; the derived drop would recurse once per level.
        let mut node = Some(Box::new(schema));
        while let Some(mut current) = node {
            node = current.items.take();
        }
    }
}
