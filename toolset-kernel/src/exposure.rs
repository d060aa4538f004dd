//! Export of toolsets through protocol adapters.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use toolset_adapters::{Adapter, AdapterError, FeatureLossWarning};
use toolset_collection::Toolset;
use toolset_primitives::{CanonicalTool, ToolId};
use tracing::{debug, warn};

use crate::features::detect_tool_features;

/// Result alias for strict exports.
pub type ExposureResult<T> = Result<T, ExposureError>;

/// Errors surfaced while exporting a toolset.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// No adapter was configured.
    #[error("adapter is not configured")]
    MissingAdapter,

    /// A single tool failed to convert.
    #[error("failed to convert tool {tool_id}: {source}")]
    Conversion {
        /// Identifier of the failing tool.
        tool_id: ToolId,
        /// Error reported by the adapter.
        #[source]
        source: AdapterError,
    },
}

/// Outcome of a best-effort export.
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Converted representations in toolset order, failed tools omitted.
    pub converted: Vec<Value>,
    /// Feature-loss warnings, one per feature per tool.
    pub warnings: Vec<FeatureLossWarning>,
    /// Conversion errors, one per failed tool.
    pub errors: Vec<ExposureError>,
}

impl ExportReport {
    /// Returns true when nothing was lost and nothing failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Exports the members of a toolset through an adapter.
pub struct Exposure<'a> {
    toolset: &'a Toolset,
    adapter: Option<Arc<dyn Adapter>>,
}

impl fmt::Debug for Exposure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exposure")
            .field("toolset", &self.toolset.name())
            .field("adapter", &self.adapter.as_ref().map(|a| a.name().to_owned()))
            .finish()
    }
}

impl<'a> Exposure<'a> {
    /// Creates an exposure for the toolset and adapter.
    #[must_use]
    pub fn new(toolset: &'a Toolset, adapter: Arc<dyn Adapter>) -> Self {
        Self {
            toolset,
            adapter: Some(adapter),
        }
    }

    /// Creates an exposure with no adapter; every export reports
    /// [`ExposureError::MissingAdapter`].
    #[must_use]
    pub fn without_adapter(toolset: &'a Toolset) -> Self {
        Self {
            toolset,
            adapter: None,
        }
    }

    /// Converts every tool in toolset order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ExposureError::MissingAdapter`] when no adapter is configured,
    /// or the first [`ExposureError::Conversion`].
    pub fn export(&self) -> ExposureResult<Vec<Value>> {
        let adapter = self.adapter.as_deref().ok_or(ExposureError::MissingAdapter)?;
        let tools = self.toolset.tools();
        let mut converted = Vec::with_capacity(tools.len());
        for tool in &tools {
            let value = convert(adapter, tool).inspect_err(|err| {
                warn!(toolset = %self.toolset.name(), adapter = adapter.name(), %err, "export aborted");
            })?;
            converted.push(value);
        }
        Ok(converted)
    }

    /// Converts every tool it can, collecting feature-loss warnings and
    /// per-tool conversion errors instead of stopping.
    ///
    /// Features are checked before conversion, so a tool whose conversion
    /// fails still contributes its warnings alongside its error.
    ///
    /// Without an adapter the report holds no output, no warnings, and a
    /// single [`ExposureError::MissingAdapter`].
    #[must_use]
    pub fn export_with_warnings(&self) -> ExportReport {
        let Some(adapter) = self.adapter.as_deref() else {
            return ExportReport {
                errors: vec![ExposureError::MissingAdapter],
                ..ExportReport::default()
            };
        };

        let tools = self.toolset.tools();
        let mut report = ExportReport {
            converted: Vec::with_capacity(tools.len()),
            ..ExportReport::default()
        };

        for tool in &tools {
            report.warnings.extend(feature_loss(tool, adapter));
            match convert(adapter, tool) {
                Ok(value) => report.converted.push(value),
                Err(err) => {
                    warn!(toolset = %self.toolset.name(), adapter = adapter.name(), %err, "tool skipped");
                    report.errors.push(err);
                }
            }
        }

        debug!(
            toolset = %self.toolset.name(),
            adapter = adapter.name(),
            converted = report.converted.len(),
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "export finished"
        );
        report
    }
}

/// Returns one warning for every feature the tool uses that `adapter` does
/// not support, in feature order.
#[must_use]
pub fn feature_loss(tool: &CanonicalTool, adapter: &dyn Adapter) -> Vec<FeatureLossWarning> {
    let from_format = tool.source_format_or_default();
    detect_tool_features(tool)
        .into_iter()
        .filter(|feature| !adapter.supports_feature(*feature))
        .map(|feature| {
            debug!(tool = %tool.id(), %feature, adapter = adapter.name(), "feature not supported");
            FeatureLossWarning {
                feature,
                from_format: from_format.to_owned(),
                to_adapter: adapter.name().to_owned(),
            }
        })
        .collect()
}

fn convert(adapter: &dyn Adapter, tool: &CanonicalTool) -> ExposureResult<Value> {
    adapter
        .convert(tool)
        .map_err(|source| ExposureError::Conversion {
            tool_id: tool.id(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use toolset_adapters::{AdapterResult, FeatureSupport};
    use toolset_primitives::{JsonSchema, SchemaFeature};

    use super::*;

    struct MockAdapter {
        name: &'static str,
        support: FeatureSupport,
        fail_on: Option<&'static str>,
    }

    impl MockAdapter {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                support: FeatureSupport::all(),
                fail_on: None,
            }
        }

        fn without(mut self, features: impl IntoIterator<Item = SchemaFeature>) -> Self {
            self.support = FeatureSupport::except(features);
            self
        }

        fn failing_on(mut self, name: &'static str) -> Self {
            self.fail_on = Some(name);
            self
        }

        fn shared(self) -> Arc<dyn Adapter> {
            Arc::new(self)
        }
    }

    impl Adapter for MockAdapter {
        fn name(&self) -> &str {
            self.name
        }

        fn convert(&self, tool: &CanonicalTool) -> AdapterResult<Value> {
            if self.fail_on.is_some_and(|name| name == tool.name) {
                return Err(AdapterError::conversion("rejected by mock"));
            }
            Ok(json!({
                "name": tool.name,
                "namespace": tool.namespace,
                "description": tool.description,
            }))
        }

        fn supports_feature(&self, feature: SchemaFeature) -> bool {
            self.support.supports(feature)
        }
    }

    fn toolset_with(tools: Vec<CanonicalTool>) -> Toolset {
        let toolset = Toolset::new("test");
        toolset.extend(tools);
        toolset
    }

    fn names(values: &[Value]) -> Vec<&str> {
        values.iter().filter_map(|v| v["name"].as_str()).collect()
    }

    #[test]
    fn export_converts_in_toolset_order() {
        let toolset = toolset_with(vec![
            CanonicalTool::new("", "zebra"),
            CanonicalTool::new("", "apple").with_description("first"),
        ]);
        let exposure = Exposure::new(&toolset, MockAdapter::new("mock").shared());

        let converted = exposure.export().expect("export");
        assert_eq!(names(&converted), ["apple", "zebra"]);
        assert_eq!(converted[0]["description"], "first");
    }

    #[test]
    fn export_of_empty_toolset_is_empty() {
        let toolset = Toolset::new("empty");
        let exposure = Exposure::new(&toolset, MockAdapter::new("mock").shared());

        assert!(exposure.export().expect("export").is_empty());
        let report = exposure.export_with_warnings();
        assert!(report.converted.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn export_without_adapter_fails() {
        let toolset = toolset_with(vec![CanonicalTool::new("ns", "a")]);
        let exposure = Exposure::without_adapter(&toolset);

        let err = exposure.export().expect_err("missing adapter");
        assert!(matches!(err, ExposureError::MissingAdapter));
    }

    #[test]
    fn export_with_warnings_without_adapter_reports_single_error() {
        let toolset = toolset_with(vec![CanonicalTool::new("ns", "a")]);
        let report = Exposure::without_adapter(&toolset).export_with_warnings();

        assert!(report.converted.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], ExposureError::MissingAdapter));
    }

    #[test]
    fn export_stops_at_first_failure() {
        let toolset = toolset_with(vec![
            CanonicalTool::new("ns", "a"),
            CanonicalTool::new("ns", "b"),
            CanonicalTool::new("ns", "c"),
        ]);
        let adapter = MockAdapter::new("mock").failing_on("b").shared();

        let err = Exposure::new(&toolset, adapter).export().expect_err("b fails");
        match err {
            ExposureError::Conversion { tool_id, .. } => assert_eq!(tool_id, "ns:b"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn diagnostic_export_isolates_failing_tool() {
        let toolset = toolset_with(vec![
            CanonicalTool::new("ns", "good"),
            CanonicalTool::new("ns", "bad"),
        ]);
        let adapter = MockAdapter::new("mock").failing_on("bad").shared();

        let report = Exposure::new(&toolset, adapter).export_with_warnings();
        assert_eq!(names(&report.converted), ["good"]);
        assert_eq!(report.errors.len(), 1);
        let message = report.errors[0].to_string();
        assert!(message.contains("ns:bad"), "{message}");
        assert!(message.contains("rejected by mock"), "{message}");
    }

    #[test]
    fn failed_tool_keeps_its_warnings() {
        let toolset = toolset_with(vec![
            CanonicalTool::new("ns", "broken")
                .with_input_schema(JsonSchema::string().with_pattern("^x$")),
        ]);
        let adapter = MockAdapter::new("mock")
            .without([SchemaFeature::Pattern])
            .failing_on("broken")
            .shared();

        let report = Exposure::new(&toolset, adapter).export_with_warnings();
        assert!(report.converted.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].feature, SchemaFeature::Pattern);
    }

    #[test]
    fn pattern_inside_any_of_warns_once() {
        let toolset = toolset_with(vec![CanonicalTool::new("ns", "combinator").with_input_schema(
            JsonSchema::object().with_any_of(vec![
                JsonSchema::string().with_pattern("^test$"),
                JsonSchema::string().with_pattern("^other$").with_format("email"),
            ]),
        )]);
        let adapter = MockAdapter::new("mock")
            .without([SchemaFeature::Pattern])
            .shared();

        let report = Exposure::new(&toolset, adapter).export_with_warnings();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].feature, SchemaFeature::Pattern);
        assert_eq!(report.converted.len(), 1);
    }

    #[test]
    fn warnings_carry_source_format_and_adapter_name() {
        let toolset = toolset_with(vec![
            CanonicalTool::new("ns", "declared")
                .with_source_format("mcp")
                .with_input_schema(JsonSchema::string().with_format("email")),
            CanonicalTool::new("ns", "undeclared")
                .with_input_schema(JsonSchema::string().with_format("uri")),
        ]);
        let adapter = MockAdapter::new("openai")
            .without([SchemaFeature::Format])
            .shared();

        let warnings = Exposure::new(&toolset, adapter).export_with_warnings().warnings;
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].from_format, "mcp");
        assert_eq!(warnings[1].from_format, "canonical");
        assert!(warnings.iter().all(|w| w.to_adapter == "openai"));
    }

    #[test]
    fn warnings_deduplicate_across_input_and_output() {
        let toolset = toolset_with(vec![
            CanonicalTool::new("ns", "twice")
                .with_input_schema(JsonSchema::reference("#/$defs/In"))
                .with_output_schema(
                    JsonSchema::object().with_property("x", JsonSchema::reference("#/$defs/Out")),
                ),
        ]);
        let adapter = MockAdapter::new("mock").without([SchemaFeature::Ref]).shared();

        let report = Exposure::new(&toolset, adapter).export_with_warnings();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].feature, SchemaFeature::Ref);
    }

    #[test]
    fn nested_definitions_and_combinators_are_reported() {
        let toolset = toolset_with(vec![CanonicalTool::new("ns", "deep").with_input_schema(
            JsonSchema::object()
                .with_def("inner", JsonSchema::string().with_format("email"))
                .with_one_of(vec![JsonSchema::of_type("boolean")])
                .with_all_of(vec![JsonSchema::object()])
                .with_not(JsonSchema::of_type("null")),
        )]);
        let adapter = MockAdapter::new("mock")
            .without([
                SchemaFeature::Format,
                SchemaFeature::Defs,
                SchemaFeature::OneOf,
                SchemaFeature::AllOf,
                SchemaFeature::Not,
                SchemaFeature::AnyOf,
            ])
            .shared();

        let warned: Vec<_> = Exposure::new(&toolset, adapter)
            .export_with_warnings()
            .warnings
            .into_iter()
            .map(|w| w.feature)
            .collect();
        assert_eq!(
            warned,
            [
                SchemaFeature::Defs,
                SchemaFeature::OneOf,
                SchemaFeature::AllOf,
                SchemaFeature::Not,
                SchemaFeature::Format,
            ]
        );
    }

    #[test]
    fn feature_loss_without_conversion() {
        let tool = CanonicalTool::new("ns", "t")
            .with_input_schema(JsonSchema::string().with_bounds(Some(0.0), Some(9.0)));
        let adapter = MockAdapter::new("mock").without([SchemaFeature::Maximum]);

        let warnings = feature_loss(&tool, &adapter);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].feature, SchemaFeature::Maximum);
    }
}
