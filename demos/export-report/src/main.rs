//! Builds a toolset from a config and a catalog, exports it through a demo
//! function-calling adapter, and reports the schema features it would drop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::{Value, json};
use toolsets::adapters::{Adapter, AdapterError, AdapterResult, FeatureSupport};
use toolsets::config::{ToolsetConfig, load_catalog};
use toolsets::telemetry::{TelemetryConfig, init_tracing};
use toolsets::{CanonicalTool, Exposure, SchemaFeature};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "export-report", about = "Export a toolset and report feature loss.")]
struct Cli {
    /// Toolset configuration file.
    #[arg(long, default_value = "demos/export-report/data/toolset.json")]
    config: PathBuf,

    /// JSON array of canonical tools.
    #[arg(long, default_value = "demos/export-report/data/catalog.json")]
    catalog: PathBuf,

    /// Schema features the demo adapter cannot carry.
    #[arg(
        long = "drop",
        value_delimiter = ',',
        default_values_t = [SchemaFeature::Pattern, SchemaFeature::Format]
    )]
    dropped: Vec<SchemaFeature>,

    /// Abort on the first conversion failure instead of reporting it.
    #[arg(long)]
    strict: bool,

    /// Log filter used when `TOOLSET_LOG` is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

/// Emits `{"type": "function", ...}` objects and requires a description.
struct FunctionAdapter {
    support: FeatureSupport,
}

impl Adapter for FunctionAdapter {
    fn name(&self) -> &str {
        "functions"
    }

    fn convert(&self, tool: &CanonicalTool) -> AdapterResult<Value> {
        if tool.description.trim().is_empty() {
            return Err(AdapterError::unsupported("function description is required"));
        }
        let parameters = match &tool.input_schema {
            Some(schema) => serde_json::to_value(schema)?,
            None => json!({ "type": "object", "properties": {} }),
        };
        Ok(json!({
            "type": "function",
            "function": {
                "name": tool.id().to_string().replace(':', "__"),
                "description": tool.description,
                "parameters": parameters,
            }
        }))
    }

    fn supports_feature(&self, feature: SchemaFeature) -> bool {
        self.support.supports(feature)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TelemetryConfig::default().with_filter(&cli.log))?;

    let config = ToolsetConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let catalog = load_catalog(&cli.catalog)
        .with_context(|| format!("loading {}", cli.catalog.display()))?;
    info!(catalog = catalog.len(), toolset = %config.name, "inputs loaded");

    let toolset = config.builder().from_registry(catalog).build()?;
    info!(tools = toolset.count(), ids = ?toolset.ids(), "toolset built");

    let adapter: Arc<dyn Adapter> = Arc::new(FunctionAdapter {
        support: FeatureSupport::except(cli.dropped.iter().copied()),
    });
    let exposure = Exposure::new(&toolset, adapter);

    let converted = if cli.strict {
        exposure.export()?
    } else {
        let report = exposure.export_with_warnings();
        for warning in &report.warnings {
            warn!("{warning}");
        }
        for error in &report.errors {
            warn!("{error}");
        }
        info!(
            converted = report.converted.len(),
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "export finished"
        );
        if report.converted.is_empty() && !report.errors.is_empty() {
            bail!("no tool could be exported");
        }
        report.converted
    };

    println!("{}", serde_json::to_string_pretty(&converted)?);
    Ok(())
}
