//! Configuration and catalog loaders.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toolset_collection::StaticRegistry;
use toolset_primitives::CanonicalTool;
use tracing::debug;

use crate::schema::ToolsetConfig;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration or catalogs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but describes an unusable configuration.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Description of the problem.
        reason: String,
    },
}

impl ToolsetConfig {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`ToolsetConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&read(path)?)?;
        debug!(path = %path.display(), toolset = %config.name, "configuration loaded");
        Ok(config)
    }

    /// Checks that the configuration can produce a toolset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the name is blank.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "toolset name must not be blank".into(),
            });
        }
        Ok(())
    }
}

/// Parses a JSON array of canonical tools into a registry.
///
/// Entries with a blank name are dropped, matching what a toolset would do
/// with them.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the text is not an array of tools.
pub fn catalog_from_json_str(json: &str) -> ConfigResult<StaticRegistry> {
    let tools: Vec<CanonicalTool> = serde_json::from_str(json)?;
    let total = tools.len();
    let registry: StaticRegistry = tools.into_iter().filter(|tool| !tool.is_empty()).collect();
    if registry.len() < total {
        debug!(dropped = total - registry.len(), "catalog entries without a name skipped");
    }
    Ok(registry)
}

/// Reads a catalog file into a registry.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
/// errors of [`catalog_from_json_str`].
pub fn load_catalog(path: impl AsRef<Path>) -> ConfigResult<StaticRegistry> {
    let path = path.as_ref();
    let registry = catalog_from_json_str(&read(path)?)?;
    debug!(path = %path.display(), tools = registry.len(), "catalog loaded");
    Ok(registry)
}

fn read(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
