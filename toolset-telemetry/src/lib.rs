//! Observability utilities for toolset binaries.
//!
//! Libraries in this workspace only emit `tracing` events; binaries call
//! [`init_tracing`] once to install a formatted subscriber.

#![warn(missing_docs, clippy::pedantic)]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "TOOLSET_LOG";

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {reason}")]
    AlreadyInstalled {
        /// Message reported by the subscriber registry.
        reason: String,
    },
}

/// Subscriber settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when [`LOG_ENV`] is unset (e.g. `info`,
    /// `toolset_kernel=debug`).
    pub filter: String,
    /// Whether events include their target module.
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            with_target: false,
        }
    }
}

impl TelemetryConfig {
    /// Sets the fallback filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enables or disables event targets.
    #[must_use]
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Resolves the effective filter: [`LOG_ENV`] when set, otherwise the
    /// configured directive.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidFilter`] when the chosen directive
    /// does not parse.
    pub fn env_filter(&self) -> TelemetryResult<EnvFilter> {
        match std::env::var(LOG_ENV) {
            Ok(directive) if !directive.trim().is_empty() => Ok(EnvFilter::try_new(directive)?),
            _ => Ok(EnvFilter::try_new(&self.filter)?),
        }
    }
}

/// Installs a global `fmt` subscriber configured by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a bad directive and
/// [`TelemetryError::AlreadyInstalled`] when called twice.
pub fn init_tracing(config: &TelemetryConfig) -> TelemetryResult<()> {
    let filter = config.env_filter()?;
    let directive = filter.to_string();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled {
            reason: err.to_string(),
        })?;
    tracing::debug!(filter = %directive, "tracing subscriber installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_without_targets() {
        let config = TelemetryConfig::default();
        assert_eq!(config.filter, "info");
        assert!(!config.with_target);
    }

    #[test]
    fn bad_directive_is_rejected() {
        let config = TelemetryConfig::default().with_filter("toolset_kernel=loud");
        if std::env::var_os(LOG_ENV).is_none() {
            assert!(matches!(
                config.env_filter(),
                Err(TelemetryError::InvalidFilter(_))
            ));
        }
    }

    #[test]
    fn config_decodes_with_partial_fields() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{ "with_target": true }"#).expect("decode");
        assert_eq!(config, TelemetryConfig::default().with_target(true));
    }

    #[test]
    fn second_install_fails() {
        let config = TelemetryConfig::default().with_filter("warn");
        let _ = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(matches!(
            second,
            Err(TelemetryError::AlreadyInstalled { .. } | TelemetryError::InvalidFilter(_))
        ));
    }
}
