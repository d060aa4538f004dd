//! Shared error definitions for tool primitives.

use thiserror::Error;

/// Result alias used throughout the toolset crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// A tool descriptor could not be decoded from JSON.
    #[error("invalid tool descriptor: {source}")]
    InvalidTool {
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A schema tree could not be decoded from JSON.
    #[error("invalid schema: {source}")]
    InvalidSchema {
        /// Underlying decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A string did not name a known schema feature.
    #[error("unknown schema feature `{keyword}`")]
    UnknownFeature {
        /// Keyword that failed to match.
        keyword: String,
    },
}
