//! Configuration errors.

use thiserror::Error;

/// Errors raised while loading or validating run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("section count must be at least 1, got {0}")]
    InvalidSectionCount(usize),

    #[error("percentile must be between 0 and 100, got {0}")]
    InvalidPercentile(u8),

    #[error("invalid boundary pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("boundary pattern `{0}` produced no sections")]
    NoSections(String),

    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("alias `{alias}` is claimed by both `{first}` and `{second}`")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
