use thiserror::Error;

use book_model::ConfigError;

/// Errors that abort a timeline run.
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("no character in the final section has a positive interaction total")]
    InsufficientData,

    #[error(
        "section {section}: matrix dimension {dimension} does not match {characters} characters"
    )]
    ConsistencyViolation {
        section: usize,
        dimension: usize,
        characters: usize,
    },

    #[error("section analysis failed: {0}")]
    Analysis(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TimelineError>;
