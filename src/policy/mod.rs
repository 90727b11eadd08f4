//! Traversal policy: configuration and generation limits.

pub mod config;
pub mod limits;

pub use config::TreeConfig;
pub use limits::{EffectiveLimits, GenerationLimit, NaturalDepths};

/// Error type for configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A generation limit below -1 or too large.
    #[error("Invalid generation limit {0}: expected -1 (unlimited) or a non-negative count")]
    InvalidGenerationLimit(i64),
    /// Malformed JSON configuration.
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration file could not be read.
    #[error("Cannot read configuration {path}: {source}")]
    Io {
        /// File that failed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}
