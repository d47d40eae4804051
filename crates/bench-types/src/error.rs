//! Error types for the query-bench domain layer.

use thiserror::Error;

/// Unified error type for configuration and suite loading.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Benchmark suite file could not be read or parsed
    #[error("Suite error: {0}")]
    Suite(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
