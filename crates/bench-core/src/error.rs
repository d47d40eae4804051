//! Error types for the benchmark core.

use thiserror::Error;

use bench_engine::EngineError;
use bench_storage::StorageError;

/// Errors surfaced by core workflows.
///
/// Per-benchmark query failures never appear here: they become the
/// unsupported sentinel digest instead.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Cannot summarize zero samples
    #[error("No timing samples to summarize")]
    NoSamples,

    /// Interactive input failed (e.g. stdin closed)
    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
