//! # bench-engine
//!
//! Boundary to the embedded query engine being benchmarked.
//!
//! The harness only needs one capability from the engine: execute a
//! statement (with optional named parameters) and get back a list of result
//! items. `EXPLAIN <query>` is the same call; its single item is a plan tree
//! that [`plan::index_usage`] can inspect.
//!
//! Implementations:
//! - [`HttpEngine`]: the engine's HTTP execute endpoint
//! - [`MockEngine`]: scripted responses for tests
//!
//! Calls are one awaitable operation each. There is no cancellation or
//! timeout at this boundary: a hung engine call hangs the caller.

mod http;
mod mock;
pub mod plan;

pub use http::HttpEngine;
pub use mock::MockEngine;
pub use plan::{index_usage, IndexUsage};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error type for engine calls.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine refused the statement (syntax error, unsupported feature)
    #[error("Statement rejected: {0}")]
    Rejected(String),

    /// The statement referenced a collection that does not exist yet
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    /// Map an engine error message onto a variant.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("collection")
            && (lower.contains("not found") || lower.contains("does not exist"))
        {
            EngineError::CollectionNotFound(message)
        } else {
            EngineError::Rejected(message)
        }
    }
}

/// Items returned by one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub items: Vec<Value>,
}

impl QueryResult {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }
}

/// The query engine under benchmark.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Execute one statement.
    ///
    /// `params` is a JSON object of named arguments referenced as `:name`.
    async fn execute(
        &self,
        statement: &str,
        params: Option<&Value>,
    ) -> Result<QueryResult, EngineError>;

    /// Release string of the engine, used to key baselines.
    fn version(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_message() {
        assert!(matches!(
            EngineError::from_message("Collection 'benchmark_baselines' not found"),
            EngineError::CollectionNotFound(_)
        ));
        assert!(matches!(
            EngineError::from_message("collection does not exist"),
            EngineError::CollectionNotFound(_)
        ));
        assert!(matches!(
            EngineError::from_message("syntax error near 'SELEC'"),
            EngineError::Rejected(_)
        ));
    }

    #[test]
    fn test_query_result_helpers() {
        let result = QueryResult::new(vec![serde_json::json!({"a": 1})]);
        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
        assert_eq!(result.first().unwrap()["a"], 1);
        assert!(QueryResult::default().is_empty());
    }
}
