//! Mock engine for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{EngineError, QueryEngine, QueryResult};

#[derive(Debug, Clone)]
enum Response {
    Items(Vec<Value>),
    Fail(String),
    MissingCollection(String),
}

/// Engine with scripted per-statement responses.
///
/// Statements are matched exactly first, then by the longest registered
/// prefix. Unmatched statements succeed with no items. Every call is
/// recorded so tests can assert on what ran, and in which order.
pub struct MockEngine {
    version: String,
    responses: Vec<(String, Response)>,
    /// Fail a statement on its Nth call (1-based)
    fail_on_call: HashMap<String, usize>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl MockEngine {
    /// Create a mock reporting the given release string.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            responses: Vec::new(),
            fail_on_call: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Return these items for matching statements.
    pub fn with_items(mut self, statement: impl Into<String>, items: Vec<Value>) -> Self {
        self.responses.push((statement.into(), Response::Items(items)));
        self
    }

    /// Reject matching statements with the given message.
    pub fn with_failure(mut self, statement: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .push((statement.into(), Response::Fail(message.into())));
        self
    }

    /// Report a missing collection for matching statements.
    pub fn with_missing_collection(mut self, statement: impl Into<String>) -> Self {
        let statement = statement.into();
        let message = format!("collection not found for '{}'", statement);
        self.responses
            .push((statement, Response::MissingCollection(message)));
        self
    }

    /// Reject an exact statement on its `call`th execution only.
    pub fn with_failure_on_call(mut self, statement: impl Into<String>, call: usize) -> Self {
        self.fail_on_call.insert(statement.into(), call);
        self
    }

    /// All statements executed so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.lock_calls().iter().map(|(s, _)| s.clone()).collect()
    }

    /// All (statement, params) pairs executed so far.
    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.lock_calls().clone()
    }

    /// Number of times an exact statement was executed.
    pub fn call_count(&self, statement: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|(s, _)| s == statement)
            .count()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(String, Option<Value>)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn response_for(&self, statement: &str) -> Option<&Response> {
        if let Some((_, response)) = self.responses.iter().find(|(s, _)| s == statement) {
            return Some(response);
        }
        self.responses
            .iter()
            .filter(|(s, _)| statement.starts_with(s.as_str()))
            .max_by_key(|(s, _)| s.len())
            .map(|(_, response)| response)
    }
}

#[async_trait]
impl QueryEngine for MockEngine {
    async fn execute(
        &self,
        statement: &str,
        params: Option<&Value>,
    ) -> Result<QueryResult, EngineError> {
        let call_number = {
            let mut calls = self.lock_calls();
            calls.push((statement.to_string(), params.cloned()));
            calls.iter().filter(|(s, _)| s == statement).count()
        };

        if self.fail_on_call.get(statement) == Some(&call_number) {
            return Err(EngineError::Rejected(format!(
                "scripted failure on call {}",
                call_number
            )));
        }

        match self.response_for(statement) {
            Some(Response::Items(items)) => Ok(QueryResult::new(items.clone())),
            Some(Response::Fail(message)) => Err(EngineError::Rejected(message.clone())),
            Some(Response::MissingCollection(message)) => {
                Err(EngineError::CollectionNotFound(message.clone()))
            }
            None => Ok(QueryResult::default()),
        }
    }

    fn version(&self) -> &str {
        &self.version
    }
}
