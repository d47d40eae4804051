//! Benchmark suite definitions.
//!
//! A suite is a TOML file with `[[benchmark]]` and `[[scenario]]` tables.
//! Benchmarks keep file order so they can be addressed by 1-based index.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// A named, static benchmark.
///
/// `pre_queries` run once before timing starts (e.g. index creation),
/// `post_queries` once after (cleanup). Neither is timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkDefinition {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub pre_queries: Vec<String>,
    #[serde(default)]
    pub post_queries: Vec<String>,
}

impl BenchmarkDefinition {
    /// Benchmark with no setup or cleanup statements.
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            pre_queries: Vec::new(),
            post_queries: Vec::new(),
        }
    }

    pub fn with_pre_queries(mut self, queries: Vec<String>) -> Self {
        self.pre_queries = queries;
        self
    }

    pub fn with_post_queries(mut self, queries: Vec<String>) -> Self {
        self.post_queries = queries;
        self
    }
}

/// One step of a scenario: either a bare query or a query with checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    Plain(String),
    Validated {
        query: String,
        #[serde(default)]
        expected_count: Option<usize>,
        #[serde(default)]
        expected_index: Option<String>,
        /// Upper bound in milliseconds
        #[serde(default)]
        max_execution_time: Option<f64>,
    },
}

impl ScenarioStep {
    pub fn query(&self) -> &str {
        match self {
            ScenarioStep::Plain(query) => query,
            ScenarioStep::Validated { query, .. } => query,
        }
    }
}

/// A named sequence of steps, each executed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<ScenarioStep>,
}

/// All benchmarks and scenarios loaded from a suite file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    #[serde(default, rename = "benchmark")]
    pub benchmarks: Vec<BenchmarkDefinition>,
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<Scenario>,
}

impl BenchmarkSuite {
    /// Load a suite from a TOML file.
    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BenchError::Suite(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Parse a suite from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, BenchError> {
        let suite: BenchmarkSuite =
            toml::from_str(text).map_err(|e| BenchError::Suite(e.to_string()))?;
        suite.validate()?;
        Ok(suite)
    }

    fn validate(&self) -> Result<(), BenchError> {
        let mut seen = std::collections::HashSet::new();
        for benchmark in &self.benchmarks {
            if benchmark.query.trim().is_empty() {
                return Err(BenchError::Suite(format!(
                    "benchmark '{}' has an empty query",
                    benchmark.name
                )));
            }
            if !seen.insert(benchmark.name.as_str()) {
                return Err(BenchError::Suite(format!(
                    "duplicate benchmark name '{}'",
                    benchmark.name
                )));
            }
        }
        Ok(())
    }

    /// Find a benchmark by name or 1-based index.
    pub fn find_benchmark(&self, target: &str) -> Result<&BenchmarkDefinition, BenchError> {
        if let Some(found) = self.benchmarks.iter().find(|b| b.name == target) {
            return Ok(found);
        }
        if let Ok(index) = target.parse::<usize>() {
            if index >= 1 {
                if let Some(found) = self.benchmarks.get(index - 1) {
                    return Ok(found);
                }
            }
        }
        Err(BenchError::NotFound(format!("benchmark '{}'", target)))
    }

    /// Find a scenario by name.
    pub fn find_scenario(&self, name: &str) -> Result<&Scenario, BenchError> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| BenchError::NotFound(format!("scenario '{}'", name)))
    }
}
