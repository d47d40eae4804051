//! Scenario execution: ordered steps, each run once and optionally checked.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use bench_engine::plan::explain;
use bench_engine::{IndexUsage, QueryEngine};
use bench_types::{Scenario, ScenarioStep, Version};

/// Engine releases before this cannot report index usage reliably.
pub const INDEX_CHECK_MIN_VERSION: (u64, u64, u64) = (4, 11, 0);

/// `expected_index` value that asks for a full collection scan.
pub const FULL_SCAN: &str = "full_scan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Passed => f.write_str("PASS"),
            CheckOutcome::Failed => f.write_str("FAIL"),
            CheckOutcome::Skipped => f.write_str("SKIP"),
        }
    }
}

/// One validation line of a step.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub check: &'static str,
    pub outcome: CheckOutcome,
    pub detail: String,
}

impl CheckResult {
    fn new(check: &'static str, passed: bool, detail: String) -> Self {
        let outcome = if passed {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed
        };
        Self {
            check,
            outcome,
            detail,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub query: String,
    pub elapsed_ms: f64,
    pub result_count: Option<usize>,
    pub error: Option<String>,
    pub checks: Vec<CheckResult>,
}

impl StepReport {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.checks.iter().all(|c| c.outcome != CheckOutcome::Failed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(StepReport::passed)
    }
}

pub struct ScenarioRunner {
    engine: Arc<dyn QueryEngine>,
    version: Version,
}

impl ScenarioRunner {
    pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
        let version = Version::parse(engine.version());
        Self { engine, version }
    }

    /// Run every step in order. Step failures are recorded and the
    /// scenario continues with the next step.
    pub async fn run(&self, scenario: &Scenario) -> ScenarioReport {
        let mut steps = Vec::with_capacity(scenario.steps.len());
        for step in &scenario.steps {
            steps.push(self.run_step(step).await);
        }
        ScenarioReport {
            name: scenario.name.clone(),
            steps,
        }
    }

    async fn run_step(&self, step: &ScenarioStep) -> StepReport {
        let query = step.query();
        let started = Instant::now();
        let executed = self.engine.execute(query, None).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let result = match executed {
            Ok(result) => result,
            Err(e) => {
                warn!(query, error = %e, "Scenario step failed");
                return StepReport {
                    query: query.to_string(),
                    elapsed_ms,
                    result_count: None,
                    error: Some(e.to_string()),
                    checks: Vec::new(),
                };
            }
        };
        debug!(query, elapsed_ms, count = result.len(), "Scenario step");

        let mut checks = Vec::new();
        if let ScenarioStep::Validated {
            expected_count,
            expected_index,
            max_execution_time,
            ..
        } = step
        {
            if let Some(expected) = expected_count {
                checks.push(CheckResult::new(
                    "count",
                    result.len() == *expected,
                    format!("expected {} results, got {}", expected, result.len()),
                ));
            }
            if let Some(expected) = expected_index {
                checks.push(self.check_index(query, expected).await);
            }
            if let Some(limit) = max_execution_time {
                checks.push(CheckResult::new(
                    "time",
                    elapsed_ms <= *limit,
                    format!("{:.2}ms (limit {:.2}ms)", elapsed_ms, limit),
                ));
            }
        }

        StepReport {
            query: query.to_string(),
            elapsed_ms,
            result_count: Some(result.len()),
            error: None,
            checks,
        }
    }

    async fn check_index(&self, query: &str, expected: &str) -> CheckResult {
        let (major, minor, patch) = INDEX_CHECK_MIN_VERSION;
        if !self.version.is_at_least(major, minor, patch) {
            return CheckResult {
                check: "index",
                outcome: CheckOutcome::Skipped,
                detail: format!(
                    "requires engine {}.{}.{} or later (running {})",
                    major, minor, patch, self.version
                ),
            };
        }

        match explain(self.engine.as_ref(), query).await {
            Ok(usage) => {
                let passed = match &usage {
                    IndexUsage::Index(name) => name == expected,
                    IndexUsage::FullScan => expected == FULL_SCAN,
                    IndexUsage::Unknown => false,
                };
                CheckResult::new("index", passed, format!("expected {}, used {}", expected, usage))
            }
            Err(e) => CheckResult::new("index", false, format!("EXPLAIN failed: {}", e)),
        }
    }
}
