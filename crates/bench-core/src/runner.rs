//! Timed repetitions of one benchmark.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use bench_engine::{EngineError, QueryEngine};
use bench_types::{BenchmarkDefinition, StatDigest};

use crate::stats::summarize;

/// Receives coarse progress while repetitions run.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, label: &str, completed: usize, total: usize);
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn on_progress(&self, _label: &str, _completed: usize, _total: usize) {}
}

/// Outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRun {
    pub digest: StatDigest,
    /// Per-repetition durations in milliseconds, in execution order
    pub samples: Vec<f64>,
    /// Why the run is unsupported, if it is
    pub error: Option<String>,
}

impl BenchmarkRun {
    fn unsupported(error: String) -> Self {
        Self {
            digest: StatDigest::unsupported(),
            samples: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.digest.is_supported()
    }
}

/// Runs benchmarks strictly sequentially against one engine.
#[derive(Clone)]
pub struct BenchmarkRunner {
    engine: Arc<dyn QueryEngine>,
}

impl BenchmarkRunner {
    pub fn new(engine: Arc<dyn QueryEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn QueryEngine> {
        &self.engine
    }

    /// Run `definition` for `runs` timed repetitions (at least one).
    ///
    /// Pre-queries run once before timing. The first failing statement,
    /// pre-query or repetition, ends measurement and yields the unsupported
    /// digest. Post-queries always run afterwards, and their failures are
    /// only logged. This never returns an error.
    pub async fn run(
        &self,
        definition: &BenchmarkDefinition,
        runs: usize,
        progress: &dyn ProgressSink,
    ) -> BenchmarkRun {
        let runs = runs.max(1);
        let measured = self.measure(definition, runs, progress).await;
        self.cleanup(definition).await;

        match measured {
            Ok((samples, result_count)) => match summarize(&samples, result_count) {
                Ok(digest) => {
                    info!(
                        benchmark = %definition.name,
                        runs,
                        mean_ms = digest.mean,
                        "Benchmark finished"
                    );
                    BenchmarkRun {
                        digest,
                        samples,
                        error: None,
                    }
                }
                Err(e) => BenchmarkRun::unsupported(e.to_string()),
            },
            Err(e) => {
                warn!(benchmark = %definition.name, error = %e, "Benchmark not supported");
                BenchmarkRun::unsupported(e.to_string())
            }
        }
    }

    async fn measure(
        &self,
        definition: &BenchmarkDefinition,
        runs: usize,
        progress: &dyn ProgressSink,
    ) -> Result<(Vec<f64>, i64), EngineError> {
        for statement in &definition.pre_queries {
            self.engine.execute(statement, None).await?;
        }

        let step = progress_step(runs);
        let mut samples = Vec::with_capacity(runs);
        let mut result_count = None;

        for i in 0..runs {
            let started = Instant::now();
            let result = self.engine.execute(&definition.query, None).await?;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

            debug!(benchmark = %definition.name, run = i + 1, elapsed_ms, "Repetition");
            samples.push(elapsed_ms);
            result_count.get_or_insert(result.len() as i64);

            let completed = i + 1;
            if completed % step == 0 || completed == runs {
                progress.on_progress(&definition.name, completed, runs);
            }
        }

        Ok((samples, result_count.unwrap_or(0)))
    }

    async fn cleanup(&self, definition: &BenchmarkDefinition) {
        for statement in &definition.post_queries {
            if let Err(e) = self.engine.execute(statement, None).await {
                warn!(
                    benchmark = %definition.name,
                    statement = %statement,
                    error = %e,
                    "Post-query failed"
                );
            }
        }
    }
}

/// Repetitions between progress notifications: every 20%, or only at the
/// end when there are fewer than ten.
fn progress_step(runs: usize) -> usize {
    if runs < 10 {
        runs.max(1)
    } else {
        runs.div_ceil(5)
    }
}
