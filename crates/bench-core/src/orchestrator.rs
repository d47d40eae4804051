//! Benchmark reports against stored history, and baseline creation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use bench_engine::QueryEngine;
use bench_storage::BaselineStore;
use bench_types::{BaselineRecord, BenchmarkDefinition, Version};

use crate::error::CoreError;
use crate::identity::fingerprint;
use crate::policy::{OverwritePolicy, Prompt};
use crate::runner::{BenchmarkRun, BenchmarkRunner, ProgressSink};
use crate::selector::{select_comparisons, ComparisonKind};
use crate::significance::{classify, Classification};
use crate::table::VersionTable;

/// Name given to ad-hoc `.bench` queries.
pub const ADHOC_NAME: &str = "adhoc";

/// A fresh run compared against one stored version.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub kind: ComparisonKind,
    pub version: Version,
    pub baseline_mean: f64,
    pub classification: Classification,
}

/// The stored record for the version being run, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentBaseline {
    pub record: BaselineRecord,
    /// `None` when either side is unsupported
    pub classification: Option<Classification>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    pub name: String,
    pub query: String,
    pub fingerprint: String,
    pub version: Version,
    pub run: BenchmarkRun,
    pub current_baseline: Option<CurrentBaseline>,
    /// Empty when the run is unsupported
    pub comparisons: Vec<Comparison>,
    /// Every stored record for this fingerprint, sentinels included
    pub history: Vec<BaselineRecord>,
}

/// Counts from one baseline-creation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaselineSummary {
    pub created: usize,
    pub overwritten: usize,
    pub skipped: usize,
    /// Records written with the unsupported digest
    pub unsupported: usize,
}

pub struct BaselineOrchestrator {
    runner: BenchmarkRunner,
    store: Arc<dyn BaselineStore>,
    version: Version,
}

impl BaselineOrchestrator {
    /// The current version is the engine's reported release.
    pub fn new(engine: Arc<dyn QueryEngine>, store: Arc<dyn BaselineStore>) -> Self {
        let version = Version::parse(engine.version());
        Self {
            runner: BenchmarkRunner::new(engine),
            store,
            version,
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn store(&self) -> &Arc<dyn BaselineStore> {
        &self.store
    }

    /// Time an ad-hoc query with no history lookup.
    pub async fn bench(&self, query: &str, runs: usize, progress: &dyn ProgressSink) -> BenchmarkRun {
        let definition = BenchmarkDefinition::new(ADHOC_NAME, query);
        self.runner.run(&definition, runs, progress).await
    }

    /// Run one benchmark and compare it with stored versions.
    pub async fn report(
        &self,
        definition: &BenchmarkDefinition,
        runs: usize,
        progress: &dyn ProgressSink,
    ) -> Result<BenchmarkReport, CoreError> {
        let run = self.runner.run(definition, runs, progress).await;
        let hash = fingerprint(&definition.pre_queries, &definition.query);

        let history = self.store.get_all(&hash).await?;

        let mut report = BenchmarkReport {
            name: definition.name.clone(),
            query: definition.query.clone(),
            fingerprint: hash,
            version: self.version.clone(),
            run,
            current_baseline: None,
            comparisons: Vec::new(),
            history,
        };

        let current_mean = report
            .run
            .is_supported()
            .then_some(report.run.digest.mean);

        report.current_baseline = report
            .history
            .iter()
            .find(|r| r.id.engine_version == self.version.raw)
            .map(|record| CurrentBaseline {
                record: record.clone(),
                classification: record
                    .mean()
                    .zip(current_mean)
                    .map(|(baseline, current)| classify(baseline, current)),
            });

        let Some(current_mean) = current_mean else {
            debug!(benchmark = %definition.name, "Skipping comparisons for unsupported run");
            return Ok(report);
        };

        report.comparisons = select_comparisons(&self.version, &report.history)
            .into_iter()
            .filter_map(|selected| {
                let baseline_mean = selected.record.mean()?;
                Some(Comparison {
                    kind: selected.kind,
                    version: selected.version,
                    baseline_mean,
                    classification: classify(baseline_mean, current_mean),
                })
            })
            .collect();

        Ok(report)
    }

    /// Report every benchmark in order, strictly one after another.
    pub async fn report_all(
        &self,
        definitions: &[BenchmarkDefinition],
        runs: usize,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<BenchmarkReport>, CoreError> {
        let mut reports = Vec::with_capacity(definitions.len());
        for definition in definitions {
            reports.push(self.report(definition, runs, progress).await?);
        }
        Ok(reports)
    }

    /// Measure and store a baseline for each benchmark on the current version.
    ///
    /// When a record already exists the overwrite policy decides, asking
    /// `prompt` while it is still in `Ask`. Skipped benchmarks are not run.
    pub async fn create_baselines(
        &self,
        definitions: &[BenchmarkDefinition],
        runs: usize,
        prompt: &mut dyn Prompt,
        progress: &dyn ProgressSink,
    ) -> Result<BaselineSummary, CoreError> {
        let mut policy = OverwritePolicy::default();
        let mut summary = BaselineSummary::default();

        for definition in definitions {
            let hash = fingerprint(&definition.pre_queries, &definition.query);
            let exists = self.store.get(&hash, &self.version.raw).await?.is_some();

            if exists {
                let question = format!(
                    "Baseline for '{}' on {} exists. Overwrite? [y]es/[n]o/[a]ll/none: ",
                    definition.name, self.version
                );
                let (overwrite, next) = policy.decide(prompt, &question).await?;
                policy = next;
                if !overwrite {
                    info!(benchmark = %definition.name, "Keeping existing baseline");
                    summary.skipped += 1;
                    continue;
                }
            }

            let run = self.runner.run(definition, runs, progress).await;
            if !run.is_supported() {
                summary.unsupported += 1;
            }
            let record = BaselineRecord::new(
                &definition.query,
                hash,
                self.version.raw.clone(),
                run.digest,
                Utc::now(),
            );
            self.store.upsert(&record).await?;

            if exists {
                summary.overwritten += 1;
            } else {
                summary.created += 1;
            }
            info!(
                benchmark = %definition.name,
                version = %self.version,
                overwritten = exists,
                "Stored baseline"
            );
        }

        Ok(summary)
    }

    /// Table of every stored version for the given benchmarks.
    pub async fn saved_table(
        &self,
        definitions: &[BenchmarkDefinition],
    ) -> Result<VersionTable, CoreError> {
        let mut entries = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let hash = fingerprint(&definition.pre_queries, &definition.query);
            entries.push((definition.name.clone(), self.store.get_all(&hash).await?));
        }
        Ok(VersionTable::from_saved(&self.version, &entries))
    }
}
