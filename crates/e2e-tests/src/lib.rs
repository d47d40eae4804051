//! End-to-end test infrastructure for query-bench.
//!
//! Provides a shared TestHarness and helpers for tests covering the full
//! run, store, compare and render path.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use bench_core::{fingerprint, BaselineOrchestrator};
use bench_engine::MockEngine;
use bench_storage::Storage;
use bench_types::{BaselineRecord, BenchmarkDefinition, StatDigest};

/// Shared test harness for E2E tests.
///
/// Holds a local baseline store in a temp directory. Engines are created
/// per test since each scripts its own responses.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Shared storage instance
    pub storage: Arc<Storage>,
}

impl TestHarness {
    /// Create a new test harness with temp directory and storage.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let storage =
            Arc::new(Storage::open(temp_dir.path()).expect("Failed to open test storage"));
        Self {
            _temp_dir: temp_dir,
            storage,
        }
    }

    /// Orchestrator over this harness's storage.
    pub fn orchestrator(&self, engine: Arc<MockEngine>) -> BaselineOrchestrator {
        BaselineOrchestrator::new(engine, self.storage.clone())
    }

    /// Store a baseline for `definition` on `version` with a constant timing.
    pub fn seed(&self, definition: &BenchmarkDefinition, version: &str, mean: Option<f64>) {
        let digest = mean.map_or_else(StatDigest::unsupported, constant_digest);
        let record = BaselineRecord::new(
            &definition.query,
            fingerprint(&definition.pre_queries, &definition.query),
            version,
            digest,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        );
        self.storage
            .put_baseline(&record)
            .expect("Failed to seed baseline");
    }

    /// Stored record for `definition` on `version`, if any.
    pub fn stored(&self, definition: &BenchmarkDefinition, version: &str) -> Option<BaselineRecord> {
        self.storage
            .get_baseline(
                &fingerprint(&definition.pre_queries, &definition.query),
                version,
            )
            .expect("Failed to read baseline")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest whose every statistic is `mean`.
pub fn constant_digest(mean: f64) -> StatDigest {
    StatDigest {
        mean,
        median: mean,
        min: mean,
        max: mean,
        std_dev: 0.0,
        p95: mean,
        p99: mean,
        result_count: 1,
        runs: 5,
    }
}

/// Movies benchmarks used across tests.
pub fn movie_suite() -> Vec<BenchmarkDefinition> {
    vec![
        BenchmarkDefinition::new("all_movies", "SELECT * FROM movies"),
        BenchmarkDefinition::new("by_year", "SELECT * FROM movies WHERE year = 2001")
            .with_pre_queries(vec![
                "CREATE INDEX IF NOT EXISTS idx_year ON movies (year)".to_string()
            ])
            .with_post_queries(vec!["DROP INDEX IF EXISTS idx_year ON movies".to_string()]),
    ]
}
