//! Unsupported-query E2E tests.
//!
//! A query the engine rejects must yield the sentinel digest, never raise,
//! and never be offered as a comparison candidate later.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use bench_core::{
    render_table, BenchmarkRunner, Cell, ScriptedPrompt, SilentProgress, Style, VersionTable,
};
use bench_engine::MockEngine;
use bench_types::{BenchmarkDefinition, StatDigest};
use e2e_tests::{movie_suite, TestHarness};

/// A single repetition against an engine that always rejects returns the sentinel.
#[tokio::test]
async fn test_always_failing_engine_yields_sentinel() {
    let engine = Arc::new(MockEngine::new("4.10.0").with_failure("", "unsupported feature"));
    let runner = BenchmarkRunner::new(engine);

    let run = runner
        .run(
            &BenchmarkDefinition::new("q", "SELECT * FROM movies"),
            1,
            &SilentProgress,
        )
        .await;

    assert_eq!(run.digest, StatDigest::unsupported());
    assert_eq!(run.digest.mean, -1.0);
    assert!(run.samples.is_empty());
}

/// A sentinel baseline stored on an old version is excluded from later comparisons.
#[tokio::test]
async fn test_sentinel_baseline_not_compared() {
    let harness = TestHarness::new();
    let suite = movie_suite();

    let old_engine = Arc::new(MockEngine::new("4.12.1").with_failure("", "unsupported feature"));
    let summary = harness
        .orchestrator(old_engine)
        .create_baselines(&suite[..1], 1, &mut ScriptedPrompt::new(Vec::<String>::new()), &SilentProgress)
        .await
        .unwrap();
    assert_eq!(summary.unsupported, 1);
    assert_eq!(
        harness.stored(&suite[0], "4.12.1").unwrap().digest().mean,
        -1.0
    );

    harness.seed(&suite[0], "4.12.0", Some(3.0));

    let report = harness
        .orchestrator(Arc::new(MockEngine::new("4.12.2")))
        .report(&suite[0], 2, &SilentProgress)
        .await
        .unwrap();

    let versions: Vec<&str> = report
        .comparisons
        .iter()
        .map(|c| c.version.raw.as_str())
        .collect();
    assert_eq!(versions, vec!["4.12.0"]);
}

/// Saved view renders sentinel records as N/A and absent versions as a dash.
#[tokio::test]
async fn test_saved_view_placeholders() {
    let harness = TestHarness::new();
    let suite = movie_suite();
    harness.seed(&suite[0], "4.12.2", Some(12.0));
    harness.seed(&suite[0], "4.11.0", None);
    harness.seed(&suite[1], "4.11.0", Some(4.0));

    let orchestrator = harness.orchestrator(Arc::new(MockEngine::new("4.12.2")));
    let table: VersionTable = orchestrator.saved_table(&suite).await.unwrap();

    assert_eq!(table.rows[0].cells, vec![Cell::Value(12.0), Cell::Unsupported]);
    assert_eq!(table.rows[1].cells, vec![Cell::Missing, Cell::Value(4.0)]);

    let text = render_table(&table, Style::new(false));
    assert!(text.contains("N/A"));
    assert!(text.contains("–"));
}

/// The live batch table shows N/A for stored sentinels and keeps history for failed runs.
#[tokio::test]
async fn test_live_table_placeholders() {
    let harness = TestHarness::new();
    let suite = movie_suite();
    harness.seed(&suite[0], "4.12.1", Some(3.0));
    harness.seed(&suite[1], "4.12.1", None);
    harness.seed(&suite[1], "4.12.0", Some(5.0));

    let engine = MockEngine::new("4.12.2").with_failure("SELECT * FROM movies WHERE", "unsupported");
    let orchestrator = harness.orchestrator(Arc::new(engine));
    let reports = orchestrator
        .report_all(&suite, 2, &SilentProgress)
        .await
        .unwrap();
    assert!(!reports[1].run.is_supported());

    let table = VersionTable::from_reports(orchestrator.version(), &reports);
    let columns: Vec<&str> = table.versions.iter().map(|v| v.raw.as_str()).collect();
    assert_eq!(columns, vec!["4.12.2", "4.12.1", "4.12.0"]);
    assert!(matches!(table.rows[0].cells[1], Cell::Compared { value, .. } if value == 3.0));
    assert_eq!(table.rows[0].cells[2], Cell::Missing);
    assert_eq!(
        table.rows[1].cells,
        vec![Cell::Unsupported, Cell::Unsupported, Cell::Value(5.0)]
    );

    let text = render_table(&table, Style::new(false));
    assert!(text.contains("N/A"));
}
