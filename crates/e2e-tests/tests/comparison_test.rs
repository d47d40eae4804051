//! Cross-version comparison E2E tests.
//!
//! Seeds a baseline history, runs benchmarks on a newer engine and checks
//! selection, classification and the aligned batch table.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use bench_core::{
    render_report, render_table, Cell, ComparisonKind, Significance, SilentProgress, Style,
    VersionTable,
};
use bench_engine::MockEngine;
use e2e_tests::{movie_suite, TestHarness};

#[tokio::test]
async fn test_report_selects_patch_and_minor_history() {
    let harness = TestHarness::new();
    let suite = movie_suite();
    for version in ["4.12.2", "4.12.1", "4.12.0", "4.11.9", "4.11.5", "4.10.7"] {
        harness.seed(&suite[0], version, Some(200.0));
    }

    let orchestrator = harness.orchestrator(Arc::new(MockEngine::new("4.12.2")));
    let report = orchestrator
        .report(&suite[0], 3, &SilentProgress)
        .await
        .unwrap();

    let selected: Vec<(&str, ComparisonKind)> = report
        .comparisons
        .iter()
        .map(|c| (c.version.raw.as_str(), c.kind))
        .collect();
    assert_eq!(
        selected,
        vec![
            ("4.12.1", ComparisonKind::Patch),
            ("4.12.0", ComparisonKind::Patch),
            ("4.11.9", ComparisonKind::Minor),
            ("4.10.7", ComparisonKind::Minor),
        ]
    );
    assert!(report.current_baseline.is_some());
    // the mock answers far faster than the seeded 200ms
    assert!(report
        .comparisons
        .iter()
        .all(|c| c.classification.significance == Significance::Improvement));

    let text = render_report(&report, Style::new(false));
    assert!(text.contains("vs 4.12.1 (patch)"));
    assert!(text.contains("vs 4.10.7 (minor)"));
}

#[tokio::test]
async fn test_batch_table_columns_are_union_across_benchmarks() {
    let harness = TestHarness::new();
    let suite = movie_suite();
    harness.seed(&suite[0], "4.12.1", Some(1.0));
    harness.seed(&suite[1], "4.11.3", Some(1.0));

    let engine = Arc::new(MockEngine::new("4.12.2"));
    let orchestrator = harness.orchestrator(engine.clone());
    let reports = orchestrator
        .report_all(&suite, 2, &SilentProgress)
        .await
        .unwrap();

    let table = VersionTable::from_reports(orchestrator.version(), &reports);
    let columns: Vec<&str> = table.versions.iter().map(|v| v.raw.as_str()).collect();
    assert_eq!(columns, vec!["4.12.2", "4.12.1", "4.11.3"]);

    assert!(matches!(table.rows[0].cells[0], Cell::Value(_)));
    assert!(matches!(table.rows[0].cells[1], Cell::Compared { .. }));
    assert_eq!(table.rows[0].cells[2], Cell::Missing);
    assert_eq!(table.rows[1].cells[1], Cell::Missing);
    assert!(matches!(table.rows[1].cells[2], Cell::Compared { .. }));

    let text = render_table(&table, Style::new(false));
    assert_eq!(text.lines().count(), 4);

    // setup and cleanup ran once for the indexed benchmark
    assert_eq!(
        engine.call_count("CREATE INDEX IF NOT EXISTS idx_year ON movies (year)"),
        1
    );
    assert_eq!(engine.call_count("DROP INDEX IF EXISTS idx_year ON movies"), 1);
}

#[tokio::test]
async fn test_fingerprint_ignores_display_truncation() {
    let harness = TestHarness::new();
    let long_query = format!("SELECT * FROM movies WHERE title IN ({})", "'x', ".repeat(60));
    let definition = bench_types::BenchmarkDefinition::new("long", long_query.clone());
    harness.seed(&definition, "4.12.1", Some(1.0));

    let stored = harness.stored(&definition, "4.12.1").unwrap();
    assert_eq!(stored.id.query.chars().count(), 100);
    assert!(stored.id.query.ends_with("..."));
    assert_eq!(
        stored.id.hash,
        bench_core::fingerprint(&[], &long_query)
    );
}
