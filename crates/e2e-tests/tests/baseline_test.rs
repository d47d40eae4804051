//! Baseline creation and bulk transfer E2E tests.

use std::io::Cursor;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use bench_core::{BaselineSummary, ScriptedPrompt, SilentProgress};
use bench_engine::MockEngine;
use bench_storage::{export_ndjson, import_ndjson, ImportSummary};
use bench_types::BenchmarkDefinition;
use e2e_tests::TestHarness;

fn suite(n: usize) -> Vec<BenchmarkDefinition> {
    (1..=n)
        .map(|i| BenchmarkDefinition::new(format!("q{}", i), format!("SELECT * FROM t{}", i)))
        .collect()
}

/// "all" on the first conflict overwrites the next two without asking.
#[tokio::test]
async fn test_overwrite_all_is_sticky() {
    let harness = TestHarness::new();
    let defs = suite(3);
    for def in &defs {
        harness.seed(def, "4.12.2", Some(500.0));
    }
    let mut prompt = ScriptedPrompt::new(["all"]);

    let summary = harness
        .orchestrator(Arc::new(MockEngine::new("4.12.2")))
        .create_baselines(&defs, 1, &mut prompt, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(prompt.questions().len(), 1);
    assert_eq!(
        summary,
        BaselineSummary {
            created: 0,
            overwritten: 3,
            skipped: 0,
            unsupported: 0
        }
    );
}

/// "none" skips every remaining conflict and leaves records untouched.
#[tokio::test]
async fn test_overwrite_none_is_sticky() {
    let harness = TestHarness::new();
    let defs = suite(3);
    for def in &defs {
        harness.seed(def, "4.12.2", Some(500.0));
    }
    let engine = Arc::new(MockEngine::new("4.12.2"));
    let mut prompt = ScriptedPrompt::new(["none"]);

    let summary = harness
        .orchestrator(engine.clone())
        .create_baselines(&defs, 1, &mut prompt, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(prompt.questions().len(), 1);
    assert_eq!(summary.skipped, 3);
    assert!(engine.statements().is_empty());
    for def in &defs {
        assert_eq!(harness.stored(def, "4.12.2").unwrap().digest().mean, 500.0);
    }
}

/// "no" then "yes" asks twice and applies each answer to one conflict.
#[tokio::test]
async fn test_yes_and_no_are_one_shot() {
    let harness = TestHarness::new();
    let defs = suite(3);
    for def in &defs[..2] {
        harness.seed(def, "4.12.2", Some(500.0));
    }
    let mut prompt = ScriptedPrompt::new(["no", "yes"]);

    let summary = harness
        .orchestrator(Arc::new(MockEngine::new("4.12.2")))
        .create_baselines(&defs, 1, &mut prompt, &SilentProgress)
        .await
        .unwrap();

    assert_eq!(prompt.questions().len(), 2);
    assert_eq!(
        summary,
        BaselineSummary {
            created: 1,
            overwritten: 1,
            skipped: 1,
            unsupported: 0
        }
    );
    assert_eq!(harness.stored(&defs[0], "4.12.2").unwrap().digest().mean, 500.0);
    assert!(harness.stored(&defs[1], "4.12.2").unwrap().digest().mean < 500.0);
}

/// Nine valid lines and one malformed line import as 9 successes, 1 error.
#[tokio::test]
async fn test_import_counts_malformed_line() {
    let source = TestHarness::new();
    for (i, def) in suite(9).iter().enumerate() {
        source.seed(def, &format!("4.{}.0", i), Some(2.0));
    }
    let mut buffer = Vec::new();
    let exported = export_ndjson(source.storage.as_ref(), &mut buffer)
        .await
        .unwrap();
    assert_eq!(exported, 9);

    let mut text = String::from_utf8(buffer).unwrap();
    text.push_str("{\"_id\": {\"hash\": \"abc\"}, \"metrics\": \n");

    let target = TestHarness::new();
    let summary = import_ndjson(target.storage.as_ref(), Cursor::new(text))
        .await
        .unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            success_count: 9,
            error_count: 1
        }
    );
    assert_eq!(target.storage.stats().unwrap().baseline_count, 9);
}
