//! # bench-core
//!
//! Benchmark execution and cross-version baseline comparison.
//!
//! A run flows through the pieces in this order:
//! 1. [`BenchmarkRunner`] times repetitions of a query
//! 2. [`summarize`] reduces the samples to a [`StatDigest`](bench_types::StatDigest)
//! 3. [`fingerprint`] identifies the benchmark across releases
//! 4. [`select_comparisons`] picks stored versions to compare against
//! 5. [`classify`] grades each change
//! 6. the `render_*` functions format the result
//!
//! [`BaselineOrchestrator`] ties these to a [`BaselineStore`](bench_storage::BaselineStore).

pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod policy;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod selector;
pub mod significance;
pub mod stats;
pub mod table;

pub use error::CoreError;
pub use identity::fingerprint;
pub use orchestrator::{
    BaselineOrchestrator, BaselineSummary, BenchmarkReport, Comparison, CurrentBaseline,
};
pub use policy::{OverwriteChoice, OverwritePolicy, Prompt, ScriptedPrompt};
pub use report::{
    render_report, render_run, render_scenario, render_summary, render_table, Style,
};
pub use runner::{BenchmarkRun, BenchmarkRunner, ProgressSink, SilentProgress};
pub use scenario::{CheckOutcome, ScenarioReport, ScenarioRunner};
pub use selector::{select_comparisons, ComparisonKind, SelectedBaseline};
pub use significance::{classify, Classification, DiffMode, Significance};
pub use stats::summarize;
pub use table::{Cell, TableRow, VersionTable};
