//! Shell session state and command dispatch.
//!
//! Everything a command handler needs lives on [`Session`]; nothing is
//! kept in globals.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, Lines, Stdin};
use tracing::debug;

use bench_core::{
    render_report, render_run, render_scenario, render_summary, render_table, BaselineOrchestrator,
    CoreError, OverwriteChoice, ProgressSink, Prompt, ScenarioRunner, Style, VersionTable,
};
use bench_engine::plan::explain;
use bench_engine::QueryEngine;
use bench_storage::{export_ndjson, import_ndjson, BaselineStore};
use bench_types::{BenchmarkDefinition, BenchmarkSuite};

use crate::command::{Command, HELP};

pub const PROMPT: &str = "query-bench> ";

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Reads answers from stdin, printing each question to stdout first.
pub struct StdinPrompt {
    lines: Lines<tokio::io::BufReader<Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: tokio::io::BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> Result<String, CoreError> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", question).map_err(|e| CoreError::Prompt(e.to_string()))?;
        stdout.flush().map_err(|e| CoreError::Prompt(e.to_string()))?;
        match self.lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(CoreError::Prompt("input closed".to_string())),
            Err(e) => Err(CoreError::Prompt(e.to_string())),
        }
    }
}

/// Progress lines on stderr.
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn on_progress(&self, label: &str, completed: usize, total: usize) {
        eprintln!("  {}: {}/{}", label, completed, total);
    }
}

pub struct Session<W: Write> {
    suite: BenchmarkSuite,
    engine: Arc<dyn QueryEngine>,
    orchestrator: BaselineOrchestrator,
    input: Box<dyn Prompt>,
    progress: Box<dyn ProgressSink>,
    out: W,
    style: Style,
    confirm_threshold: usize,
}

impl<W: Write> Session<W> {
    pub fn new(
        suite: BenchmarkSuite,
        engine: Arc<dyn QueryEngine>,
        store: Arc<dyn BaselineStore>,
        input: Box<dyn Prompt>,
        out: W,
    ) -> Self {
        let orchestrator = BaselineOrchestrator::new(engine.clone(), store);
        Self {
            suite,
            engine,
            orchestrator,
            input,
            progress: Box::new(StderrProgress),
            out,
            style: Style::default(),
            confirm_threshold: 50,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Ad-hoc results above this count ask before printing.
    pub fn with_confirm_threshold(mut self, threshold: usize) -> Self {
        self.confirm_threshold = threshold;
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Read commands until `.exit` or end of input.
    ///
    /// This is the top-level handler: a failing command prints its error
    /// and the prompt returns.
    pub async fn run_repl(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "query-bench on engine {} ({} benchmarks). Type .help for commands.",
            self.orchestrator.version(),
            self.suite.benchmarks.len()
        )?;

        loop {
            let line = match self.input.ask(PROMPT).await {
                Ok(line) => line,
                Err(e) => {
                    debug!(error = %e, "Input ended");
                    break;
                }
            };
            match self.execute(&line).await {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(self.out, "Error: {:#}", e)?,
            }
        }
        Ok(())
    }

    /// Parse and run one shell line.
    pub async fn execute(&mut self, line: &str) -> Result<Flow> {
        let command = Command::parse(line)?;
        debug!(?command, "Executing");

        match command {
            Command::Empty => {}
            Command::Exit => return Ok(Flow::Exit),
            Command::Help => write!(self.out, "{}", HELP)?,
            Command::Query(query) => self.run_query(&query).await?,
            Command::Bench { query, runs } => {
                let run = self
                    .orchestrator
                    .bench(&query, runs, self.progress.as_ref())
                    .await;
                write!(self.out, "{}", render_run(&format!("Query: {}", query), &run))?;
            }
            Command::Benchmark { target, runs } => {
                let definition = self.suite.find_benchmark(&target)?.clone();
                let report = self
                    .orchestrator
                    .report(&definition, runs, self.progress.as_ref())
                    .await?;
                write!(self.out, "{}", render_report(&report, self.style))?;
            }
            Command::BenchmarkAll { runs } => {
                let reports = self
                    .orchestrator
                    .report_all(&self.suite.benchmarks, runs, self.progress.as_ref())
                    .await?;
                for report in &reports {
                    write!(self.out, "{}", render_report(report, self.style))?;
                }
                let table = VersionTable::from_reports(self.orchestrator.version(), &reports);
                writeln!(self.out)?;
                write!(self.out, "{}", render_table(&table, self.style))?;
            }
            Command::BenchmarkBaseline { target, runs } => {
                let definitions: Vec<BenchmarkDefinition> = match target {
                    Some(target) => vec![self.suite.find_benchmark(&target)?.clone()],
                    None => self.suite.benchmarks.clone(),
                };
                let summary = self
                    .orchestrator
                    .create_baselines(
                        &definitions,
                        runs,
                        self.input.as_mut(),
                        self.progress.as_ref(),
                    )
                    .await?;
                write!(self.out, "{}", render_summary(&summary))?;
            }
            Command::BenchmarkShow => {
                let table = self.orchestrator.saved_table(&self.suite.benchmarks).await?;
                write!(self.out, "{}", render_table(&table, self.style))?;
            }
            Command::Benchmarks => self.list_benchmarks()?,
            Command::Scenario { name } => {
                let scenario = self.suite.find_scenario(&name)?;
                let report = ScenarioRunner::new(self.engine.clone()).run(scenario).await;
                write!(self.out, "{}", render_scenario(&report))?;
            }
            Command::Explain { query } => {
                let usage = explain(self.engine.as_ref(), &query).await?;
                writeln!(self.out, "Index usage: {}", usage)?;
            }
            Command::BaselineImport { path } => {
                let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
                let summary =
                    import_ndjson(self.orchestrator.store().as_ref(), BufReader::new(file)).await?;
                writeln!(
                    self.out,
                    "Imported {} baselines ({} errors)",
                    summary.success_count, summary.error_count
                )?;
            }
            Command::BaselineExport { path } => {
                let file =
                    File::create(&path).with_context(|| format!("Failed to create {}", path))?;
                let count =
                    export_ndjson(self.orchestrator.store().as_ref(), BufWriter::new(file)).await?;
                writeln!(self.out, "Exported {} baselines to {}", count, path)?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn run_query(&mut self, query: &str) -> Result<()> {
        let started = Instant::now();
        let result = self.engine.execute(query, None).await?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let mut print = true;
        if result.len() > self.confirm_threshold {
            let answer = self
                .input
                .ask(&format!("Print {} results? [y/N] ", result.len()))
                .await?;
            print = OverwriteChoice::parse(&answer) == OverwriteChoice::Yes;
        }
        if print {
            for item in &result.items {
                writeln!(self.out, "{}", serde_json::to_string(item)?)?;
            }
        }
        writeln!(self.out, "{} results in {:.2}ms", result.len(), elapsed_ms)?;
        Ok(())
    }

    fn list_benchmarks(&mut self) -> Result<()> {
        if self.suite.benchmarks.is_empty() {
            writeln!(self.out, "No benchmarks configured.")?;
            return Ok(());
        }
        for (i, definition) in self.suite.benchmarks.iter().enumerate() {
            let hash = bench_core::fingerprint(&definition.pre_queries, &definition.query);
            writeln!(
                self.out,
                "{:>3}. {} [{}] {}",
                i + 1,
                definition.name,
                hash,
                definition.query
            )?;
        }
        Ok(())
    }
}
