//! Shell command parsing.
//!
//! Lines starting with `.` are dot-commands; anything else is a query to
//! execute as-is.

use thiserror::Error;

/// Repetitions for `.bench`.
pub const ADHOC_RUNS: usize = 20;
/// Repetitions for `.benchmark` and `.benchmark_all`.
pub const BENCHMARK_RUNS: usize = 5;
/// Repetitions for `.benchmark_baseline`.
pub const BASELINE_RUNS: usize = 50;

pub const HELP: &str = "\
Commands:
  .bench [runs] <query>               time an ad-hoc query (default 20 runs)
  .benchmark <name|index> [runs]      run a suite benchmark against stored baselines (default 5)
  .benchmark_all [runs]               run every suite benchmark and print a version table (default 5)
  .benchmark_baseline [name|all] [runs]
                                      store baselines for the current engine version (default 50)
  .benchmark_show                     table of every stored baseline version
  .benchmarks                         list suite benchmarks
  .scenario <name>                    run a validation scenario
  .explain <query>                    show index usage for a query
  .baseline_import <path>             import baselines from NDJSON
  .baseline_export <path>             export baselines to NDJSON
  .help                               this text
  .exit                               leave the shell
Any other line is executed as a query.
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try .help)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid run count '{0}': expected a positive integer")]
    InvalidRuns(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bench { query: String, runs: usize },
    Benchmark { target: String, runs: usize },
    BenchmarkAll { runs: usize },
    /// `target: None` means every suite benchmark
    BenchmarkBaseline { target: Option<String>, runs: usize },
    BenchmarkShow,
    Benchmarks,
    Scenario { name: String },
    Explain { query: String },
    BaselineImport { path: String },
    BaselineExport { path: String },
    Help,
    Exit,
    Query(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        if !line.starts_with('.') {
            return Ok(Command::Query(line.to_string()));
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match name {
            ".bench" => parse_bench(rest),
            ".benchmark" => match args.as_slice() {
                [target] => Ok(Command::Benchmark {
                    target: target.to_string(),
                    runs: BENCHMARK_RUNS,
                }),
                [target, runs] => Ok(Command::Benchmark {
                    target: target.to_string(),
                    runs: parse_runs(runs)?,
                }),
                _ => Err(CommandError::Usage(".benchmark <name|index> [runs]")),
            },
            ".benchmark_all" => match args.as_slice() {
                [] => Ok(Command::BenchmarkAll {
                    runs: BENCHMARK_RUNS,
                }),
                [runs] => Ok(Command::BenchmarkAll {
                    runs: parse_runs(runs)?,
                }),
                _ => Err(CommandError::Usage(".benchmark_all [runs]")),
            },
            ".benchmark_baseline" => {
                let (target, runs) = match args.as_slice() {
                    [] => (None, BASELINE_RUNS),
                    [target] => (Some(*target), BASELINE_RUNS),
                    [target, runs] => (Some(*target), parse_runs(runs)?),
                    _ => return Err(CommandError::Usage(".benchmark_baseline [name|all] [runs]")),
                };
                Ok(Command::BenchmarkBaseline {
                    target: target.filter(|t| *t != "all").map(str::to_string),
                    runs,
                })
            }
            ".benchmark_show" => Ok(Command::BenchmarkShow),
            ".benchmarks" => Ok(Command::Benchmarks),
            ".scenario" => match args.as_slice() {
                [name] => Ok(Command::Scenario {
                    name: name.to_string(),
                }),
                _ => Err(CommandError::Usage(".scenario <name>")),
            },
            ".explain" if !rest.is_empty() => Ok(Command::Explain {
                query: rest.to_string(),
            }),
            ".explain" => Err(CommandError::Usage(".explain <query>")),
            ".baseline_import" if !rest.is_empty() => Ok(Command::BaselineImport {
                path: rest.to_string(),
            }),
            ".baseline_import" => Err(CommandError::Usage(".baseline_import <path>")),
            ".baseline_export" if !rest.is_empty() => Ok(Command::BaselineExport {
                path: rest.to_string(),
            }),
            ".baseline_export" => Err(CommandError::Usage(".baseline_export <path>")),
            ".help" => Ok(Command::Help),
            ".exit" | ".quit" => Ok(Command::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// `.bench [runs] <query>`: a leading integer is the run count.
fn parse_bench(rest: &str) -> Result<Command, CommandError> {
    let (runs, query) = match rest.split_once(char::is_whitespace) {
        Some((first, query)) if first.chars().all(|c| c.is_ascii_digit()) => {
            (parse_runs(first)?, query.trim())
        }
        _ => (ADHOC_RUNS, rest),
    };
    if query.is_empty() || query.chars().all(|c| c.is_ascii_digit()) {
        return Err(CommandError::Usage(".bench [runs] <query>"));
    }
    Ok(Command::Bench {
        query: query.to_string(),
        runs,
    })
}

fn parse_runs(text: &str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(runs) if runs > 0 => Ok(runs),
        _ => Err(CommandError::InvalidRuns(text.to_string())),
    }
}
