//! CLI argument parsing for query-bench.
//!
//! Flags override every other configuration source.

use clap::{Parser, Subcommand};

/// Query benchmarking shell with cross-version baselines
#[derive(Parser, Debug)]
#[command(name = "query-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/query-bench/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Engine HTTP endpoint
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Engine release string used to key baselines
    #[arg(long, global = true)]
    pub engine_version: Option<String>,

    /// Benchmark suite file
    #[arg(short, long, global = true)]
    pub suite: Option<String>,

    /// Defaults to the interactive shell
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell
    Repl,

    /// Run a single shell command and exit
    Exec {
        /// e.g. ".benchmark_all 10"
        line: String,
    },

    /// Bulk baseline transfer
    Baselines {
        #[command(subcommand)]
        command: BaselineCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum BaselineCommands {
    /// Import baselines from an NDJSON file
    Import { path: String },
    /// Export all baselines to an NDJSON file
    Export { path: String },
}
