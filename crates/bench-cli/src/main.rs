//! query-bench
//!
//! Interactive benchmarking shell that tracks query performance across
//! engine releases.
//!
//! # Usage
//!
//! ```bash
//! query-bench [repl]
//! query-bench exec ".benchmark_all 10"
//! query-bench baselines import seed.ndjson
//! query-bench baselines export backup.ndjson
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/query-bench/config.toml)
//! 3. `--config` file
//! 4. Environment variables (QBENCH_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;

use bench_cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
