//! Startup and top-level command implementations.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use bench_core::Style;
use bench_engine::{HttpEngine, QueryEngine};
use bench_storage::{export_ndjson, import_ndjson, BaselineStore, EngineBaselineStore, Storage};
use bench_types::{BaselineBackend, BenchmarkSuite, Settings};

use crate::cli::{BaselineCommands, Cli, Commands};
use crate::session::{Session, StdinPrompt};

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        settings.engine.endpoint = endpoint.clone();
    }
    if let Some(version) = &cli.engine_version {
        settings.engine.version = version.clone();
    }
    if let Some(suite) = &cli.suite {
        settings.suite_path = suite.clone();
    }
    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Open the configured baseline backend.
pub fn open_store(
    settings: &Settings,
    engine: Arc<dyn QueryEngine>,
) -> Result<Arc<dyn BaselineStore>> {
    match settings.baselines.backend {
        BaselineBackend::Engine => Ok(Arc::new(EngineBaselineStore::new(
            engine,
            settings.baselines.collection.clone(),
        ))),
        BaselineBackend::Local => {
            let db_path = settings.expanded_db_path();
            fs::create_dir_all(&db_path).context("Failed to create baseline directory")?;
            let storage = Storage::open(&db_path).context("Failed to open baseline storage")?;
            Ok(Arc::new(storage))
        }
    }
}

/// Load the suite file. A missing file gives an empty suite so ad-hoc
/// commands still work.
pub fn load_suite(path: &str) -> Result<BenchmarkSuite> {
    if !Path::new(path).exists() {
        warn!(path, "Suite file not found, starting with no benchmarks");
        return Ok(BenchmarkSuite::default());
    }
    BenchmarkSuite::load(Path::new(path)).with_context(|| format!("Failed to load suite {}", path))
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;

    info!(
        endpoint = %settings.engine.endpoint,
        version = %settings.engine.version,
        backend = ?settings.baselines.backend,
        "Starting query-bench"
    );

    let engine: Arc<dyn QueryEngine> =
        Arc::new(HttpEngine::new(&settings.engine).context("Failed to create engine client")?);
    let store = open_store(&settings, engine.clone())?;

    match cli.command {
        Some(Commands::Baselines { command }) => handle_baselines(store.as_ref(), command).await,
        Some(Commands::Exec { line }) => {
            let mut session = build_session(&settings, engine, store)?;
            session.execute(&line).await?;
            Ok(())
        }
        Some(Commands::Repl) | None => {
            let mut session = build_session(&settings, engine, store)?;
            session.run_repl().await
        }
    }
}

fn build_session(
    settings: &Settings,
    engine: Arc<dyn QueryEngine>,
    store: Arc<dyn BaselineStore>,
) -> Result<Session<std::io::Stdout>> {
    let suite = load_suite(&settings.suite_path)?;
    Ok(Session::new(
        suite,
        engine,
        store,
        Box::new(StdinPrompt::new()),
        std::io::stdout(),
    )
    .with_style(Style::new(settings.color))
    .with_confirm_threshold(settings.print_confirm_threshold))
}

pub async fn handle_baselines(store: &dyn BaselineStore, command: BaselineCommands) -> Result<()> {
    match command {
        BaselineCommands::Import { path } => {
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path))?;
            let summary = import_ndjson(store, BufReader::new(file)).await?;
            println!(
                "Imported {} baselines ({} errors)",
                summary.success_count, summary.error_count
            );
        }
        BaselineCommands::Export { path } => {
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path))?;
            let count = export_ndjson(store, BufWriter::new(file)).await?;
            println!("Exported {} baselines to {}", count, path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_load_suite_missing_file_is_empty() {
        let suite = load_suite("/nonexistent/benchmarks.toml").unwrap();
        assert!(suite.benchmarks.is_empty());
    }

    #[test]
    fn test_load_suite_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[[benchmark]]\nname = 1\n").unwrap();
        assert!(load_suite(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        fs::write(&config, "[engine]\nendpoint = \"http://file:1\"\nversion = \"4.0.0\"\n").unwrap();

        let cli = Cli::parse_from([
            "query-bench",
            "--config",
            config.to_str().unwrap(),
            "--engine-version",
            "4.12.2",
        ]);
        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.engine.endpoint, "http://file:1");
        assert_eq!(settings.engine.version, "4.12.2");
    }

    #[tokio::test]
    async fn test_local_store_and_baseline_subcommands() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.baselines.backend = BaselineBackend::Local;
        settings.baselines.db_path = temp.path().join("db").to_string_lossy().into_owned();

        let engine: Arc<dyn QueryEngine> = Arc::new(bench_engine::MockEngine::new("4.12.2"));
        let store = open_store(&settings, engine).unwrap();

        let export = temp.path().join("out.ndjson");
        handle_baselines(
            store.as_ref(),
            BaselineCommands::Export {
                path: export.to_string_lossy().into_owned(),
            },
        )
        .await
        .unwrap();
        assert_eq!(fs::read_to_string(&export).unwrap(), "");

        let missing = BaselineCommands::Import {
            path: temp.path().join("missing.ndjson").to_string_lossy().into_owned(),
        };
        assert!(handle_baselines(store.as_ref(), missing).await.is_err());
    }
}
