//! Configuration loading for query-bench.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/query-bench/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::BenchError;

/// Query engine connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Base URL of the engine's HTTP API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token (usually supplied via QBENCH_ENGINE__API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Engine release string used to key baselines
    #[serde(default = "default_engine_version")]
    pub version: String,

    /// Per-request timeout; absent means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_engine_version() -> String {
    "unknown".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            version: default_engine_version(),
            timeout_secs: None,
        }
    }
}

/// Where baselines are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BaselineBackend {
    /// A document collection inside the query engine (default)
    #[default]
    Engine,
    /// A local RocksDB instance
    Local,
}

/// Baseline persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSettings {
    #[serde(default)]
    pub backend: BaselineBackend,

    /// Collection name for the engine backend
    #[serde(default = "default_collection")]
    pub collection: String,

    /// RocksDB directory for the local backend
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_collection() -> String {
    "benchmark_baselines".to_string()
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", "query-bench")
        .map(|p| p.data_local_dir().join("baselines"))
        .unwrap_or_else(|| PathBuf::from("./baselines"))
        .to_string_lossy()
        .to_string()
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self {
            backend: BaselineBackend::default(),
            collection: default_collection(),
            db_path: default_db_path(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Benchmark suite file
    #[serde(default = "default_suite_path")]
    pub suite_path: String,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub baselines: BaselineSettings,

    /// Ask before printing more than this many ad-hoc query results
    #[serde(default = "default_print_confirm_threshold")]
    pub print_confirm_threshold: usize,

    /// Colour classified diffs with ANSI escapes
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_suite_path() -> String {
    "benchmarks.toml".to_string()
}

fn default_print_confirm_threshold() -> usize {
    50
}

fn default_color() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            suite_path: default_suite_path(),
            engine: EngineSettings::default(),
            baselines: BaselineSettings::default(),
            print_confirm_threshold: default_print_confirm_threshold(),
            color: default_color(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/query-bench/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (QBENCH_*, `__` between nested keys)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, BenchError> {
        let config_dir = ProjectDirs::from("", "", "query-bench")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("log_level", default_log_level())
            .map_err(|e| BenchError::Config(e.to_string()))?
            .set_default("suite_path", default_suite_path())
            .map_err(|e| BenchError::Config(e.to_string()))?
            .set_default("engine.endpoint", default_endpoint())
            .map_err(|e| BenchError::Config(e.to_string()))?
            .set_default("engine.version", default_engine_version())
            .map_err(|e| BenchError::Config(e.to_string()))?
            .set_default("baselines.collection", default_collection())
            .map_err(|e| BenchError::Config(e.to_string()))?
            .set_default("baselines.db_path", default_db_path())
            .map_err(|e| BenchError::Config(e.to_string()))?
            .set_default(
                "print_confirm_threshold",
                default_print_confirm_threshold() as i64,
            )
            .map_err(|e| BenchError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: QBENCH_LOG_LEVEL, QBENCH_ENGINE__ENDPOINT, QBENCH_BASELINES__BACKEND, etc.
        builder = builder.add_source(
            Environment::with_prefix("QBENCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| BenchError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| BenchError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.engine.endpoint.trim().is_empty() {
            return Err(BenchError::Config("engine.endpoint must not be empty".into()));
        }
        if self.baselines.collection.trim().is_empty() {
            return Err(BenchError::Config(
                "baselines.collection must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Expand ~ in db_path to the home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        let path = &self.baselines.db_path;
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }
}
