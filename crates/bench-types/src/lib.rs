//! # bench-types
//!
//! Shared domain types for the query-bench harness.
//!
//! This crate defines the data structures passed between the engine,
//! storage and core crates:
//! - Version: parsed engine release strings and their ordering
//! - StatDigest: statistical summary of one benchmark run
//! - BenchmarkDefinition / Scenario: static suite definitions
//! - BaselineRecord: persisted per-version baseline documents
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use bench_types::Version;
//!
//! let v = Version::parse("4.12.2");
//! assert!(v.is_at_least(4, 11, 0));
//! ```

pub mod baseline;
pub mod config;
pub mod digest;
pub mod error;
pub mod suite;
pub mod version;

pub use baseline::{BaselineId, BaselineMetrics, BaselineRecord, MAX_QUERY_DISPLAY_LEN};
pub use config::{BaselineBackend, BaselineSettings, EngineSettings, Settings};
pub use digest::StatDigest;
pub use error::BenchError;
pub use suite::{BenchmarkDefinition, BenchmarkSuite, Scenario, ScenarioStep};
pub use version::Version;
