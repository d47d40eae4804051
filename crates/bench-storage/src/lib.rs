//! Baseline persistence for query-bench.
//!
//! Provides the [`BaselineStore`] contract and two backends:
//! - [`Storage`]: local RocksDB, one column family keyed by (hash, version)
//! - [`EngineBaselineStore`]: a document collection inside the query engine
//!
//! Plus NDJSON bulk import/export for moving baselines between environments.

pub mod column_families;
pub mod db;
pub mod engine_store;
pub mod error;
pub mod keys;
pub mod ndjson;
pub mod store;

pub use db::{Storage, StorageStats};
pub use engine_store::EngineBaselineStore;
pub use error::StorageError;
pub use keys::BaselineKey;
pub use ndjson::{export_ndjson, import_ndjson, ImportSummary};
pub use store::BaselineStore;
