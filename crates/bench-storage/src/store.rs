//! The baseline store contract.

use async_trait::async_trait;

use bench_types::BaselineRecord;

use crate::error::StorageError;

/// Keyed collection of baseline records, one per (fingerprint, version).
///
/// Every call round-trips to the backing store; there is no cache.
/// Absence is a normal outcome: `get` returns `Ok(None)` and `get_all`
/// returns an empty list, including when the backing collection has never
/// been created.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// The record for one fingerprint on one engine version.
    async fn get(
        &self,
        fingerprint: &str,
        engine_version: &str,
    ) -> Result<Option<BaselineRecord>, StorageError>;

    /// Every stored version of one fingerprint.
    async fn get_all(&self, fingerprint: &str) -> Result<Vec<BaselineRecord>, StorageError>;

    /// Insert or overwrite the record keyed by its (hash, version).
    async fn upsert(&self, record: &BaselineRecord) -> Result<(), StorageError>;

    /// Every stored record, for export.
    async fn list(&self) -> Result<Vec<BaselineRecord>, StorageError>;
}
