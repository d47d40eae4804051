//! RocksDB-backed baseline storage.
//!
//! Provides:
//! - Database open with column family setup
//! - Point reads by (hash, version) and prefix scans by hash
//! - Overwriting writes (last write wins per key)

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, DB};
use tracing::{debug, info, warn};

use bench_types::BaselineRecord;

use crate::column_families::{build_cf_descriptors, CF_BASELINES};
use crate::error::StorageError;
use crate::keys::BaselineKey;
use crate::store::BaselineStore;

/// Local baseline storage
pub struct Storage {
    db: DB,
}

/// Summary counts for the baseline column family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub baseline_count: usize,
    pub fingerprint_count: usize,
}

impl Storage {
    /// Open storage at the given path, creating if necessary
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        info!("Opening baseline storage at {:?}", path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        let db = DB::open_cf_descriptors(&db_opts, path, build_cf_descriptors())?;
        Ok(Self { db })
    }

    fn baselines_cf(&self) -> Result<&rocksdb::ColumnFamily, StorageError> {
        self.db
            .cf_handle(CF_BASELINES)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(CF_BASELINES.to_string()))
    }

    /// Store a baseline, overwriting any record for the same (hash, version)
    pub fn put_baseline(&self, record: &BaselineRecord) -> Result<(), StorageError> {
        let cf = self.baselines_cf()?;
        let key = BaselineKey::new(&record.id.hash, &record.id.engine_version);
        let bytes = serde_json::to_vec(record)?;
        self.db.put_cf(cf, key.to_bytes(), bytes)?;
        debug!(
            hash = %record.id.hash,
            version = %record.id.engine_version,
            "Stored baseline"
        );
        Ok(())
    }

    /// Get the baseline for one fingerprint on one version
    pub fn get_baseline(
        &self,
        hash: &str,
        engine_version: &str,
    ) -> Result<Option<BaselineRecord>, StorageError> {
        let cf = self.baselines_cf()?;
        let key = BaselineKey::new(hash, engine_version);
        match self.db.get_cf(cf, key.to_bytes())? {
            Some(bytes) => Ok(decode_record(&key.to_bytes(), &bytes)),
            None => Ok(None),
        }
    }

    /// Get every stored version of one fingerprint
    pub fn get_baselines(&self, hash: &str) -> Result<Vec<BaselineRecord>, StorageError> {
        let cf = self.baselines_cf()?;
        let prefix = BaselineKey::hash_prefix(hash);
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        let mut results = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            if let Some(record) = decode_record(&key, &value) {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Get every stored baseline
    pub fn all_baselines(&self) -> Result<Vec<BaselineRecord>, StorageError> {
        let cf = self.baselines_cf()?;
        let mut results = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item?;
            if let Some(record) = decode_record(&key, &value) {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Count stored baselines and distinct fingerprints
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let cf = self.baselines_cf()?;
        let mut stats = StorageStats::default();
        let mut hashes = HashSet::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _) = item?;
            let key = BaselineKey::from_bytes(&key)?;
            stats.baseline_count += 1;
            hashes.insert(key.hash);
        }
        stats.fingerprint_count = hashes.len();
        Ok(stats)
    }
}

/// Decode a stored document, skipping (and logging) anything malformed.
fn decode_record(key: &[u8], bytes: &[u8]) -> Option<BaselineRecord> {
    match serde_json::from_slice::<BaselineRecord>(bytes) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(
                key = %String::from_utf8_lossy(key),
                error = %e,
                "Skipping malformed baseline document"
            );
            None
        }
    }
}

#[async_trait]
impl BaselineStore for Storage {
    async fn get(
        &self,
        fingerprint: &str,
        engine_version: &str,
    ) -> Result<Option<BaselineRecord>, StorageError> {
        self.get_baseline(fingerprint, engine_version)
    }

    async fn get_all(&self, fingerprint: &str) -> Result<Vec<BaselineRecord>, StorageError> {
        self.get_baselines(fingerprint)
    }

    async fn upsert(&self, record: &BaselineRecord) -> Result<(), StorageError> {
        self.put_baseline(record)
    }

    async fn list(&self) -> Result<Vec<BaselineRecord>, StorageError> {
        self.all_baselines()
    }
}
