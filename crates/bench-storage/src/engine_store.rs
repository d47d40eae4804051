//! Baselines kept in a document collection of the query engine itself.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use bench_engine::{EngineError, QueryEngine, QueryResult};
use bench_types::BaselineRecord;

use crate::error::StorageError;
use crate::store::BaselineStore;

/// Baseline store backed by an engine collection.
///
/// Documents use the `BaselineRecord` shape with a composite `_id`.
/// A collection that does not exist yet reads as empty.
pub struct EngineBaselineStore {
    engine: Arc<dyn QueryEngine>,
    collection: String,
}

impl EngineBaselineStore {
    pub fn new(engine: Arc<dyn QueryEngine>, collection: impl Into<String>) -> Self {
        Self {
            engine,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run a read, treating a missing collection as zero rows.
    async fn select(
        &self,
        statement: &str,
        params: Option<&Value>,
    ) -> Result<Vec<BaselineRecord>, StorageError> {
        let result = match self.engine.execute(statement, params).await {
            Ok(result) => result,
            Err(EngineError::CollectionNotFound(message)) => {
                debug!(collection = %self.collection, %message, "Baseline collection not created yet");
                QueryResult::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(decode_items(result.items))
    }
}

/// Validate documents at the boundary; malformed ones are skipped.
fn decode_items(items: Vec<Value>) -> Vec<BaselineRecord> {
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for item in items {
        match serde_json::from_value::<BaselineRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                debug!(error = %e, "Malformed baseline document");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, "Skipped malformed baseline documents");
    }
    records
}

#[async_trait]
impl BaselineStore for EngineBaselineStore {
    async fn get(
        &self,
        fingerprint: &str,
        engine_version: &str,
    ) -> Result<Option<BaselineRecord>, StorageError> {
        let statement = format!(
            "SELECT * FROM {} WHERE _id.hash = :hash AND _id.ditto_version = :version",
            self.collection
        );
        let params = json!({ "hash": fingerprint, "version": engine_version });
        let records = self.select(&statement, Some(&params)).await?;
        Ok(records.into_iter().next())
    }

    async fn get_all(&self, fingerprint: &str) -> Result<Vec<BaselineRecord>, StorageError> {
        let statement = format!("SELECT * FROM {} WHERE _id.hash = :hash", self.collection);
        let params = json!({ "hash": fingerprint });
        self.select(&statement, Some(&params)).await
    }

    async fn upsert(&self, record: &BaselineRecord) -> Result<(), StorageError> {
        let statement = format!(
            "INSERT INTO {} DOCUMENTS (:doc) ON ID CONFLICT DO UPDATE",
            self.collection
        );
        let params = json!({ "doc": serde_json::to_value(record)? });
        self.engine.execute(&statement, Some(&params)).await?;
        debug!(
            hash = %record.id.hash,
            version = %record.id.engine_version,
            "Upserted baseline"
        );
        Ok(())
    }

    async fn list(&self) -> Result<Vec<BaselineRecord>, StorageError> {
        let statement = format!("SELECT * FROM {}", self.collection);
        self.select(&statement, None).await
    }
}
