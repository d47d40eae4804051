//! NDJSON bulk transfer of baselines.
//!
//! One `BaselineRecord` document per line. Import upserts each record, so
//! re-importing the same file is idempotent. A malformed or rejected line is
//! counted and skipped; the rest of the file is still processed.

use std::io::{BufRead, ErrorKind, Write};

use tracing::{info, warn};

use bench_types::BaselineRecord;

use crate::error::StorageError;
use crate::store::BaselineStore;

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub success_count: usize,
    pub error_count: usize,
}

/// Import baselines from an NDJSON reader.
pub async fn import_ndjson<R: BufRead>(
    store: &dyn BaselineStore,
    reader: R,
) -> Result<ImportSummary, StorageError> {
    let mut summary = ImportSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(line = line_number, error = %e, "Unreadable baseline line");
                summary.error_count += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let record: BaselineRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_number, error = %e, "Malformed baseline line");
                summary.error_count += 1;
                continue;
            }
        };

        match store.upsert(&record).await {
            Ok(()) => summary.success_count += 1,
            Err(e) => {
                warn!(line = line_number, error = %e, "Failed to store baseline");
                summary.error_count += 1;
            }
        }
    }

    info!(
        success = summary.success_count,
        errors = summary.error_count,
        "Baseline import finished"
    );
    Ok(summary)
}

/// Export every stored baseline as NDJSON. Returns the record count.
pub async fn export_ndjson<W: Write>(
    store: &dyn BaselineStore,
    mut writer: W,
) -> Result<usize, StorageError> {
    let records = store.list().await?;
    for record in &records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Storage;
    use bench_types::StatDigest;
    use chrono::Utc;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn line(version: &str) -> String {
        let digest = StatDigest {
            mean: 2.0,
            median: 2.0,
            min: 1.0,
            max: 3.0,
            std_dev: 0.5,
            p95: 3.0,
            p99: 3.0,
            result_count: 4,
            runs: 5,
        };
        let record =
            BaselineRecord::new("SELECT 1", "0123456789abcdef", version, digest, Utc::now());
        serde_json::to_string(&record).unwrap()
    }

    #[tokio::test]
    async fn test_import_skips_malformed_line() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::open(temp.path()).unwrap();

        let mut lines: Vec<String> = (0..9).map(|i| line(&format!("4.{}.0", i))).collect();
        lines.insert(4, "{\"_id\": {\"hash\": truncated".to_string());
        let input = lines.join("\n");

        let summary = import_ndjson(&storage, Cursor::new(input)).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                success_count: 9,
                error_count: 1
            }
        );
        assert_eq!(storage.stats().unwrap().baseline_count, 9);
    }

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let storage = Storage::open(temp.path()).unwrap();
        let input = format!("{}\n\n{}\n", line("4.12.1"), line("4.12.2"));

        import_ndjson(&storage, Cursor::new(input.clone())).await.unwrap();
        let second = import_ndjson(&storage, Cursor::new(input)).await.unwrap();

        assert_eq!(second.success_count, 2);
        assert_eq!(storage.stats().unwrap().baseline_count, 2);
    }

    #[tokio::test]
    async fn test_export_then_import_elsewhere() {
        let source_dir = TempDir::new().unwrap();
        let source = Storage::open(source_dir.path()).unwrap();
        import_ndjson(&source, Cursor::new(format!("{}\n{}", line("4.11.0"), line("4.12.0"))))
            .await
            .unwrap();

        let mut buffer = Vec::new();
        let exported = export_ndjson(&source, &mut buffer).await.unwrap();
        assert_eq!(exported, 2);
        assert_eq!(String::from_utf8(buffer.clone()).unwrap().lines().count(), 2);

        let target_dir = TempDir::new().unwrap();
        let target = Storage::open(target_dir.path()).unwrap();
        let summary = import_ndjson(&target, Cursor::new(buffer)).await.unwrap();
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.error_count, 0);
    }
}
