//! Column family definitions for RocksDB.
//!
//! - baselines: one JSON baseline document per (hash, engine version)

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for baseline records
pub const CF_BASELINES: &str = "baselines";

/// Baselines are small and rewritten rarely; compress for space
fn baselines_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![ColumnFamilyDescriptor::new(CF_BASELINES, baselines_options())]
}
