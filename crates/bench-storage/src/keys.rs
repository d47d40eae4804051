//! Key encoding and decoding for the baselines column family.
//!
//! Key format: `baseline:{hash}:{engine_version}`
//! - hash: fixed-length hex fingerprint, so it never contains `:`
//! - engine_version: raw release string, may contain anything
//!
//! All versions of one benchmark share the `baseline:{hash}:` prefix, which
//! makes "every version for this fingerprint" a prefix scan.

use crate::error::StorageError;

const PREFIX: &str = "baseline";

/// Key for a baseline record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineKey {
    pub hash: String,
    pub engine_version: String,
}

impl BaselineKey {
    pub fn new(hash: impl Into<String>, engine_version: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            engine_version: engine_version.into(),
        }
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{}:{}:{}", PREFIX, self.hash, self.engine_version).into_bytes()
    }

    /// Decode key from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Key(format!("Invalid UTF-8: {}", e)))?;

        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(PREFIX), Some(hash), Some(version)) if !hash.is_empty() => {
                Ok(Self::new(hash, version))
            }
            _ => Err(StorageError::Key(format!("Invalid baseline key format: {}", s))),
        }
    }

    /// Prefix shared by every version of one fingerprint
    pub fn hash_prefix(hash: &str) -> Vec<u8> {
        format!("{}:{}:", PREFIX, hash).into_bytes()
    }
}
