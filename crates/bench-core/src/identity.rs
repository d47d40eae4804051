//! Stable benchmark identity.

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 16;

/// Fingerprint a benchmark by its setup queries and measured query.
///
/// The material is the pre-queries followed by the query, joined with `|`.
/// Post-queries are cleanup and do not contribute.
pub fn fingerprint(pre_queries: &[String], query: &str) -> String {
    let mut parts: Vec<&str> = pre_queries.iter().map(String::as_str).collect();
    parts.push(query);
    let digest = Sha256::digest(parts.join("|").as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
