//! Content-based fingerprints for calculation requests.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 over the JSON serialization of `value`, as lowercase hex.
///
/// Two requests with equal fingerprints would produce the same response, so the
/// session uses this to skip redundant system-curve fetches.
pub fn fingerprint<T: Serialize>(value: &T) -> String {
    let mut hasher = Sha256::new();

    let json = serde_json::to_string(value).unwrap_or_default();
    hasher.update(json.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
