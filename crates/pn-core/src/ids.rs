use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a pipe segment.
///
/// - generated once when the segment is created, never changed afterwards
/// - unique across the whole topology (every region, every branch)
/// - never reused after the segment is removed
///
/// Results computed by the external service refer back to segments through
/// this value, so it serializes as a bare string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    /// Mint a fresh identity (random v4 UUID).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an identity that already exists (loaded scenario, service response).
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({})", self.0)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SegmentId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for SegmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<SegmentId> = (0..1_000).map(|_| SegmentId::generate()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = SegmentId::new("seg-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"seg-1\"");
        let back: SegmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
