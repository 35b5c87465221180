/// ID types for Signal Radio entities
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Track identifier
///
/// Stable across the process lifetime; the playback controller compares
/// these to tell a track change from a resync.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

static NEXT_BACKEND_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one audio backend instance
///
/// Visualizer graphs are keyed by this value instead of by the backend
/// object itself, so the registry never owns or outlives a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(u64);

impl BackendId {
    /// Allocate a process-unique backend ID
    pub fn allocate() -> Self {
        Self(NEXT_BACKEND_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a raw value (hosts that manage their own numbering)
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backend-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_id_from_string() {
        let id = TrackId::new("track-123");
        assert_eq!(id.as_str(), "track-123");
        assert_eq!(format!("{}", id), "track-123");
    }

    #[test]
    fn backend_ids_are_unique() {
        let first = BackendId::allocate();
        let second = BackendId::allocate();
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn track_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&TrackId::new("a")).unwrap();
        assert_eq!(json, "\"a\"");
    }
}
