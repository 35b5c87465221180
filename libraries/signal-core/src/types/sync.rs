use super::TrackId;
use serde::{Deserialize, Serialize};

/// What the playback controller should be playing right now
///
/// Recomputed about once per second from the station clock and handed to the
/// controller as a fresh value each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncTarget {
    /// Track that is on air
    pub track_id: TrackId,

    /// Locator to load into the backend
    pub source_locator: String,

    /// Position within the track, in seconds
    pub offset_seconds: f64,
}

impl SyncTarget {
    /// Create a new sync target
    pub fn new(
        track_id: impl Into<String>,
        source_locator: impl Into<String>,
        offset_seconds: f64,
    ) -> Self {
        Self {
            track_id: TrackId::new(track_id),
            source_locator: source_locator.into(),
            offset_seconds,
        }
    }
}
