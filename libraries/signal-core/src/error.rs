//! Core error types for Signal Radio

use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Playlist and catalog errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Playlist has no tracks
    #[error("Playlist must contain at least one track")]
    EmptyPlaylist,

    /// Track duration is zero, negative or not finite
    #[error("Track \"{id}\" must have a positive durationSeconds value (got {duration_seconds})")]
    InvalidDuration {
        id: TrackId,
        duration_seconds: f64,
    },

    /// Two tracks share an id
    #[error("Duplicate track id: {0}")]
    DuplicateTrack(TrackId),

    /// Catalog JSON could not be parsed
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broadcast-start source errors
///
/// Every variant means "no snapshot": the station has no broadcast start and
/// the playback controller stays idle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No source is configured
    #[error("Broadcast start is not configured")]
    Unconfigured,

    /// The raw value has an unsupported shape
    #[error("broadcast_start_time is missing or invalid ({0}). Use a timestamp, seconds, or milliseconds.")]
    Unparseable(String),

    /// The source exists but could not be reached
    #[error("Broadcast start source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// Create an unparseable error from any displayable value
    pub fn unparseable(raw: impl std::fmt::Display) -> Self {
        Self::Unparseable(raw.to_string())
    }
}
