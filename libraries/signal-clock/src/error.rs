//! Error types for clock resolution

use signal_core::TrackId;
use thiserror::Error;

/// Resolver input contract violations
///
/// These are precondition failures: the calling operation should abort
/// rather than fall back to a guessed position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockError {
    /// Playlist has no tracks
    #[error("Playlist must contain at least one track")]
    InvalidPlaylist,

    /// A track has a zero, negative or non-finite duration
    #[error("Track \"{track_id}\" must have a positive durationSeconds value (got {duration_seconds})")]
    InvalidDuration {
        track_id: TrackId,
        duration_seconds: f64,
    },
}

/// Result type for clock operations
pub type Result<T> = std::result::Result<T, ClockError>;
