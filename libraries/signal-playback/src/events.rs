//! Playback events
//!
//! Queued by the controller and drained by the host for UI updates and logs.

use crate::types::TransportPhase;
use serde::{Deserialize, Serialize};
use signal_core::TrackId;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Derived transport phase changed
    PhaseChanged {
        /// Previous phase
        from: TransportPhase,
        /// New phase
        to: TransportPhase,
    },

    /// A different track was loaded into the backend
    TrackChanged {
        /// ID of the new track
        track_id: TrackId,
        /// ID of the previously loaded track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Playhead was moved to follow the broadcast clock
    Resynced {
        /// Track the seek applies to
        track_id: TrackId,
        /// Playhead before the seek
        from_seconds: f64,
        /// Playhead after the seek
        to_seconds: f64,
    },

    /// Volume changed
    VolumeChanged {
        /// New level in `[0.0, 1.0]`
        level: f32,
    },

    /// A user-visible failure
    Error {
        /// Message suitable for display
        message: String,
    },
}
