//! Core types for playback control

use crate::volume::{Volume, DEFAULT_VOLUME};
use serde::{Deserialize, Serialize};
use signal_core::TrackId;

/// Transport phase, derived from the controller's state after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportPhase {
    /// Nothing loaded yet
    Idle,

    /// Waiting for the backend to report metadata for a new source
    Loading,

    /// Playback requested and running
    Playing,

    /// Source loaded, playback not requested
    Paused,

    /// Playback requested but the backend is starved
    Buffering,

    /// Last operation failed; cleared by the next play request
    Errored,
}

/// Snapshot of controller state for presentation layers
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Whether the listener wants audio playing
    pub is_playback_requested: bool,

    /// Whether playback is requested but stalled
    pub is_buffering: bool,

    /// Listener volume
    pub volume: Volume,

    /// User-facing message for the last failure
    pub last_error: Option<String>,

    /// Track currently loaded (or loading) in the backend
    pub active_track_id: Option<TrackId>,

    /// Derived transport phase
    pub phase: TransportPhase,
}

impl PlaybackState {
    pub(crate) fn new(volume: Volume) -> Self {
        Self {
            is_playback_requested: false,
            is_buffering: false,
            volume,
            last_error: None,
            active_track_id: None,
            phase: TransportPhase::Idle,
        }
    }
}

/// Controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Same-track drift tolerated before forcing a seek (seconds)
    pub max_resync_drift_seconds: f64,

    /// Distance kept from the end of media when seeking (seconds)
    pub end_of_media_guard_seconds: f64,

    /// Volume applied when the controller is created
    pub initial_volume: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_resync_drift_seconds: 1.25,
            end_of_media_guard_seconds: 0.25,
            initial_volume: DEFAULT_VOLUME,
        }
    }
}
