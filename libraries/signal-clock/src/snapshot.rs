use crate::presentation::format_clock;
use serde::{Deserialize, Serialize};
use signal_core::{SyncTarget, Track};

/// Where the broadcast is at one instant
///
/// Recomputed on every resolve; never mutated, only replaced. This is the
/// only data a presentation layer needs for the current-track title,
/// elapsed/remaining time and progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistClockSnapshot {
    /// Track on air
    pub active_track: Track,

    /// Position of `active_track` in the playlist
    pub track_index: usize,

    /// Seconds into the active track, in `[0, duration)`
    pub track_offset_seconds: f64,

    /// Seconds into the current loop, in `[0, total)`
    pub playlist_elapsed_seconds: f64,

    /// Length of one loop
    pub total_playlist_duration_seconds: f64,

    /// Broadcast start this snapshot was resolved against
    pub broadcast_start_ms: i64,

    /// Wall time this snapshot was resolved at
    pub observed_at_ms: i64,
}

impl PlaylistClockSnapshot {
    /// The part of the snapshot the playback controller consumes
    pub fn sync_target(&self) -> SyncTarget {
        SyncTarget {
            track_id: self.active_track.id.clone(),
            source_locator: self.active_track.src_url.clone(),
            offset_seconds: self.track_offset_seconds,
        }
    }

    /// Fraction of the active track already played, clamped to `[0, 1]`
    pub fn progress_ratio(&self) -> f64 {
        let duration = self.active_track.duration_seconds;
        if duration > 0.0 {
            (self.track_offset_seconds / duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Seconds until the next track starts
    pub fn remaining_seconds(&self) -> f64 {
        (self.active_track.duration_seconds - self.track_offset_seconds).max(0.0)
    }

    /// Elapsed time in the active track as `mm:ss`
    pub fn offset_label(&self) -> String {
        format_clock(self.track_offset_seconds)
    }

    /// Active track length as `mm:ss`
    pub fn duration_label(&self) -> String {
        format_clock(self.active_track.duration_seconds)
    }
}
