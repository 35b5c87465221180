//! Station clock: broadcast start + playlist → snapshots over time

use crate::error::Result;
use crate::resolver::resolve;
use crate::snapshot::PlaylistClockSnapshot;
use signal_core::{BroadcastStart, BroadcastStartSource, Playlist, SourceError, SyncSource, SyncTarget};
use std::time::Duration;
use tracing::{info, warn};

/// Cadence at which hosts should re-resolve and hand a new target to the
/// playback controller
pub const CLOCK_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Current wall time in epoch milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A playlist bound to (possibly missing) broadcast start
///
/// Without a broadcast start there is no snapshot at all: the station is
/// "off air", and the controller downstream stays idle. The last source
/// failure is kept as a user-facing message.
#[derive(Debug, Clone)]
pub struct StationClock {
    playlist: Playlist,
    broadcast_start: Option<BroadcastStart>,
    source: SyncSource,
    error_message: Option<String>,
    last_fetch_at_ms: Option<i64>,
}

impl StationClock {
    /// An off-air clock with no broadcast start yet
    pub fn new(playlist: Playlist) -> Self {
        Self {
            playlist,
            broadcast_start: None,
            source: SyncSource::Unconfigured,
            error_message: None,
            last_fetch_at_ms: None,
        }
    }

    /// A clock with a known broadcast start
    pub fn with_broadcast_start(
        playlist: Playlist,
        broadcast_start: BroadcastStart,
        source: SyncSource,
    ) -> Self {
        Self {
            playlist,
            broadcast_start: Some(broadcast_start),
            source,
            error_message: None,
            last_fetch_at_ms: Some(now_ms()),
        }
    }

    /// Build a clock by fetching the broadcast start once
    ///
    /// Source failures never fail the call; they leave the clock off air with
    /// an error message.
    pub async fn connect(playlist: Playlist, source: &dyn BroadcastStartSource) -> Self {
        let mut clock = Self::new(playlist);
        clock.refresh(source).await;
        clock
    }

    /// Re-fetch the broadcast start from `source`
    pub async fn refresh(&mut self, source: &dyn BroadcastStartSource) {
        match source.fetch().await {
            Ok(start) => {
                info!("Broadcast start {} ({} source)", start, source.kind());
                self.broadcast_start = Some(start);
                self.source = source.kind();
                self.error_message = None;
                self.last_fetch_at_ms = Some(now_ms());
            }
            Err(e) => {
                warn!("Broadcast start unavailable: {}", e);
                self.mark_unavailable(&e);
            }
        }
    }

    /// Drop the broadcast start and record why
    pub fn mark_unavailable(&mut self, error: &SourceError) {
        self.broadcast_start = None;
        self.source = SyncSource::Unconfigured;
        self.error_message = Some(error.to_string());
    }

    /// Resolve the snapshot at `now_ms`; `None` while off air
    pub fn snapshot_at(&self, now_ms: i64) -> Result<Option<PlaylistClockSnapshot>> {
        match self.broadcast_start {
            Some(start) => resolve(start.as_millis(), now_ms, self.playlist.tracks()).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve the snapshot at the current wall time
    pub fn snapshot_now(&self) -> Result<Option<PlaylistClockSnapshot>> {
        self.snapshot_at(now_ms())
    }

    /// Controller target at `now_ms`; `None` while off air
    pub fn sync_target_at(&self, now_ms: i64) -> Result<Option<SyncTarget>> {
        Ok(self.snapshot_at(now_ms)?.map(|snapshot| snapshot.sync_target()))
    }

    /// Whether a broadcast start is known
    pub fn is_live(&self) -> bool {
        self.broadcast_start.is_some()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn broadcast_start(&self) -> Option<BroadcastStart> {
        self.broadcast_start
    }

    pub fn sync_source(&self) -> SyncSource {
        self.source
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn last_fetch_at_ms(&self) -> Option<i64> {
        self.last_fetch_at_ms
    }
}
