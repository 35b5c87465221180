//! Audio backend abstraction
//!
//! The controller drives exactly one backend: a browser media element, a
//! native decoder, or the headless clock used by the station binary. The
//! backend reports asynchronous progress back as [`BackendEvent`]s, which the
//! host forwards to [`PlaybackController::handle_event`].
//!
//! [`PlaybackController::handle_event`]: crate::PlaybackController::handle_event

use crate::error::Result;
use signal_core::{BackendId, TrackId};

/// Platform audio output with a seekable transport
pub trait AudioBackend {
    /// Stable identity, used to key per-backend resources such as analysers
    fn id(&self) -> BackendId;

    /// Replace the current source and start loading it
    ///
    /// Completion is reported later with [`BackendEvent::MetadataLoaded`]
    /// carrying the same `track_id`.
    fn load(&mut self, track_id: &TrackId, source_locator: &str) -> Result<()>;

    /// Start or resume playback
    ///
    /// # Errors
    /// `PlaybackRejected` when the platform refuses to start (for example a
    /// user-gesture policy). Backends that only learn about rejection later
    /// report [`BackendEvent::PlayRejected`] instead.
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move the playhead
    fn set_current_time(&mut self, seconds: f64);

    /// Source duration, if known and finite
    fn duration(&self) -> Option<f64>;

    /// Whether metadata for the current source is available
    fn is_metadata_ready(&self) -> bool;

    /// Current output volume
    fn volume(&self) -> f32;

    /// Apply output volume in `[0.0, 1.0]`
    fn set_volume(&mut self, volume: f32);

    /// Read the observables the sync machine decides on
    fn probe(&self) -> BackendProbe {
        BackendProbe {
            current_time: self.current_time(),
            duration: self.duration(),
            metadata_ready: self.is_metadata_ready(),
        }
    }
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn id(&self) -> BackendId {
        (**self).id()
    }

    fn load(&mut self, track_id: &TrackId, source_locator: &str) -> Result<()> {
        (**self).load(track_id, source_locator)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        (**self).set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn is_metadata_ready(&self) -> bool {
        (**self).is_metadata_ready()
    }

    fn volume(&self) -> f32 {
        (**self).volume()
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume);
    }
}

/// Point-in-time view of backend observables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendProbe {
    /// Playhead position in seconds
    pub current_time: f64,

    /// Source duration when known
    pub duration: Option<f64>,

    /// Whether seeking is meaningful yet
    pub metadata_ready: bool,
}

/// Asynchronous notifications from the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Metadata for a previously requested load is available
    MetadataLoaded { track_id: TrackId },

    /// Audio is flowing
    Playing,

    /// Playback paused
    Pause,

    /// Playback stalled waiting for data
    Waiting,

    /// Enough data buffered to play
    CanPlay,

    /// Source failed to load or decode
    Error,

    /// A deferred `play()` was refused
    PlayRejected { reason: String },
}
