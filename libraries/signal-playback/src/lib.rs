//! Signal Radio - Playback Continuity
//!
//! Keeps a local audio backend aligned with the shared broadcast clock.
//!
//! This crate provides:
//! - `PlaybackController`, the single owner of an audio backend
//! - Pure sync transitions (`on_new_target`, `on_metadata_ready`) that decide
//!   between a track change and a drift-tolerant resync
//! - Listener intent (play/pause), buffering and error state
//! - Volume clamping
//!
//! # Architecture
//!
//! `signal-playback` knows nothing about where targets come from or how audio
//! is produced. Hosts resolve a `SyncTarget` from the station clock, hand it
//! to the controller, forward backend notifications, and drain
//! `PlaybackEvent`s for display.
//!
//! # Example
//!
//! ```rust
//! use signal_core::{BackendId, SyncTarget, TrackId};
//! use signal_playback::{AudioBackend, BackendEvent, PlaybackController, Result, TransportPhase};
//!
//! #[derive(Default)]
//! struct SilentBackend {
//!     position: f64,
//!     ready: bool,
//!     volume: f32,
//! }
//!
//! impl AudioBackend for SilentBackend {
//!     fn id(&self) -> BackendId { BackendId::from_raw(1) }
//!     fn load(&mut self, _: &TrackId, _: &str) -> Result<()> { self.ready = false; Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 { self.position }
//!     fn set_current_time(&mut self, seconds: f64) { self.position = seconds; }
//!     fn duration(&self) -> Option<f64> { Some(180.0) }
//!     fn is_metadata_ready(&self) -> bool { self.ready }
//!     fn volume(&self) -> f32 { self.volume }
//!     fn set_volume(&mut self, volume: f32) { self.volume = volume; }
//! }
//!
//! let mut controller = PlaybackController::new(SilentBackend::default());
//! controller.toggle_playback();
//!
//! let target = SyncTarget::new("intro", "https://cdn.example.com/intro.mp3", 42.0);
//! controller.apply_target(Some(&target));
//! assert_eq!(controller.phase(), TransportPhase::Loading);
//!
//! controller.backend_mut().ready = true;
//! controller.handle_event(BackendEvent::MetadataLoaded { track_id: TrackId::from("intro") });
//! controller.handle_event(BackendEvent::Playing);
//!
//! assert_eq!(controller.backend().current_time(), 42.0);
//! assert_eq!(controller.phase(), TransportPhase::Playing);
//! ```

#![forbid(unsafe_code)]

pub mod backend;
pub mod controller;
pub mod error;
pub mod events;
pub mod machine;
pub mod types;
pub mod volume;

// Re-export main types
pub use backend::{AudioBackend, BackendEvent, BackendProbe};
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result, MEDIA_LOAD_ERROR_MESSAGE, PLAYBACK_REJECTED_FALLBACK};
pub use events::PlaybackEvent;
pub use machine::{
    clamp_offset_to_duration, on_load_failed, on_metadata_ready, on_new_target, Effect, PendingLoad,
    SyncMachine,
};
pub use types::{ControllerConfig, PlaybackState, TransportPhase};
pub use volume::{Volume, DEFAULT_VOLUME};
