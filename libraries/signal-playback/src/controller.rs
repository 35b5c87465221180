//! Playback controller
//!
//! Owns one audio backend and keeps it aligned with the broadcast clock. All
//! entry points run on the host's single event loop: `apply_target` on every
//! clock tick, `toggle_playback`/`set_volume` from the listener, and
//! `handle_event` for backend notifications.

use crate::backend::{AudioBackend, BackendEvent};
use crate::error::{PlaybackError, MEDIA_LOAD_ERROR_MESSAGE};
use crate::events::PlaybackEvent;
use crate::machine::{on_load_failed, on_metadata_ready, on_new_target, Effect, SyncMachine};
use crate::types::{ControllerConfig, PlaybackState, TransportPhase};
use crate::volume::Volume;
use signal_core::{SyncTarget, TrackId};
use tracing::{debug, info, warn};

/// Drives an [`AudioBackend`] toward the targets it is given
pub struct PlaybackController<B: AudioBackend> {
    backend: B,
    config: ControllerConfig,
    machine: SyncMachine,
    state: PlaybackState,

    /// Most recent target; playback requests before the first one only
    /// record intent
    last_target: Option<SyncTarget>,

    pending_events: Vec<PlaybackEvent>,
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Create a controller with default tuning
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ControllerConfig::default())
    }

    /// Create a controller and apply the configured initial volume
    pub fn with_config(mut backend: B, config: ControllerConfig) -> Self {
        let volume = Volume::new(config.initial_volume);
        backend.set_volume(volume.level());

        Self {
            backend,
            config,
            machine: SyncMachine::default(),
            state: PlaybackState::new(volume),
            last_target: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Sync =====

    /// Follow a newly resolved target; `None` is ignored
    pub fn apply_target(&mut self, target: Option<&SyncTarget>) {
        let Some(target) = target else {
            return;
        };

        self.last_target = Some(target.clone());
        self.follow(target);
        self.refresh_phase();
    }

    fn follow(&mut self, target: &SyncTarget) {
        let probe = self.backend.probe();
        let machine = std::mem::take(&mut self.machine);
        let (machine, effects) = on_new_target(machine, target, &probe, &self.config);
        self.machine = machine;

        self.execute(effects);
    }

    /// Forward a backend notification
    pub fn handle_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::MetadataLoaded { track_id } => self.continue_load(&track_id),
            BackendEvent::Playing | BackendEvent::Pause | BackendEvent::CanPlay => {
                self.state.is_buffering = false;
            }
            BackendEvent::Waiting => {
                if self.state.is_playback_requested {
                    self.state.is_buffering = true;
                }
            }
            BackendEvent::Error => {
                warn!("Audio backend reported a media error");
                self.fail_load();
            }
            BackendEvent::PlayRejected { reason } => {
                if self.state.is_playback_requested {
                    self.reject(PlaybackError::rejected(reason));
                } else {
                    debug!("Ignoring late play rejection after pause: {}", reason);
                }
            }
        }

        self.refresh_phase();
    }

    fn continue_load(&mut self, track_id: &TrackId) {
        let probe = self.backend.probe();
        let machine = std::mem::take(&mut self.machine);
        let (machine, effects) = on_metadata_ready(
            machine,
            track_id,
            &probe,
            self.state.is_playback_requested,
            &self.config,
        );
        self.machine = machine;

        if effects.is_empty() {
            debug!("Ignoring metadata for superseded load of {}", track_id);
        } else if self.state.last_error.as_deref() == Some(MEDIA_LOAD_ERROR_MESSAGE) {
            // The source loaded after all
            self.state.last_error = None;
        }
        self.execute(effects);
    }

    /// Forget the failed source so the next target or a listener retry
    /// reloads it
    fn fail_load(&mut self) {
        let machine = std::mem::take(&mut self.machine);
        self.machine = on_load_failed(machine);
        self.state.is_buffering = false;
        self.record_error(PlaybackError::media_load().to_string());
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Load {
                    track_id,
                    source_locator,
                } => {
                    info!("Loading track {} from {}", track_id, source_locator);
                    let previous_track_id = self.state.active_track_id.replace(track_id.clone());

                    let loaded = self.backend.load(&track_id, &source_locator);
                    if previous_track_id.as_ref() != Some(&track_id) {
                        self.pending_events.push(PlaybackEvent::TrackChanged {
                            track_id,
                            previous_track_id,
                        });
                    }

                    if let Err(e) = loaded {
                        warn!("Failed to load {}: {}", source_locator, e);
                        self.fail_load();
                    }
                }
                Effect::Seek { position_seconds } => {
                    let from_seconds = self.backend.current_time();
                    self.backend.set_current_time(position_seconds);
                    debug!("Seek {:.2}s -> {:.2}s", from_seconds, position_seconds);

                    if let Some(track_id) = self.state.active_track_id.clone() {
                        self.pending_events.push(PlaybackEvent::Resynced {
                            track_id,
                            from_seconds,
                            to_seconds: position_seconds,
                        });
                    }
                }
                Effect::Play => self.start_playback(),
            }
        }
    }

    // ===== Listener Controls =====

    /// Flip the listener's playback intent
    ///
    /// Turning playback off pauses immediately. Turning it on clears any
    /// previous error and, once a target exists, asks the backend to play.
    /// A source that failed to load is reloaded instead, and a load still in
    /// flight resumes from its metadata continuation. A rejected request
    /// turns the intent back off and is never retried automatically.
    pub fn toggle_playback(&mut self) {
        if self.state.is_playback_requested {
            debug!("Playback intent off");
            self.state.is_playback_requested = false;
            self.state.is_buffering = false;
            self.backend.pause();
        } else {
            debug!("Playback intent on");
            self.state.is_playback_requested = true;
            self.state.last_error = None;

            if let Some(target) = self.last_target.clone() {
                if self.machine.loaded_track().is_none() {
                    debug!("Retrying load of {}", target.track_id);
                    self.follow(&target);
                } else if self.machine.is_loading() {
                    debug!("Resume deferred until metadata arrives");
                } else {
                    self.start_playback();
                }
            }
        }

        self.refresh_phase();
    }

    /// Set listener volume, clamped to `[0.0, 1.0]`
    pub fn set_volume(&mut self, level: f32) {
        let volume = Volume::new(level);
        self.backend.set_volume(volume.level());

        if volume != self.state.volume {
            self.state.volume = volume;
            self.pending_events.push(PlaybackEvent::VolumeChanged {
                level: volume.level(),
            });
        }
    }

    fn start_playback(&mut self) {
        self.state.last_error = None;
        self.state.is_buffering = true;

        if let Err(e) = self.backend.play() {
            self.reject(e);
        }
    }

    fn reject(&mut self, error: PlaybackError) {
        let error = match error {
            PlaybackError::PlaybackRejected(reason) => PlaybackError::rejected(reason),
            other => other,
        };
        warn!("Playback rejected: {}", error);

        self.state.is_playback_requested = false;
        self.state.is_buffering = false;
        self.record_error(error.to_string());
    }

    fn record_error(&mut self, message: String) {
        self.state.last_error = Some(message.clone());
        self.pending_events.push(PlaybackEvent::Error { message });
    }

    // ===== State =====

    fn derive_phase(&self) -> TransportPhase {
        if self.state.last_error.is_some() {
            TransportPhase::Errored
        } else if self.state.active_track_id.is_none() {
            TransportPhase::Idle
        } else if self.machine.is_loading() {
            TransportPhase::Loading
        } else if !self.state.is_playback_requested {
            TransportPhase::Paused
        } else if self.state.is_buffering {
            TransportPhase::Buffering
        } else {
            TransportPhase::Playing
        }
    }

    fn refresh_phase(&mut self) {
        let phase = self.derive_phase();
        if phase != self.state.phase {
            debug!("Phase {:?} -> {:?}", self.state.phase, phase);
            self.pending_events.push(PlaybackEvent::PhaseChanged {
                from: self.state.phase,
                to: phase,
            });
            self.state.phase = phase;
        }
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> TransportPhase {
        self.state.phase
    }

    pub fn is_playback_requested(&self) -> bool {
        self.state.is_playback_requested
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Current sync bookkeeping
    pub fn machine(&self) -> &SyncMachine {
        &self.machine
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access for hosts that pump it (e.g. advancing a
    /// headless clock)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}
