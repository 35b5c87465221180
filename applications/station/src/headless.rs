//! Headless audio backend
//!
//! Simulates a media element without producing sound: loads complete on the
//! next poll, the playhead advances with host time while playing, and a
//! per-track tone is synthesized for the spectrum analyser.

use signal_core::{BackendId, Playlist, TrackId};
use signal_playback::{AudioBackend, BackendEvent, Result};
use std::collections::{HashMap, VecDeque};
use std::f32::consts::PI;
use std::time::Duration;

/// Notional sample rate of the synthesized tone
pub const SYNTH_SAMPLE_RATE: u32 = 22_050;

const SYNTH_AMPLITUDE: f32 = 0.05;

#[derive(Debug)]
struct LoadedSource {
    track_id: TrackId,
    tone_hz: f32,
}

/// Audio backend driven entirely by the host's clock
#[derive(Debug)]
pub struct HeadlessBackend {
    id: BackendId,
    durations: HashMap<String, f64>,
    loaded: Option<LoadedSource>,
    position: f64,
    duration: Option<f64>,
    playing: bool,
    metadata_ready: bool,
    volume: f32,
    outbox: VecDeque<BackendEvent>,
}

impl HeadlessBackend {
    /// A backend that knows the duration of every playlist source
    pub fn from_playlist(playlist: &Playlist) -> Self {
        let durations = playlist
            .tracks()
            .iter()
            .map(|track| (track.src_url.clone(), track.duration_seconds))
            .collect();

        Self {
            id: BackendId::allocate(),
            durations,
            loaded: None,
            position: 0.0,
            duration: None,
            playing: false,
            metadata_ready: false,
            volume: 1.0,
            outbox: VecDeque::new(),
        }
    }

    /// Next pending notification
    ///
    /// Delivering `MetadataLoaded` is what makes metadata ready, mirroring a
    /// media element that finishes loading between host callbacks.
    pub fn poll_event(&mut self) -> Option<BackendEvent> {
        let event = self.outbox.pop_front()?;
        if matches!(event, BackendEvent::MetadataLoaded { .. }) {
            self.metadata_ready = true;
        }
        Some(event)
    }

    /// Move the playhead forward by host time
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing || !self.metadata_ready {
            return;
        }

        self.position += elapsed.as_secs_f64();

        if let Some(duration) = self.duration {
            if self.position >= duration {
                self.position = duration;
                self.playing = false;
                self.outbox.push_back(BackendEvent::Pause);
            }
        }
    }

    /// Synthesize `frames` mono samples starting at the playhead
    ///
    /// Silence unless playing.
    pub fn render_pcm(&self, frames: usize) -> Vec<f32> {
        let Some(source) = self.loaded.as_ref().filter(|_| self.playing) else {
            return vec![0.0; frames];
        };

        let amplitude = SYNTH_AMPLITUDE * self.volume;
        let rate = SYNTH_SAMPLE_RATE as f64;
        (0..frames)
            .map(|frame| {
                let t = self.position + frame as f64 / rate;
                let phase = (t * f64::from(source.tone_hz)).fract() as f32;
                amplitude * (2.0 * PI * phase).sin()
            })
            .collect()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.loaded.as_ref().map(|source| &source.track_id)
    }
}

/// Stable tone per source so each track has its own spectrum
fn tone_for(source_locator: &str) -> f32 {
    let hash = source_locator
        .bytes()
        .fold(0u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(u32::from(byte)));
    220.0 + (hash % 24) as f32 * 110.0
}

impl AudioBackend for HeadlessBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn load(&mut self, track_id: &TrackId, source_locator: &str) -> Result<()> {
        self.position = 0.0;
        self.playing = false;
        self.metadata_ready = false;
        self.duration = self.durations.get(source_locator).copied();
        self.loaded = Some(LoadedSource {
            track_id: track_id.clone(),
            tone_hz: tone_for(source_locator),
        });

        // A new source discards notifications from the old one
        self.outbox.clear();
        if self.duration.is_some() {
            self.outbox.push_back(BackendEvent::MetadataLoaded {
                track_id: track_id.clone(),
            });
        } else {
            self.outbox.push_back(BackendEvent::Error);
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.playing = true;
        self.outbox.push_back(BackendEvent::Playing);
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.outbox.push_back(BackendEvent::Pause);
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = match self.duration {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        };
    }

    fn duration(&self) -> Option<f64> {
        self.duration.filter(|_| self.metadata_ready)
    }

    fn is_metadata_ready(&self) -> bool {
        self.metadata_ready
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_core::Track;

    fn backend() -> HeadlessBackend {
        HeadlessBackend::from_playlist(&Playlist::new(vec![
            Track::new("a", "A", "https://cdn/a.mp3", 10.0),
            Track::new("b", "B", "https://cdn/b.mp3", 20.0),
        ]))
    }

    #[test]
    fn metadata_arrives_on_poll() {
        let mut backend = backend();
        backend.load(&TrackId::from("a"), "https://cdn/a.mp3").unwrap();

        assert!(!backend.is_metadata_ready());
        assert_eq!(backend.duration(), None);

        assert_eq!(
            backend.poll_event(),
            Some(BackendEvent::MetadataLoaded {
                track_id: TrackId::from("a")
            })
        );
        assert!(backend.is_metadata_ready());
        assert_eq!(backend.duration(), Some(10.0));
    }

    #[test]
    fn unknown_source_reports_error() {
        let mut backend = backend();
        backend.load(&TrackId::from("x"), "https://cdn/x.mp3").unwrap();
        assert_eq!(backend.poll_event(), Some(BackendEvent::Error));
    }

    #[test]
    fn playhead_advances_only_while_playing() {
        let mut backend = backend();
        backend.load(&TrackId::from("a"), "https://cdn/a.mp3").unwrap();
        backend.poll_event();

        backend.advance(Duration::from_secs(2));
        assert_eq!(backend.current_time(), 0.0);

        backend.play().unwrap();
        backend.advance(Duration::from_millis(1500));
        assert_eq!(backend.current_time(), 1.5);
    }

    #[test]
    fn end_of_media_pauses() {
        let mut backend = backend();
        backend.load(&TrackId::from("a"), "https://cdn/a.mp3").unwrap();
        backend.poll_event();
        backend.play().unwrap();
        backend.poll_event();

        backend.advance(Duration::from_secs(30));

        assert_eq!(backend.current_time(), 10.0);
        assert!(!backend.is_playing());
        assert_eq!(backend.poll_event(), Some(BackendEvent::Pause));
    }

    #[test]
    fn tone_is_silent_when_paused() {
        let mut backend = backend();
        backend.load(&TrackId::from("a"), "https://cdn/a.mp3").unwrap();
        backend.poll_event();

        assert!(backend.render_pcm(64).iter().all(|&s| s == 0.0));

        backend.play().unwrap();
        let pcm = backend.render_pcm(256);
        assert_eq!(pcm.len(), 256);
        assert!(pcm.iter().any(|&s| s != 0.0));
        assert!(pcm.iter().all(|s| s.abs() <= SYNTH_AMPLITUDE));
    }
}
