//! Station event loop
//!
//! One owner for the clock, the playback controller and the spectrum
//! sampler. Two periodic tasks feed it: the clock tick re-resolves the
//! broadcast position and hands the target to the controller, the frame tick
//! advances the headless backend and samples its spectrum.

use crate::config::StationConfig;
use crate::error::Result;
use crate::headless::{HeadlessBackend, SYNTH_SAMPLE_RATE};
use signal_clock::{now_ms, PlaylistClockSnapshot, StationClock};
use signal_core::PeriodicTask;
use signal_playback::{AudioBackend, PlaybackController, PlaybackEvent, TransportPhase};
use signal_visualizer::{FftAnalysisProvider, Samples, SpectrumSampler};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const SPECTRUM_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render bar heights as a one-line block graph
pub fn spectrum_line(samples: &Samples) -> String {
    samples
        .iter()
        .map(|&value| {
            let level = (value.clamp(0.0, 1.0) * (SPECTRUM_GLYPHS.len() - 1) as f32).round();
            SPECTRUM_GLYPHS[level as usize]
        })
        .collect()
}

/// Status line for a snapshot
pub fn describe(snapshot: &PlaylistClockSnapshot) -> String {
    format!(
        "#{} {} {}/{} ({:.0}%)",
        snapshot.track_index + 1,
        snapshot.active_track.title,
        snapshot.offset_label(),
        snapshot.duration_label(),
        snapshot.progress_ratio() * 100.0
    )
}

pub struct StationRunner {
    clock: StationClock,
    controller: PlaybackController<HeadlessBackend>,
    sampler: SpectrumSampler<FftAnalysisProvider>,
    tick_interval: Duration,
    frame_interval: Duration,
}

impl StationRunner {
    pub fn new(clock: StationClock, config: &StationConfig) -> Self {
        let backend = HeadlessBackend::from_playlist(clock.playlist());
        let backend_id = backend.id();

        let mut controller = PlaybackController::with_config(backend, config.controller_config());
        if config.autoplay {
            controller.toggle_playback();
        }

        let mut sampler = SpectrumSampler::new(FftAnalysisProvider::default());
        sampler.bind(backend_id);

        Self {
            clock,
            controller,
            sampler,
            tick_interval: config.tick_interval(),
            frame_interval: config.frame_interval(),
        }
    }

    /// Re-resolve at `now_ms` and follow the result
    ///
    /// Off air leaves the controller untouched.
    pub fn on_clock_tick(&mut self, now_ms: i64) -> Result<Option<PlaylistClockSnapshot>> {
        let snapshot = self.clock.snapshot_at(now_ms)?;
        let target = snapshot.as_ref().map(PlaylistClockSnapshot::sync_target);

        self.controller.apply_target(target.as_ref());
        self.pump();

        Ok(snapshot)
    }

    /// Advance the backend by `elapsed` and sample one display frame
    pub fn on_frame(&mut self, elapsed: Duration, timestamp_ms: f64) -> Samples {
        self.controller.backend_mut().advance(elapsed);
        self.pump();

        let frames = (elapsed.as_secs_f64() * f64::from(SYNTH_SAMPLE_RATE)).ceil() as usize;
        let pcm = self.controller.backend().render_pcm(frames.max(1));
        self.sampler.observe_output(&pcm);

        let is_active = self.controller.phase() == TransportPhase::Playing;
        *self.sampler.on_frame(timestamp_ms, is_active)
    }

    /// Flip listener intent, as a play/pause button would
    pub fn toggle_playback(&mut self) {
        self.controller.toggle_playback();
        self.pump();
    }

    /// Deliver backend notifications and log controller events
    fn pump(&mut self) {
        while let Some(event) = self.controller.backend_mut().poll_event() {
            self.controller.handle_event(event);
        }

        for event in self.controller.drain_events() {
            match event {
                PlaybackEvent::TrackChanged { track_id, .. } => {
                    let title = self
                        .clock
                        .playlist()
                        .get(&track_id)
                        .map_or(track_id.as_str(), |track| track.title.as_str());
                    info!("Now playing: {}", title);
                }
                PlaybackEvent::Resynced {
                    from_seconds,
                    to_seconds,
                    ..
                } => debug!("Resynced {:.2}s -> {:.2}s", from_seconds, to_seconds),
                PlaybackEvent::PhaseChanged { to, .. } => debug!("Phase: {:?}", to),
                PlaybackEvent::VolumeChanged { level } => debug!("Volume: {:.2}", level),
                PlaybackEvent::Error { message } => warn!("{}", message),
            }
        }
    }

    /// Run until `shutdown` resolves
    ///
    /// Both periodic tasks are cancelled and the analysis graph released
    /// before returning.
    pub async fn run<F>(mut self, shutdown: F) -> Result<Self>
    where
        F: Future<Output = ()>,
    {
        let mut clock_tick = PeriodicTask::spawn("clock-tick", self.tick_interval);
        let mut frame_tick = PeriodicTask::spawn("frame-tick", self.frame_interval);
        tokio::pin!(shutdown);

        let started = Instant::now();
        let mut last_frame = started;
        let mut latest_samples: Option<Samples> = None;

        info!(
            "Station running ({} source, {} tracks)",
            self.clock.sync_source(),
            self.clock.playlist().len()
        );

        loop {
            tokio::select! {
                Some(_) = clock_tick.next_tick() => {
                    match self.on_clock_tick(now_ms())? {
                        Some(snapshot) => {
                            let spectrum = latest_samples.as_ref().map(spectrum_line).unwrap_or_default();
                            info!("{} {}", describe(&snapshot), spectrum);
                        }
                        None => warn!(
                            "Off air: {}",
                            self.clock.error_message().unwrap_or("no broadcast start configured")
                        ),
                    }
                }
                Some(tick) = frame_tick.next_tick() => {
                    let elapsed = tick.at.saturating_duration_since(last_frame);
                    last_frame = tick.at;
                    let timestamp_ms = tick.at.duration_since(started).as_secs_f64() * 1000.0;
                    latest_samples = Some(self.on_frame(elapsed, timestamp_ms));
                }
                () = &mut shutdown => {
                    info!("Shutting down station");
                    break;
                }
                else => break,
            }
        }

        clock_tick.cancel();
        frame_tick.cancel();
        self.release();
        Ok(self)
    }

    fn release(&mut self) {
        let backend_id = self.controller.backend().id();
        self.sampler.release(backend_id);
    }

    pub fn clock(&self) -> &StationClock {
        &self.clock
    }

    pub fn controller(&self) -> &PlaybackController<HeadlessBackend> {
        &self.controller
    }

    pub fn sampler(&self) -> &SpectrumSampler<FftAnalysisProvider> {
        &self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectrum_line_maps_levels() {
        let mut samples = [0.0; signal_visualizer::SAMPLE_COUNT];
        samples[0] = 1.0;
        samples[1] = 0.5;

        let line = spectrum_line(&samples);
        assert_eq!(line.chars().count(), 48);
        assert!(line.starts_with("█▅▁"));
    }
}
