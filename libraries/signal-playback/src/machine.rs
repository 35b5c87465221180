//! Sync decision logic
//!
//! Pure transition functions: given the machine, a new input and a probe of
//! the backend, they return the next machine and the effects to execute. The
//! controller owns the only machine and is the only caller that turns effects
//! into backend calls.
//!
//! Two paths exist for a new target:
//! - **Track change**: the target names a different track than the loaded
//!   one. Load it and remember the target offset until the backend reports
//!   metadata for that exact track.
//! - **Resync**: same track. Seek only when drift exceeds the tolerance.
//!
//! A media failure forgets the loaded source, so the next target for that
//! track goes down the track-change path again.

use crate::backend::BackendProbe;
use crate::types::ControllerConfig;
use signal_core::{SyncTarget, TrackId};

/// A load waiting for its metadata continuation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLoad {
    pub track_id: TrackId,
    pub source_locator: String,
    pub offset_seconds: f64,
}

/// What the controller believes is in the backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncMachine {
    loaded_track: Option<TrackId>,
    pending: Option<PendingLoad>,
}

impl SyncMachine {
    /// Track most recently handed to the backend
    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.loaded_track.as_ref()
    }

    /// Load still waiting for metadata
    pub fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }

    /// Whether a load is in flight
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

/// Backend call requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Replace the backend source
    Load {
        track_id: TrackId,
        source_locator: String,
    },

    /// Move the playhead (already clamped)
    Seek { position_seconds: f64 },

    /// Resume playback
    Play,
}

/// Transition for a freshly resolved target
///
/// A track change always wins over a resync and supersedes any in-flight
/// load. A same-track target that arrives while the load is still pending
/// refreshes the offset the continuation will seek to.
pub fn on_new_target(
    machine: SyncMachine,
    target: &SyncTarget,
    probe: &BackendProbe,
    config: &ControllerConfig,
) -> (SyncMachine, Vec<Effect>) {
    let is_track_change = machine.loaded_track.as_ref() != Some(&target.track_id);

    if is_track_change {
        let next = SyncMachine {
            loaded_track: Some(target.track_id.clone()),
            pending: Some(PendingLoad {
                track_id: target.track_id.clone(),
                source_locator: target.source_locator.clone(),
                offset_seconds: target.offset_seconds,
            }),
        };
        let effects = vec![Effect::Load {
            track_id: target.track_id.clone(),
            source_locator: target.source_locator.clone(),
        }];
        return (next, effects);
    }

    if let Some(pending) = machine.pending {
        let next = SyncMachine {
            loaded_track: machine.loaded_track,
            pending: Some(PendingLoad {
                offset_seconds: target.offset_seconds,
                ..pending
            }),
        };
        return (next, Vec::new());
    }

    if !probe.metadata_ready {
        return (machine, Vec::new());
    }

    let drift = (probe.current_time - target.offset_seconds).abs();
    if drift > config.max_resync_drift_seconds {
        let position_seconds = clamp_offset_to_duration(
            target.offset_seconds,
            probe.duration,
            config.end_of_media_guard_seconds,
        );
        return (machine, vec![Effect::Seek { position_seconds }]);
    }

    (machine, Vec::new())
}

/// Transition for a backend metadata notification
///
/// Only the pending load for `track_id` continues: seek to its offset and,
/// when playback is requested, resume. Notifications for superseded loads are
/// ignored. The pending entry is consumed, so each load resumes at most once.
pub fn on_metadata_ready(
    machine: SyncMachine,
    track_id: &TrackId,
    probe: &BackendProbe,
    playback_requested: bool,
    config: &ControllerConfig,
) -> (SyncMachine, Vec<Effect>) {
    let is_current = machine
        .pending
        .as_ref()
        .is_some_and(|pending| &pending.track_id == track_id);

    if !is_current {
        return (machine, Vec::new());
    }

    let SyncMachine {
        loaded_track,
        pending,
    } = machine;
    let offset_seconds = pending.map_or(0.0, |pending| pending.offset_seconds);

    let mut effects = vec![Effect::Seek {
        position_seconds: clamp_offset_to_duration(
            offset_seconds,
            probe.duration,
            config.end_of_media_guard_seconds,
        ),
    }];
    if playback_requested {
        effects.push(Effect::Play);
    }

    (
        SyncMachine {
            loaded_track,
            pending: None,
        },
        effects,
    )
}

/// Transition for a source the backend could not load or keep playing
///
/// Drops both the loaded track and any pending continuation. The next target,
/// even for the same track, reloads the source.
pub fn on_load_failed(_machine: SyncMachine) -> SyncMachine {
    SyncMachine::default()
}

/// Clamp a seek target into `[0, duration - guard]`
///
/// Unknown or non-positive durations only clamp the lower bound.
pub fn clamp_offset_to_duration(offset_seconds: f64, duration: Option<f64>, guard_seconds: f64) -> f64 {
    let floor = offset_seconds.max(0.0);

    match duration {
        Some(duration) if duration.is_finite() && duration > 0.0 => {
            floor.min((duration - guard_seconds).max(0.0))
        }
        _ => floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(track: &str, offset: f64) -> SyncTarget {
        SyncTarget::new(track, format!("https://cdn/{}.mp3", track), offset)
    }

    fn ready(current_time: f64, duration: f64) -> BackendProbe {
        BackendProbe {
            current_time,
            duration: Some(duration),
            metadata_ready: true,
        }
    }

    fn unloaded() -> BackendProbe {
        BackendProbe {
            current_time: 0.0,
            duration: None,
            metadata_ready: false,
        }
    }

    #[test]
    fn first_target_loads() {
        let config = ControllerConfig::default();
        let (machine, effects) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);

        assert_eq!(
            effects,
            vec![Effect::Load {
                track_id: TrackId::from("a"),
                source_locator: "https://cdn/a.mp3".into(),
            }]
        );
        assert_eq!(machine.loaded_track().map(TrackId::as_str), Some("a"));
        assert_eq!(machine.pending().map(|p| p.offset_seconds), Some(3.0));
    }

    #[test]
    fn metadata_seeks_then_plays_when_requested() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);

        let (machine, effects) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), true, &config);

        assert_eq!(effects, vec![Effect::Seek { position_seconds: 3.0 }, Effect::Play]);
        assert!(!machine.is_loading());
    }

    #[test]
    fn metadata_without_request_only_seeks() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);

        let (_, effects) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), false, &config);
        assert_eq!(effects, vec![Effect::Seek { position_seconds: 3.0 }]);
    }

    #[test]
    fn stale_metadata_is_ignored() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);
        let (machine, _) = on_new_target(machine, &target("b", 1.0), &unloaded(), &config);

        let (machine, effects) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), true, &config);
        assert!(effects.is_empty());
        assert_eq!(machine.pending().map(|p| p.track_id.as_str()), Some("b"));
    }

    #[test]
    fn metadata_continuation_runs_once() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);
        let (machine, first) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), true, &config);
        let (_, second) = on_metadata_ready(machine, &TrackId::from("a"), &ready(3.0, 10.0), true, &config);

        assert!(first.contains(&Effect::Play));
        assert!(second.is_empty());
    }

    #[test]
    fn same_track_while_loading_updates_offset() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);
        let (machine, effects) = on_new_target(machine, &target("a", 4.0), &unloaded(), &config);

        assert!(effects.is_empty());
        assert_eq!(machine.pending().map(|p| p.offset_seconds), Some(4.0));

        let (_, effects) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), false, &config);
        assert_eq!(effects, vec![Effect::Seek { position_seconds: 4.0 }]);
    }

    #[test]
    fn failed_load_is_reloaded_by_next_target() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);

        let machine = on_load_failed(machine);
        assert!(!machine.is_loading());
        assert_eq!(machine.loaded_track(), None);

        let (machine, effects) = on_new_target(machine, &target("a", 5.0), &unloaded(), &config);
        assert!(matches!(effects.as_slice(), [Effect::Load { .. }]));
        assert_eq!(machine.pending().map(|p| p.offset_seconds), Some(5.0));
    }

    #[test]
    fn metadata_after_failure_is_ignored() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 3.0), &unloaded(), &config);
        let machine = on_load_failed(machine);

        let (_, effects) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), true, &config);
        assert!(effects.is_empty());
    }

    #[test]
    fn small_drift_is_tolerated() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 0.0), &unloaded(), &config);
        let (machine, _) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), true, &config);

        let (_, effects) = on_new_target(machine.clone(), &target("a", 2.0), &ready(0.8, 10.0), &config);
        assert!(effects.is_empty());

        let (_, effects) = on_new_target(machine, &target("a", 2.0), &ready(0.75, 10.0), &config);
        assert!(effects.is_empty(), "exactly 1.25s of drift stays put");
    }

    #[test]
    fn large_drift_seeks() {
        let config = ControllerConfig::default();
        let (machine, _) = on_new_target(SyncMachine::default(), &target("a", 0.0), &unloaded(), &config);
        let (machine, _) = on_metadata_ready(machine, &TrackId::from("a"), &ready(0.0, 10.0), true, &config);

        let (_, effects) = on_new_target(machine, &target("a", 7.0), &ready(2.0, 10.0), &config);
        assert_eq!(effects, vec![Effect::Seek { position_seconds: 7.0 }]);
    }

    #[test]
    fn resync_waits_for_metadata() {
        let config = ControllerConfig::default();
        let machine = SyncMachine {
            loaded_track: Some(TrackId::from("a")),
            pending: None,
        };

        let (_, effects) = on_new_target(machine, &target("a", 7.0), &unloaded(), &config);
        assert!(effects.is_empty());
    }

    #[test]
    fn clamp_keeps_away_from_end() {
        assert_eq!(clamp_offset_to_duration(9.9, Some(10.0), 0.25), 9.75);
        assert_eq!(clamp_offset_to_duration(-3.0, Some(10.0), 0.25), 0.0);
        assert_eq!(clamp_offset_to_duration(4.0, Some(10.0), 0.25), 4.0);
        assert_eq!(clamp_offset_to_duration(4.0, Some(0.1), 0.25), 0.0);
    }

    #[test]
    fn clamp_with_unknown_duration() {
        assert_eq!(clamp_offset_to_duration(42.0, None, 0.25), 42.0);
        assert_eq!(clamp_offset_to_duration(42.0, Some(0.0), 0.25), 42.0);
        assert_eq!(clamp_offset_to_duration(42.0, Some(f64::INFINITY), 0.25), 42.0);
        assert_eq!(clamp_offset_to_duration(-1.0, None, 0.25), 0.0);
    }
}
