//! Pure time → playlist position mapping

use crate::error::{ClockError, Result};
use crate::snapshot::PlaylistClockSnapshot;
use signal_core::Track;

/// Resolve which track is on air at `now_ms`
///
/// Pure: identical inputs always produce an identical snapshot, and the
/// function holds no state, so it can be called at any rate from anywhere.
///
/// # Errors
/// * `InvalidPlaylist` if `playlist` is empty
/// * `InvalidDuration` for the first track whose duration is not strictly
///   positive (checked while summing)
pub fn resolve(
    broadcast_start_ms: i64,
    now_ms: i64,
    playlist: &[Track],
) -> Result<PlaylistClockSnapshot> {
    if playlist.is_empty() {
        return Err(ClockError::InvalidPlaylist);
    }

    let total_duration = total_duration_seconds(playlist)?;
    let raw_elapsed = elapsed_whole_seconds(broadcast_start_ms, now_ms);
    let playlist_elapsed = normalize_playlist_elapsed(raw_elapsed, total_duration);

    let (track_index, track_offset_seconds) = locate(playlist, playlist_elapsed);

    Ok(PlaylistClockSnapshot {
        active_track: playlist[track_index].clone(),
        track_index,
        track_offset_seconds,
        playlist_elapsed_seconds: playlist_elapsed,
        total_playlist_duration_seconds: total_duration,
        broadcast_start_ms,
        observed_at_ms: now_ms,
    })
}

/// Walk the playlist to the track containing `playlist_elapsed`
///
/// Returns the track index and the offset into that track. `playlist` must
/// be non-empty.
fn locate(playlist: &[Track], playlist_elapsed: f64) -> (usize, f64) {
    let mut cursor = 0.0;
    for (index, track) in playlist.iter().enumerate() {
        let track_end = cursor + track.duration_seconds;

        if playlist_elapsed < track_end {
            return (index, playlist_elapsed - cursor);
        }

        cursor = track_end;
    }

    // Unreachable while playlist_elapsed < total duration; kept so a rounding
    // surprise degrades to the tail of the loop instead of an error.
    let last_index = playlist.len() - 1;
    let last = &playlist[last_index];
    tracing::warn!(
        "Playlist walk exhausted at {}s (cursor {}s); holding on last track",
        playlist_elapsed,
        cursor
    );

    (last_index, (last.duration_seconds - 1.0).max(0.0))
}

/// Sum durations, failing on the first invalid one
fn total_duration_seconds(playlist: &[Track]) -> Result<f64> {
    playlist.iter().try_fold(0.0, |total, track| {
        if track.has_valid_duration() {
            Ok(total + track.duration_seconds)
        } else {
            Err(ClockError::InvalidDuration {
                track_id: track.id.clone(),
                duration_seconds: track.duration_seconds,
            })
        }
    })
}

/// Whole seconds since the broadcast start, floored toward negative infinity
fn elapsed_whole_seconds(broadcast_start_ms: i64, now_ms: i64) -> i64 {
    now_ms.saturating_sub(broadcast_start_ms).div_euclid(1000)
}

/// Fold raw elapsed seconds into one loop of the playlist
///
/// Pre-broadcast listeners (negative elapsed) are pinned to zero.
fn normalize_playlist_elapsed(raw_elapsed_seconds: i64, total_duration_seconds: f64) -> f64 {
    if total_duration_seconds <= 0.0 || raw_elapsed_seconds < 0 {
        return 0.0;
    }

    (raw_elapsed_seconds as f64) % total_duration_seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist() -> Vec<Track> {
        vec![
            Track::new("a", "Track A", "https://cdn/a.mp3", 10.0),
            Track::new("b", "Track B", "https://cdn/b.mp3", 20.0),
        ]
    }

    #[test]
    fn mid_second_track() {
        let snapshot = resolve(0, 15_000, &playlist()).unwrap();
        assert_eq!(snapshot.active_track.id.as_str(), "b");
        assert_eq!(snapshot.track_index, 1);
        assert_eq!(snapshot.track_offset_seconds, 5.0);
        assert_eq!(snapshot.playlist_elapsed_seconds, 15.0);
        assert_eq!(snapshot.total_playlist_duration_seconds, 30.0);
        assert_eq!(snapshot.observed_at_ms, 15_000);
    }

    #[test]
    fn wraps_after_one_loop() {
        let snapshot = resolve(0, 35_000, &playlist()).unwrap();
        assert_eq!(snapshot.active_track.id.as_str(), "a");
        assert_eq!(snapshot.track_offset_seconds, 5.0);
        assert_eq!(snapshot.playlist_elapsed_seconds, 5.0);
    }

    #[test]
    fn track_boundary_belongs_to_next_track() {
        let snapshot = resolve(0, 10_000, &playlist()).unwrap();
        assert_eq!(snapshot.active_track.id.as_str(), "b");
        assert_eq!(snapshot.track_offset_seconds, 0.0);
    }

    #[test]
    fn sub_second_time_is_floored() {
        let snapshot = resolve(0, 9_999, &playlist()).unwrap();
        assert_eq!(snapshot.active_track.id.as_str(), "a");
        assert_eq!(snapshot.track_offset_seconds, 9.0);
    }

    #[test]
    fn before_broadcast_start_plays_first_track_from_zero() {
        let snapshot = resolve(60_000, 1_000, &playlist()).unwrap();
        assert_eq!(snapshot.active_track.id.as_str(), "a");
        assert_eq!(snapshot.track_offset_seconds, 0.0);
        assert_eq!(snapshot.playlist_elapsed_seconds, 0.0);
    }

    #[test]
    fn half_second_before_start_is_pre_broadcast() {
        // floor(-0.5) = -1, which pins to zero
        let snapshot = resolve(1_000, 500, &playlist()).unwrap();
        assert_eq!(snapshot.playlist_elapsed_seconds, 0.0);
    }

    #[test]
    fn empty_playlist_fails() {
        assert_eq!(resolve(0, 0, &[]), Err(ClockError::InvalidPlaylist));
    }

    #[test]
    fn invalid_duration_fails_even_with_valid_tracks() {
        let mut tracks = playlist();
        tracks.push(Track::new("c", "Track C", "https://cdn/c.mp3", 0.0));
        tracks.push(Track::new("d", "Track D", "https://cdn/d.mp3", -5.0));

        match resolve(0, 0, &tracks) {
            Err(ClockError::InvalidDuration { track_id, .. }) => assert_eq!(track_id.as_str(), "c"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        let snapshot = resolve(i64::MIN, i64::MAX, &playlist()).unwrap();
        assert!(snapshot.track_offset_seconds >= 0.0);
        assert!(snapshot.playlist_elapsed_seconds < 30.0);
    }

    #[test]
    fn fractional_durations() {
        let tracks = vec![
            Track::new("a", "A", "a.mp3", 2.5),
            Track::new("b", "B", "b.mp3", 2.5),
        ];

        let snapshot = resolve(0, 3_000, &tracks).unwrap();
        assert_eq!(snapshot.active_track.id.as_str(), "b");
        assert_eq!(snapshot.track_offset_seconds, 0.5);
    }

    #[test]
    fn exhausted_walk_holds_last_track() {
        // Should never trigger through resolve(): elapsed is always folded
        // below the total duration first.
        let tracks = playlist();
        assert_eq!(locate(&tracks, 30.0), (1, 19.0));
        assert_eq!(locate(&tracks, 1_000.0), (1, 19.0));

        let short = vec![Track::new("s", "Short", "s.mp3", 0.5)];
        assert_eq!(locate(&short, 0.5), (0, 0.0));
    }

    #[test]
    fn elapsed_floor_is_euclidean() {
        assert_eq!(elapsed_whole_seconds(0, 1_999), 1);
        assert_eq!(elapsed_whole_seconds(0, -1), -1);
        assert_eq!(elapsed_whole_seconds(0, -1_000), -1);
        assert_eq!(elapsed_whole_seconds(0, -1_001), -2);
    }

    #[test]
    fn normalize_handles_degenerate_totals() {
        assert_eq!(normalize_playlist_elapsed(42, 0.0), 0.0);
        assert_eq!(normalize_playlist_elapsed(-3, 30.0), 0.0);
        assert_eq!(normalize_playlist_elapsed(65, 30.0), 5.0);
    }
}
