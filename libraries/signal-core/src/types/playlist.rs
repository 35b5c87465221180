use super::{Track, TrackId};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Ordered broadcast playlist
///
/// The broadcast loops this sequence indefinitely from the broadcast start.
/// Order is significant; it is never shuffled or mutated after loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist from an ordered list of tracks
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Tracks in broadcast order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Look up a track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|track| &track.id == id)
    }

    /// Sum of all track durations
    ///
    /// Does not validate; invalid durations are summed as-is.
    pub fn total_duration_seconds(&self) -> f64 {
        self.tracks.iter().map(|track| track.duration_seconds).sum()
    }

    /// Check the playlist invariants
    ///
    /// A valid playlist is non-empty, every duration is strictly positive
    /// and finite, and track ids are unique.
    pub fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(CoreError::EmptyPlaylist);
        }

        let mut seen = HashSet::with_capacity(self.tracks.len());
        for track in &self.tracks {
            if !track.has_valid_duration() {
                return Err(CoreError::InvalidDuration {
                    id: track.id.clone(),
                    duration_seconds: track.duration_seconds,
                });
            }

            if !seen.insert(&track.id) {
                return Err(CoreError::DuplicateTrack(track.id.clone()));
            }
        }

        Ok(())
    }
}

impl From<Vec<Track>> for Playlist {
    fn from(tracks: Vec<Track>) -> Self {
        Self::new(tracks)
    }
}

/// Station identity shown next to the current track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationMetadata {
    pub station_id: String,
    pub station_name: String,
}

impl Default for StationMetadata {
    fn default() -> Self {
        Self {
            station_id: "signal-radio".to_string(),
            station_name: "Signal Radio".to_string(),
        }
    }
}

/// A station and its playlist, as stored in a catalog file
///
/// Accepted file shapes:
/// - `{ "station": { "stationId", "stationName" }, "tracks": [...] }`
/// - a bare array of tracks (station metadata falls back to the default)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub station: StationMetadata,
    pub tracks: Playlist,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Full(Catalog),
    Tracks(Vec<Track>),
}

impl Catalog {
    /// Parse and validate a catalog from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Full(catalog) => catalog,
            CatalogFile::Tracks(tracks) => Self {
                station: StationMetadata::default(),
                tracks: Playlist::new(tracks),
            },
        };

        catalog.tracks.validate()?;
        Ok(catalog)
    }

    /// Read, parse and validate a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;

        tracing::debug!(
            "Loaded catalog {:?}: {} tracks, {:.0}s loop",
            path,
            catalog.tracks.len(),
            catalog.tracks.total_duration_seconds()
        );

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, duration_seconds: f64) -> Track {
        Track::new(id, format!("Track {}", id), format!("https://cdn/{}.mp3", id), duration_seconds)
    }

    #[test]
    fn valid_playlist() {
        let playlist = Playlist::new(vec![track("a", 10.0), track("b", 20.0)]);
        assert!(playlist.validate().is_ok());
        assert_eq!(playlist.total_duration_seconds(), 30.0);
        assert_eq!(playlist.get(&TrackId::new("b")).unwrap().duration_seconds, 20.0);
    }

    #[test]
    fn empty_playlist_is_rejected() {
        assert!(matches!(
            Playlist::default().validate(),
            Err(CoreError::EmptyPlaylist)
        ));
    }

    #[test]
    fn first_invalid_duration_is_reported() {
        let playlist = Playlist::new(vec![track("a", 10.0), track("b", 0.0), track("c", -1.0)]);
        match playlist.validate() {
            Err(CoreError::InvalidDuration { id, .. }) => assert_eq!(id.as_str(), "b"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let playlist = Playlist::new(vec![track("a", 10.0), track("a", 20.0)]);
        assert!(matches!(playlist.validate(), Err(CoreError::DuplicateTrack(_))));
    }

    #[test]
    fn catalog_with_station() {
        let json = r#"{
            "station": { "stationId": "night-owl", "stationName": "Night Owl FM" },
            "tracks": [
                { "id": "a", "title": "A", "srcUrl": "https://cdn/a.mp3", "durationSeconds": 10 }
            ]
        }"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.station.station_name, "Night Owl FM");
        assert_eq!(catalog.tracks.len(), 1);
    }

    #[test]
    fn bare_track_array_uses_default_station() {
        let json = r#"[
            { "id": "a", "title": "A", "srcUrl": "https://cdn/a.mp3", "durationSeconds": 10 },
            { "id": "b", "title": "B", "srcUrl": "https://cdn/b.mp3", "durationSeconds": 20.5 }
        ]"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.station, StationMetadata::default());
        assert_eq!(catalog.tracks.total_duration_seconds(), 30.5);
    }

    #[test]
    fn catalog_validation_runs_on_parse() {
        let json = r#"[]"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CoreError::EmptyPlaylist)
        ));
    }
}
