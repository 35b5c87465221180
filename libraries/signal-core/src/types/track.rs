use super::TrackId;
use serde::{Deserialize, Serialize};

/// One entry of the static broadcast catalog
///
/// Immutable once loaded. `duration_seconds` must be strictly positive;
/// that invariant is enforced when a playlist is validated or resolved, not
/// at construction, so invalid catalogs can still be loaded and reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique, stable identifier
    pub id: TrackId,

    /// Display title
    pub title: String,

    /// Source locator (URI) handed to the audio backend
    pub src_url: String,

    /// Track length in seconds
    pub duration_seconds: f64,
}

impl Track {
    /// Create a new track
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        src_url: impl Into<String>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            id: TrackId::new(id),
            title: title.into(),
            src_url: src_url.into(),
            duration_seconds,
        }
    }

    /// Whether the duration satisfies the positive-duration invariant
    pub fn has_valid_duration(&self) -> bool {
        self.duration_seconds.is_finite() && self.duration_seconds > 0.0
    }
}
