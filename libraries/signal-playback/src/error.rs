//! Error types for playback control

use thiserror::Error;

/// Message shown when a backend rejects `play()` without a reason
pub const PLAYBACK_REJECTED_FALLBACK: &str =
    "Playback could not start. Browser autoplay may require a user click.";

/// Message shown for any media load/decode failure
pub const MEDIA_LOAD_ERROR_MESSAGE: &str =
    "Audio failed to load. Check MP3 URLs and CORS settings.";

/// Playback errors
///
/// None of these are fatal: the controller turns each into a state
/// transition plus a user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Backend refused to start (typically a user-gesture policy)
    #[error("{0}")]
    PlaybackRejected(String),

    /// Backend failed to fetch or decode the source
    #[error("{0}")]
    MediaLoad(String),

    /// Any other backend failure
    #[error("Audio backend error: {0}")]
    Backend(String),
}

impl PlaybackError {
    /// Rejection with the backend's reason, or the fallback message when the
    /// reason is blank
    pub fn rejected(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            Self::PlaybackRejected(PLAYBACK_REJECTED_FALLBACK.to_string())
        } else {
            Self::PlaybackRejected(reason)
        }
    }

    /// The fixed media-load diagnostic
    pub fn media_load() -> Self {
        Self::MediaLoad(MEDIA_LOAD_ERROR_MESSAGE.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
