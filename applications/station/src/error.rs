/// Station error types
use signal_clock::ClockError;
use signal_core::{CoreError, SourceError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StationError>;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Playlist error: {0}")]
    Playlist(#[from] CoreError),

    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),

    #[error("Broadcast start error: {0}")]
    BroadcastStart(#[from] SourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for StationError {
    fn from(err: config::ConfigError) -> Self {
        StationError::Config(err.to_string())
    }
}
