//! Signal Station Library
//!
//! Headless station host: configuration, a simulated audio backend and the
//! event loop that ties the broadcast clock, playback controller and
//! spectrum sampler together.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod headless;
pub mod runner;

// Re-export commonly used types for convenience
pub use config::StationConfig;
pub use error::{Result, StationError};
pub use headless::HeadlessBackend;
pub use runner::{describe, spectrum_line, StationRunner};

use signal_clock::StationClock;
use signal_core::Catalog;

/// Load the playlist named by `config` and connect its broadcast source
pub async fn open_station(config: &StationConfig) -> Result<(Catalog, StationClock)> {
    let catalog = Catalog::load(&config.playlist_path)?;
    let source = config.broadcast_source()?;
    let clock = StationClock::connect(catalog.tracks.clone(), source.as_ref()).await;
    Ok((catalog, clock))
}
