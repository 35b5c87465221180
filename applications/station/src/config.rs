/// Station configuration
use crate::error::{Result, StationError};
use serde::{Deserialize, Serialize};
use signal_core::{
    BroadcastStartSource, EnvBroadcastStart, RawBroadcastStart, StaticBroadcastStart, SyncSource,
};
use signal_playback::ControllerConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "station.toml";

/// Prefix for environment overrides (`SIGNAL_TICK_INTERVAL_MS`, ...)
pub const ENV_PREFIX: &str = "SIGNAL";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StationConfig {
    #[serde(default = "default_playlist_path")]
    pub playlist_path: PathBuf,

    /// Broadcast start as seconds or milliseconds since epoch
    ///
    /// When unset, `SIGNAL_DEMO_BROADCAST_START_MS` is read on every fetch.
    #[serde(default)]
    pub broadcast_start_ms: Option<String>,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    #[serde(default = "default_max_resync_drift_seconds")]
    pub max_resync_drift_seconds: f64,

    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    #[serde(default)]
    pub autoplay: bool,
}

impl StationConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `station.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, ENV_PREFIX)
    }

    /// Same as [`StationConfig::load`] with a custom environment prefix
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(StationError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables; nested keys would use `__`
        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        tracing::debug!("Loaded station config: {:?}", config);
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(StationError::Config(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.frame_interval_ms == 0 {
            return Err(StationError::Config(
                "frame_interval_ms must be greater than zero".to_string(),
            ));
        }

        if !self.max_resync_drift_seconds.is_finite() || self.max_resync_drift_seconds < 0.0 {
            return Err(StationError::Config(format!(
                "max_resync_drift_seconds must be a non-negative number, got {}",
                self.max_resync_drift_seconds
            )));
        }

        if let Some(raw) = &self.broadcast_start_ms {
            signal_core::BroadcastStart::parse_text(raw)?;
        }

        Ok(())
    }

    /// Where the broadcast start comes from
    ///
    /// A configured value is parsed eagerly so a typo fails at startup.
    pub fn broadcast_source(&self) -> Result<Box<dyn BroadcastStartSource>> {
        match &self.broadcast_start_ms {
            Some(raw) => {
                let source = StaticBroadcastStart::parse(
                    &RawBroadcastStart::Text(raw.clone()),
                    SyncSource::Demo,
                )?;
                Ok(Box::new(source))
            }
            None => Ok(Box::new(EnvBroadcastStart::default())),
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            max_resync_drift_seconds: self.max_resync_drift_seconds,
            initial_volume: self.initial_volume,
            ..ControllerConfig::default()
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

// Default values
fn default_playlist_path() -> PathBuf {
    PathBuf::from("playlist.json")
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_max_resync_drift_seconds() -> f64 {
    1.25
}

fn default_initial_volume() -> f32 {
    signal_playback::DEFAULT_VOLUME
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            playlist_path: default_playlist_path(),
            broadcast_start_ms: None,
            tick_interval_ms: default_tick_interval_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            max_resync_drift_seconds: default_max_resync_drift_seconds(),
            initial_volume: default_initial_volume(),
            autoplay: false,
        }
    }
}
