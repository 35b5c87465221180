/// Signal Station - headless synced radio
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use signal_clock::{format_clock, now_ms};
use signal_core::Catalog;
use signal_station::{describe, open_station, StationConfig, StationRunner};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "signal-station")]
#[command(about = "Tune in to a Signal Radio broadcast from the terminal", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./station.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Playlist catalog, overriding the configured path
    #[arg(short, long, global = true, env = "SIGNAL_PLAYLIST_PATH")]
    playlist: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print what is on air
    Now {
        /// Resolve at this epoch-millisecond instant instead of now
        #[arg(long)]
        at: Option<i64>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow the broadcast until interrupted
    Watch {
        /// Start playing immediately
        #[arg(long)]
        autoplay: bool,

        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Check the configuration and playlist catalog
    Validate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_station=info,signal_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = StationConfig::load(cli.config.as_deref())?;
    if let Some(playlist) = cli.playlist {
        config.playlist_path = playlist;
    }

    match cli.command {
        Commands::Now { at, json } => now(&config, at, json).await?,
        Commands::Watch { autoplay, seconds } => {
            config.autoplay |= autoplay;
            watch(&config, seconds).await?;
        }
        Commands::Validate => validate(&config)?,
    }

    Ok(())
}

async fn now(config: &StationConfig, at: Option<i64>, json: bool) -> anyhow::Result<()> {
    config.validate()?;
    let (catalog, clock) = open_station(config).await?;
    let snapshot = clock.snapshot_at(at.unwrap_or_else(now_ms))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    match snapshot {
        Some(snapshot) => {
            println!("{}", catalog.station.station_name);
            println!("{}", describe(&snapshot));
            println!("  source:    {}", clock.sync_source());
            println!("  url:       {}", snapshot.active_track.src_url);
            println!("  remaining: {}", format_clock(snapshot.remaining_seconds()));
            if let Some(started) = DateTime::<Utc>::from_timestamp_millis(snapshot.broadcast_start_ms) {
                println!("  on air:    since {}", started.to_rfc3339());
            }
        }
        None => {
            println!("{} is off air", catalog.station.station_name);
            if let Some(message) = clock.error_message() {
                println!("  {}", message);
            }
        }
    }

    Ok(())
}

async fn watch(config: &StationConfig, seconds: Option<u64>) -> anyhow::Result<()> {
    config.validate()?;
    let (catalog, clock) = open_station(config).await?;
    tracing::info!("Tuning in to {}", catalog.station.station_name);

    let runner = StationRunner::new(clock, config);
    let shutdown = async move {
        match seconds {
            Some(seconds) => {
                tokio::select! {
                    () = tokio::time::sleep(Duration::from_secs(seconds)) => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            None => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for ctrl-c: {}", e);
                }
            }
        }
    };

    runner.run(shutdown).await?;
    Ok(())
}

fn validate(config: &StationConfig) -> anyhow::Result<()> {
    config.validate()?;

    let catalog = Catalog::load(&config.playlist_path)
        .with_context(|| format!("Invalid catalog {}", config.playlist_path.display()))?;

    println!(
        "{}: {} tracks, {} per loop",
        catalog.station.station_name,
        catalog.tracks.len(),
        format_clock(catalog.tracks.total_duration_seconds())
    );
    match &config.broadcast_start_ms {
        Some(raw) => println!("Broadcast start: {}", raw.trim()),
        None => println!(
            "Broadcast start: read from {}",
            signal_core::broadcast::DEMO_BROADCAST_START_VAR
        ),
    }

    Ok(())
}
