//! Signal Radio Core
//!
//! Platform-agnostic core types, collaborator interfaces and error handling
//! shared by every Signal Radio crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `SyncTarget`, `TrackId`, `BackendId`
//! - **Broadcast Start**: parsing of every accepted raw encoding, plus the
//!   `BroadcastStartSource` trait implemented by local sources
//! - **Scheduling**: `PeriodicTask`, a cancelable tick source with a single
//!   owned handle
//! - **Error Handling**: `CoreError` and `SourceError`
//!
//! # Example
//!
//! ```rust
//! use signal_core::{Playlist, Track};
//!
//! let playlist = Playlist::new(vec![
//!     Track::new("a", "Opening", "https://cdn.example.com/a.mp3", 10.0),
//!     Track::new("b", "Second", "https://cdn.example.com/b.mp3", 20.0),
//! ]);
//!
//! assert!(playlist.validate().is_ok());
//! assert_eq!(playlist.total_duration_seconds(), 30.0);
//! ```

#![forbid(unsafe_code)]

pub mod broadcast;
pub mod error;
pub mod schedule;
pub mod types;

// Re-export commonly used types
pub use broadcast::{
    BroadcastStart, BroadcastStartSource, EnvBroadcastStart, RawBroadcastStart,
    StaticBroadcastStart, SyncSource,
};
pub use error::{CoreError, Result, SourceError};
pub use schedule::{PeriodicTask, Tick};
pub use types::{BackendId, Catalog, Playlist, StationMetadata, SyncTarget, Track, TrackId};
