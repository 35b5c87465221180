//! Signal Radio - Broadcast Clock
//!
//! Maps a shared broadcast start, the current time and an ordered playlist to
//! the track that is on air and the offset into it. Every listener resolving
//! at the same instant gets the same answer, no matter when they tuned in.
//!
//! The playlist loops indefinitely from the broadcast start. Listeners that
//! arrive before the broadcast start hear the first track from its beginning.
//!
//! # Example
//!
//! ```rust
//! use signal_clock::resolve;
//! use signal_core::Track;
//!
//! let playlist = vec![
//!     Track::new("a", "Opening", "https://cdn.example.com/a.mp3", 10.0),
//!     Track::new("b", "Second", "https://cdn.example.com/b.mp3", 20.0),
//! ];
//!
//! // 15 seconds in: five seconds into the second track
//! let snapshot = resolve(0, 15_000, &playlist).unwrap();
//! assert_eq!(snapshot.active_track.id.as_str(), "b");
//! assert_eq!(snapshot.track_offset_seconds, 5.0);
//!
//! // 35 seconds in: the 30 second loop wrapped around
//! let snapshot = resolve(0, 35_000, &playlist).unwrap();
//! assert_eq!(snapshot.active_track.id.as_str(), "a");
//! assert_eq!(snapshot.track_offset_seconds, 5.0);
//! ```

#![forbid(unsafe_code)]

mod error;
mod presentation;
mod resolver;
mod snapshot;
mod station;

pub use error::{ClockError, Result};
pub use presentation::{format_clock, PLACEHOLDER_LABEL};
pub use resolver::resolve;
pub use snapshot::PlaylistClockSnapshot;
pub use station::{now_ms, StationClock, CLOCK_TICK_INTERVAL};
