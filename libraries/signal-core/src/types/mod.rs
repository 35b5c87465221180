mod ids;
mod playlist;
mod sync;
mod track;

pub use ids::{BackendId, TrackId};
pub use playlist::{Catalog, Playlist, StationMetadata};
pub use sync::SyncTarget;
pub use track::Track;
