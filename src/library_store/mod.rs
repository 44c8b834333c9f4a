//! Persistent library of artists, tracks and per-user track memberships.

mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{
    ArtistHandle, LibraryCounts, StoredArtist, StoredTrack, TrackHandle, UserHandle,
};
pub use schema::LIBRARY_SCHEMA;
pub use store::SqliteLibraryStore;
pub use trait_def::LibraryStore;
