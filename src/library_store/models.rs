//! Row handles and read models for the library database.

use serde::Serialize;
use std::fmt;

/// Primary key of a row in `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UserHandle(pub i64);

/// Primary key of a row in `artists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ArtistHandle(pub i64);

/// Primary key of a row in `tracks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TrackHandle(pub i64);

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtist {
    pub handle: ArtistHandle,
    pub external_id: String,
    pub name: String,
    pub popularity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredTrack {
    pub handle: TrackHandle,
    pub external_id: String,
    pub artist: ArtistHandle,
    pub name: String,
    pub popularity: u32,
    pub preview_url: Option<String>,
}

/// Row counts across the whole library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryCounts {
    pub artists: usize,
    pub tracks: usize,
    pub memberships: usize,
}
