//! Fixtures shared by the ingestion unit tests.

use crate::library_store::{
    ArtistHandle, LibraryCounts, LibraryStore, SqliteLibraryStore, StoredArtist, StoredTrack,
    TrackHandle, UserHandle,
};
use anyhow::{bail, Result};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

pub fn track_json(id: &str, artist_id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Song {}", id),
        "popularity": 10,
        "preview_url": null,
        "artists": [{"id": artist_id, "name": format!("Artist {}", artist_id)}]
    })
}

pub fn saved_item_json(id: &str, artist_id: &str) -> Value {
    json!({"added_at": "2021-03-04T05:06:07Z", "track": track_json(id, artist_id)})
}

pub fn page_json(items: Vec<Value>, next: Option<&str>) -> Value {
    json!({"items": items, "next": next})
}

pub fn playlist_json(id: &str, tracks_href: &str) -> Value {
    json!({"id": id, "name": format!("Playlist {}", id), "tracks": {"href": tracks_href}})
}

pub fn memory_store() -> (Arc<SqliteLibraryStore>, UserHandle) {
    let store = Arc::new(SqliteLibraryStore::in_memory().unwrap());
    let user = store.ensure_user("listener").unwrap();
    (store, user)
}

/// Delegates to SQLite but refuses to write the listed track IDs.
pub struct FailingTrackStore {
    inner: SqliteLibraryStore,
    rejected: HashSet<String>,
}

impl FailingTrackStore {
    pub fn new(inner: SqliteLibraryStore, rejected: &[&str]) -> Self {
        Self {
            inner,
            rejected: rejected.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LibraryStore for FailingTrackStore {
    fn ensure_user(&self, handle: &str) -> Result<UserHandle> {
        self.inner.ensure_user(handle)
    }

    fn get_user(&self, handle: &str) -> Result<Option<UserHandle>> {
        self.inner.get_user(handle)
    }

    fn set_ingestion_complete(&self, user: UserHandle) -> Result<()> {
        self.inner.set_ingestion_complete(user)
    }

    fn is_ingestion_complete(&self, user: UserHandle) -> Result<Option<bool>> {
        self.inner.is_ingestion_complete(user)
    }

    fn ensure_artist(&self, external_id: &str, name: &str) -> Result<ArtistHandle> {
        self.inner.ensure_artist(external_id, name)
    }

    fn ensure_track(
        &self,
        external_id: &str,
        artist: ArtistHandle,
        name: &str,
        popularity: u32,
        preview_url: Option<&str>,
    ) -> Result<TrackHandle> {
        if self.rejected.contains(external_id) {
            bail!("disk full while writing {}", external_id);
        }
        self.inner
            .ensure_track(external_id, artist, name, popularity, preview_url)
    }

    fn ensure_membership(&self, user: UserHandle, track: TrackHandle) -> Result<bool> {
        self.inner.ensure_membership(user, track)
    }

    fn get_artist(&self, external_id: &str) -> Result<Option<StoredArtist>> {
        self.inner.get_artist(external_id)
    }

    fn get_track(&self, external_id: &str) -> Result<Option<StoredTrack>> {
        self.inner.get_track(external_id)
    }

    fn get_counts(&self) -> Result<LibraryCounts> {
        self.inner.get_counts()
    }

    fn get_user_track_count(&self, user: UserHandle) -> Result<usize> {
        self.inner.get_user_track_count(user)
    }
}
