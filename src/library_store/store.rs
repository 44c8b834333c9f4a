//! SQLite implementation of [`LibraryStore`].

use super::models::{
    ArtistHandle, LibraryCounts, StoredArtist, StoredTrack, TrackHandle, UserHandle,
};
use super::schema::LIBRARY_SCHEMA;
use super::trait_def::LibraryStore;
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

/// How long a writer waits on a database locked by another connection.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteLibraryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLibraryStore {
    /// Open or create a library database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open library database: {:?}", path))?;
        let store = Self::from_connection(conn)?;
        info!("Opened library database at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        LIBRARY_SCHEMA
            .ensure(&conn)
            .context("Library database schema check failed")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Library database connection mutex poisoned"))
    }

    fn count(conn: &Connection, table: &str) -> Result<usize> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }
}

impl LibraryStore for SqliteLibraryStore {
    fn ensure_user(&self, handle: &str) -> Result<UserHandle> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (handle) VALUES (?1) ON CONFLICT(handle) DO NOTHING",
            params![handle],
        )?;
        let id = conn.query_row(
            "SELECT id FROM users WHERE handle = ?1",
            params![handle],
            |row| row.get(0),
        )?;
        Ok(UserHandle(id))
    }

    fn get_user(&self, handle: &str) -> Result<Option<UserHandle>> {
        let conn = self.conn()?;
        let id = conn
            .query_row(
                "SELECT id FROM users WHERE handle = ?1",
                params![handle],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.map(UserHandle))
    }

    fn set_ingestion_complete(&self, user: UserHandle) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET ingestion_complete = 1 WHERE id = ?1",
            params![user.0],
        )?;
        if updated == 0 {
            bail!("No user with id {}", user.0);
        }
        Ok(())
    }

    fn is_ingestion_complete(&self, user: UserHandle) -> Result<Option<bool>> {
        let conn = self.conn()?;
        let flag = conn
            .query_row(
                "SELECT ingestion_complete FROM users WHERE id = ?1",
                params![user.0],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(flag.map(|f| f != 0))
    }

    fn ensure_artist(&self, external_id: &str, name: &str) -> Result<ArtistHandle> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO artists (external_id, name, popularity) VALUES (?1, ?2, 0)
             ON CONFLICT(external_id) DO NOTHING",
            params![external_id, name],
        )?;
        let id = conn.query_row(
            "SELECT id FROM artists WHERE external_id = ?1",
            params![external_id],
            |row| row.get(0),
        )?;
        Ok(ArtistHandle(id))
    }

    fn ensure_track(
        &self,
        external_id: &str,
        artist: ArtistHandle,
        name: &str,
        popularity: u32,
        preview_url: Option<&str>,
    ) -> Result<TrackHandle> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tracks (external_id, artist_id, name, popularity, preview_url)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(external_id) DO NOTHING",
            params![external_id, artist.0, name, popularity, preview_url],
        )?;
        let id = conn.query_row(
            "SELECT id FROM tracks WHERE external_id = ?1",
            params![external_id],
            |row| row.get(0),
        )?;
        Ok(TrackHandle(id))
    }

    fn ensure_membership(&self, user: UserHandle, track: TrackHandle) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO user_tracks (user_id, track_id) VALUES (?1, ?2)
             ON CONFLICT(user_id, track_id) DO NOTHING",
            params![user.0, track.0],
        )?;
        Ok(inserted > 0)
    }

    fn get_artist(&self, external_id: &str) -> Result<Option<StoredArtist>> {
        let conn = self.conn()?;
        let artist = conn
            .query_row(
                "SELECT id, external_id, name, popularity FROM artists WHERE external_id = ?1",
                params![external_id],
                |row| {
                    Ok(StoredArtist {
                        handle: ArtistHandle(row.get(0)?),
                        external_id: row.get(1)?,
                        name: row.get(2)?,
                        popularity: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(artist)
    }

    fn get_track(&self, external_id: &str) -> Result<Option<StoredTrack>> {
        let conn = self.conn()?;
        let track = conn
            .query_row(
                "SELECT id, external_id, artist_id, name, popularity, preview_url
                 FROM tracks WHERE external_id = ?1",
                params![external_id],
                |row| {
                    Ok(StoredTrack {
                        handle: TrackHandle(row.get(0)?),
                        external_id: row.get(1)?,
                        artist: ArtistHandle(row.get(2)?),
                        name: row.get(3)?,
                        popularity: row.get(4)?,
                        preview_url: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(track)
    }

    fn get_counts(&self) -> Result<LibraryCounts> {
        let conn = self.conn()?;
        Ok(LibraryCounts {
            artists: Self::count(&conn, "artists")?,
            tracks: Self::count(&conn, "tracks")?,
            memberships: Self::count(&conn, "user_tracks")?,
        })
    }

    fn get_user_track_count(&self, user: UserHandle) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM user_tracks WHERE user_id = ?1",
            params![user.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
