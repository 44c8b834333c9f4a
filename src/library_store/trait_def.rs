//! LibraryStore trait definition.

use super::models::{ArtistHandle, LibraryCounts, StoredArtist, StoredTrack, TrackHandle, UserHandle};
use anyhow::Result;

/// Persistence for users and their listening library.
///
/// Every `ensure_*` operation is find-or-create keyed by a uniqueness
/// constraint, so repeated and concurrent calls with the same key converge on
/// a single row. Callers never observe a duplicate-key error.
pub trait LibraryStore: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Returns the user with the given handle, creating it if missing.
    fn ensure_user(&self, handle: &str) -> Result<UserHandle>;

    /// Returns Ok(None) if no user has the given handle.
    fn get_user(&self, handle: &str) -> Result<Option<UserHandle>>;

    /// Marks the user's ingestion as complete.
    /// Returns Err if the user does not exist.
    fn set_ingestion_complete(&self, user: UserHandle) -> Result<()>;

    /// Returns Ok(None) if the user does not exist.
    fn is_ingestion_complete(&self, user: UserHandle) -> Result<Option<bool>>;

    // =========================================================================
    // Find-or-create writes
    // =========================================================================

    /// Find-or-create an artist. A newly created artist has popularity 0;
    /// an existing row is returned untouched.
    fn ensure_artist(&self, external_id: &str, name: &str) -> Result<ArtistHandle>;

    /// Find-or-create a track. Everything except `external_id` is only
    /// written when the row is created.
    fn ensure_track(
        &self,
        external_id: &str,
        artist: ArtistHandle,
        name: &str,
        popularity: u32,
        preview_url: Option<&str>,
    ) -> Result<TrackHandle>;

    /// Records that the user has the track.
    /// Returns true if the membership was created by this call.
    fn ensure_membership(&self, user: UserHandle, track: TrackHandle) -> Result<bool>;

    // =========================================================================
    // Reads
    // =========================================================================

    fn get_artist(&self, external_id: &str) -> Result<Option<StoredArtist>>;

    fn get_track(&self, external_id: &str) -> Result<Option<StoredTrack>>;

    fn get_counts(&self) -> Result<LibraryCounts>;

    /// Number of distinct tracks recorded for the user.
    fn get_user_track_count(&self, user: UserHandle) -> Result<usize>;
}
