//! Shared constants for end-to-end tests

/// Bearer token the test catalog accepts
pub const TEST_TOKEN: &str = "test-access-token";

/// Handle of the user every test ingests for
pub const TEST_USER: &str = "listener";

/// Page size used by the endpoints of the test catalog
pub const TEST_PAGE_LIMIT: u32 = 2;

/// Distinct tracks in the scripted listening history
pub const HISTORY_TRACKS: usize = 7;

/// Distinct artists in the scripted listening history
pub const HISTORY_ARTISTS: usize = 4;

/// Path and query of the second page of the first playlist
pub const PLAYLIST_ONE_PAGE_2: &str = "/v1/playlists/one/tracks?offset=2";
