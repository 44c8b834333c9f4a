//! Response envelopes and endpoint layout of the catalog API.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Largest page size the catalog accepts.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// One page of a paginated listing.
///
/// `next` is the absolute URL of the following page, absent or null on the
/// last page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}

impl<T: DeserializeOwned> Page<T> {
    pub fn from_body(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(body)
    }
}

/// Playlist entry as returned by the playlists listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Option<TrackListingRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackListingRef {
    #[serde(default)]
    pub href: Option<String>,
}

impl PlaylistSummary {
    /// URL of this playlist's own paginated track listing.
    pub fn track_listing_url(&self) -> Option<&str> {
        self.tracks
            .as_ref()
            .and_then(|t| t.href.as_deref())
            .filter(|href| !href.trim().is_empty())
    }
}

/// Window over which the catalog computes a user's favorite tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeRange {
    LongTerm,
    MediumTerm,
    ShortTerm,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::LongTerm => "long_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::ShortTerm => "short_term",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start URLs of the listings drained for a user.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
    page_limit: u32,
}

impl Endpoints {
    pub fn new(base_url: &str, page_limit: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_limit: page_limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn top_tracks(&self, range: TimeRange) -> String {
        format!(
            "{}/me/top/tracks?limit={}&time_range={}",
            self.base_url,
            self.page_limit,
            range.as_str()
        )
    }

    pub fn saved_tracks(&self) -> String {
        format!("{}/me/tracks?limit={}", self.base_url, self.page_limit)
    }

    pub fn playlists(&self) -> String {
        format!("{}/me/playlists?limit={}", self.base_url, self.page_limit)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, MAX_PAGE_LIMIT)
    }
}
