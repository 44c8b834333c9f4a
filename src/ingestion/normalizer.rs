//! Turns raw catalog records into the fields the library stores.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Canonical fields extracted from one track record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTrack {
    pub external_id: String,
    pub name: String,
    pub popularity: u32,
    pub preview_url: Option<String>,
    pub artist_external_id: String,
    pub artist_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The envelope carried no track (removed or unavailable item).
    MissingTrack,
    MissingExternalId,
    /// No artist, or the first artist has no external ID.
    MissingArtist,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingTrack => "missing_track",
            SkipReason::MissingExternalId => "missing_external_id",
            SkipReason::MissingArtist => "missing_artist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Track(NormalizedTrack),
    Skip(SkipReason),
}

// Every field is read leniently: a value of the wrong type counts as absent,
// so only the identifying fields decide whether a record is kept.
#[derive(Debug, Deserialize)]
struct RawTrack {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_popularity")]
    popularity: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    preview_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    artists: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_popularity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let popularity = value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64));
    Ok(popularity.map(|p| p.min(u32::MAX as u64) as u32))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Returns the track object of a record, looking through saved-item and
/// playlist-item envelopes. `None` means the envelope holds no track.
///
/// Bare playlist tracks carry a boolean `track` flag, so only an object or
/// null under `track` counts as an envelope.
fn unwrap_envelope(record: &Value) -> Option<&Value> {
    let Some(obj) = record.as_object() else {
        return Some(record);
    };
    if obj.contains_key("artists") {
        return Some(record);
    }
    match obj.get("track") {
        Some(Value::Null) => None,
        Some(inner @ Value::Object(_)) => Some(inner),
        _ => Some(record),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Normalize one raw record. Never touches the network or the store.
pub fn normalize(record: &Value) -> Normalized {
    let Some(track) = unwrap_envelope(record) else {
        return Normalized::Skip(SkipReason::MissingTrack);
    };

    // Only a non-object track fails here, and it has no ID to speak of
    let Ok(raw) = RawTrack::deserialize(track) else {
        return Normalized::Skip(SkipReason::MissingExternalId);
    };

    let Some(external_id) = non_empty(raw.id) else {
        return Normalized::Skip(SkipReason::MissingExternalId);
    };

    let Some(artist) = raw
        .artists
        .first()
        .and_then(|a| RawArtist::deserialize(a).ok())
    else {
        return Normalized::Skip(SkipReason::MissingArtist);
    };
    let Some(artist_external_id) = non_empty(artist.id) else {
        return Normalized::Skip(SkipReason::MissingArtist);
    };

    Normalized::Track(NormalizedTrack {
        external_id,
        name: raw.name.unwrap_or_default(),
        popularity: raw.popularity.unwrap_or(0),
        preview_url: raw.preview_url,
        artist_external_id,
        artist_name: artist.name.unwrap_or_default(),
    })
}
