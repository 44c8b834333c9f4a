//! Scripted listening history.

use super::catalog::TestCatalog;
use super::constants::PLAYLIST_ONE_PAGE_2;
use serde_json::{json, Value};

pub fn track(id: &str, artist_id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Song {}", id),
        "popularity": 42,
        "preview_url": format!("https://previews.example/{}.mp3", id),
        "artists": [{"id": artist_id, "name": format!("Artist {}", artist_id)}],
        "track": true,
        "episode": false
    })
}

pub fn saved_item(id: &str, artist_id: &str) -> Value {
    json!({"added_at": "2022-05-06T07:08:09Z", "track": track(id, artist_id)})
}

pub fn page(items: Vec<Value>, next: Option<String>) -> Value {
    json!({"items": items, "next": next})
}

pub fn playlist(id: &str, tracks_href: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Playlist {}", id),
        "tracks": {"href": tracks_href, "total": 3}
    })
}

/// Installs every listing of the test user on the catalog.
///
/// Seven distinct tracks by four artists, spread over all five listings
/// with overlaps, multi-page listings and one unavailable saved item.
pub fn install_listening_history(catalog: &TestCatalog) {
    let url = |path: &str| Some(catalog.url(path));

    catalog.set_page(
        "/v1/me/top/tracks?limit=2&time_range=long_term",
        page(
            vec![track("t1", "a1"), track("t2", "a1")],
            url("/v1/me/top/tracks?offset=2&limit=2&time_range=long_term"),
        ),
    );
    catalog.set_page(
        "/v1/me/top/tracks?offset=2&limit=2&time_range=long_term",
        page(vec![track("t3", "a2")], None),
    );
    catalog.set_page(
        "/v1/me/top/tracks?limit=2&time_range=medium_term",
        page(vec![track("t1", "a1"), track("t4", "a2")], None),
    );
    catalog.set_page(
        "/v1/me/top/tracks?limit=2&time_range=short_term",
        page(vec![], None),
    );

    catalog.set_page(
        "/v1/me/tracks?limit=2",
        page(
            vec![saved_item("t2", "a1"), saved_item("t5", "a3")],
            url("/v1/me/tracks?offset=2&limit=2"),
        ),
    );
    catalog.set_page(
        "/v1/me/tracks?offset=2&limit=2",
        page(
            vec![json!({"added_at": "2022-05-06T07:08:09Z", "track": null})],
            None,
        ),
    );

    catalog.set_page(
        "/v1/me/playlists?limit=2",
        page(
            vec![
                playlist("one", &catalog.url("/v1/playlists/one/tracks")),
                playlist("two", &catalog.url("/v1/playlists/two/tracks")),
            ],
            url("/v1/me/playlists?offset=2&limit=2"),
        ),
    );
    catalog.set_page(
        "/v1/me/playlists?offset=2&limit=2",
        page(
            vec![
                playlist("one-copy", &catalog.url("/v1/playlists/one/tracks")),
                json!({"id": "local-files", "name": "Local files"}),
            ],
            None,
        ),
    );
    catalog.set_page(
        "/v1/playlists/one/tracks",
        page(
            vec![saved_item("t6", "a4"), saved_item("t1", "a1")],
            url(PLAYLIST_ONE_PAGE_2),
        ),
    );
    catalog.set_page(PLAYLIST_ONE_PAGE_2, page(vec![saved_item("t7", "a4")], None));
    catalog.set_page(
        "/v1/playlists/two/tracks",
        page(vec![saved_item("t5", "a3")], None),
    );
}
