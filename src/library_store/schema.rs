//! Database schema for the library database.
//!
//! Artists and tracks are shared by every user and keyed by their catalog
//! external ID; `user_tracks` records which user has which track.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, OnDelete, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

const USERS_TABLE_V1: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("handle", SqlType::Text, non_null = true),
        sqlite_column!(
            "ingestion_complete",
            SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "created_at",
            SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["handle"]],
};

const ARTISTS_TABLE_V1: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("external_id", SqlType::Text, non_null = true),
        sqlite_column!("name", SqlType::Text, non_null = true),
        sqlite_column!(
            "popularity",
            SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!(
            "created_at",
            SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[],
    unique_constraints: &[&["external_id"]],
};

const TRACKS_TABLE_V1: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("id", SqlType::Integer, is_primary_key = true),
        sqlite_column!("external_id", SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "artists",
                foreign_column: "id",
                on_delete: OnDelete::Restrict,
            })
        ),
        sqlite_column!("name", SqlType::Text, non_null = true),
        sqlite_column!(
            "popularity",
            SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("preview_url", SqlType::Text),
        sqlite_column!(
            "created_at",
            SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_tracks_artist", "artist_id")],
    unique_constraints: &[&["external_id"]],
};

const USER_TRACKS_TABLE_V1: Table = Table {
    name: "user_tracks",
    columns: &[
        sqlite_column!(
            "user_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "users",
                foreign_column: "id",
                on_delete: OnDelete::Cascade,
            })
        ),
        sqlite_column!(
            "track_id",
            SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ForeignKey {
                foreign_table: "tracks",
                foreign_column: "id",
                on_delete: OnDelete::Cascade,
            })
        ),
        sqlite_column!(
            "created_at",
            SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_user_tracks_track", "track_id")],
    unique_constraints: &[&["user_id", "track_id"]],
};

pub const LIBRARY_SCHEMA: VersionedSchema = VersionedSchema {
    version: 1,
    tables: &[
        USERS_TABLE_V1,
        ARTISTS_TABLE_V1,
        TRACKS_TABLE_V1,
        USER_TRACKS_TABLE_V1,
    ],
};
