//! SQLite schema definitions for the media catalog database.
//!
//! Every ordered table has an `AUTOINCREMENT` integer `id` primary key, so
//! the id of a removed record never comes back, and a `position` column.
//! Child tables reference their parent with `ON DELETE CASCADE` as a
//! backstop; the store still removes children explicitly so it can renumber.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const fn parent_key(foreign_table: &'static str) -> ForeignKey {
    ForeignKey {
        foreign_table,
        foreign_column: "id",
        on_delete: ForeignKeyOnChange::Cascade,
    }
}

const MOVIE_KEY: ForeignKey = parent_key("movies");
const SHOW_KEY: ForeignKey = parent_key("shows");
const SEASON_KEY: ForeignKey = parent_key("seasons");
const MUSIC_KEY: ForeignKey = parent_key("music");
const GENRE_KEY: ForeignKey = parent_key("genres");

// =============================================================================
// Version 1
// =============================================================================

const GENRES_TABLE_V1: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_genres_position", "position")],
    unique_constraints: &[],
};

const MOVIES_TABLE_V1: Table = Table {
    name: "movies",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!("czech_name", &SqlType::Text, non_null = true),
        sqlite_column!("original_name", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("language", &SqlType::Text, non_null = true),
        sqlite_column!("subtitles", &SqlType::Text, non_null = true), // JSON array of languages
        sqlite_column!("csfd", &SqlType::Text, non_null = true),
        sqlite_column!("imdb_code", &SqlType::Integer, non_null = true),
        sqlite_column!("wiki_en", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_cz", &SqlType::Text, non_null = true),
        sqlite_column!("picture", &SqlType::Text),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_movies_position", "position")],
    unique_constraints: &[],
};

const MEDIA_TABLE_V1: Table = Table {
    name: "media",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!(
            "movie_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MOVIE_KEY)
        ),
        sqlite_column!("length", &SqlType::Integer, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_media_movie", "movie_id, position")],
    unique_constraints: &[],
};

const MOVIE_GENRES_TABLE_V1: Table = Table {
    name: "movie_genres",
    columns: &[
        sqlite_column!(
            "movie_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MOVIE_KEY)
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GENRE_KEY)
        ),
    ],
    indices: &[("idx_movie_genres_genre", "genre_id")],
    unique_constraints: &[&["movie_id", "genre_id"]],
};

const SHOWS_TABLE_V1: Table = Table {
    name: "shows",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!("czech_name", &SqlType::Text, non_null = true),
        sqlite_column!("original_name", &SqlType::Text, non_null = true),
        sqlite_column!("csfd", &SqlType::Text, non_null = true),
        sqlite_column!("imdb_code", &SqlType::Integer, non_null = true),
        sqlite_column!("wiki_en", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_cz", &SqlType::Text, non_null = true),
        sqlite_column!("picture", &SqlType::Text),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_shows_position", "position")],
    unique_constraints: &[],
};

const SHOW_GENRES_TABLE_V1: Table = Table {
    name: "show_genres",
    columns: &[
        sqlite_column!(
            "show_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SHOW_KEY)
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GENRE_KEY)
        ),
    ],
    indices: &[("idx_show_genres_genre", "genre_id")],
    unique_constraints: &[&["show_id", "genre_id"]],
};

const SEASONS_TABLE_V1: Table = Table {
    name: "seasons",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!(
            "show_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SHOW_KEY)
        ),
        sqlite_column!("number", &SqlType::Integer, non_null = true),
        sqlite_column!("start_year", &SqlType::Integer, non_null = true),
        sqlite_column!("end_year", &SqlType::Integer, non_null = true),
        sqlite_column!("language", &SqlType::Text, non_null = true),
        sqlite_column!("subtitles", &SqlType::Text, non_null = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_seasons_show", "show_id, position")],
    unique_constraints: &[],
};

const EPISODES_TABLE_V1: Table = Table {
    name: "episodes",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!(
            "season_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SEASON_KEY)
        ),
        sqlite_column!("number", &SqlType::Integer, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("length", &SqlType::Integer, non_null = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_episodes_season", "season_id, position")],
    unique_constraints: &[],
};

const GAMES_TABLE_V1: Table = Table {
    name: "games",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_en", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_cz", &SqlType::Text, non_null = true),
        sqlite_column!("media_count", &SqlType::Integer, non_null = true),
        sqlite_column!("crack", &SqlType::Integer, non_null = true),
        sqlite_column!("serial_key", &SqlType::Integer, non_null = true),
        sqlite_column!("patch", &SqlType::Integer, non_null = true),
        sqlite_column!("trainer", &SqlType::Integer, non_null = true),
        sqlite_column!("trainer_data", &SqlType::Integer, non_null = true),
        sqlite_column!("editor", &SqlType::Integer, non_null = true),
        sqlite_column!("saves", &SqlType::Integer, non_null = true),
        sqlite_column!("other_data", &SqlType::Text, non_null = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_games_position", "position")],
    unique_constraints: &[],
};

const PROGRAMS_TABLE_V1: Table = Table {
    name: "programs",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_en", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_cz", &SqlType::Text, non_null = true),
        sqlite_column!("media_count", &SqlType::Integer, non_null = true),
        sqlite_column!("crack", &SqlType::Integer, non_null = true),
        sqlite_column!("serial_key", &SqlType::Integer, non_null = true),
        sqlite_column!("other_data", &SqlType::Text, non_null = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_programs_position", "position")],
    unique_constraints: &[],
};

const MUSIC_TABLE_V1: Table = Table {
    name: "music",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_en", &SqlType::Text, non_null = true),
        sqlite_column!("wiki_cz", &SqlType::Text, non_null = true),
        sqlite_column!("media_count", &SqlType::Integer, non_null = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_music_position", "position")],
    unique_constraints: &[],
};

const SONGS_TABLE_V1: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Integer,
            is_primary_key = true,
            autoincrement = true
        ),
        sqlite_column!(
            "music_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&MUSIC_KEY)
        ),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("length", &SqlType::Integer, non_null = true),
        sqlite_column!("note", &SqlType::Text, non_null = true),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_songs_music", "music_id, position")],
    unique_constraints: &[],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[
        GENRES_TABLE_V1,
        MOVIES_TABLE_V1,
        MEDIA_TABLE_V1,
        MOVIE_GENRES_TABLE_V1,
        SHOWS_TABLE_V1,
        SHOW_GENRES_TABLE_V1,
        SEASONS_TABLE_V1,
        EPISODES_TABLE_V1,
        GAMES_TABLE_V1,
        PROGRAMS_TABLE_V1,
        MUSIC_TABLE_V1,
        SONGS_TABLE_V1,
    ],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::kind::EntityKind;
    use rusqlite::Connection;

    fn latest() -> &'static VersionedSchema {
        CATALOG_VERSIONED_SCHEMAS.last().unwrap()
    }

    #[test]
    fn test_schema_creates_successfully() {
        let conn = Connection::open_in_memory().unwrap();
        latest().create(&conn).unwrap();
        latest().validate(&conn).unwrap();
    }

    #[test]
    fn test_tables_cover_every_kind_descriptor() {
        for kind in EntityKind::ALL {
            let table = latest()
                .tables
                .iter()
                .find(|t| t.name == kind.table())
                .unwrap_or_else(|| panic!("no table for {}", kind));

            let names: Vec<&str> = table.columns.iter().map(|c| c.name).collect();
            assert!(names.contains(&"id"));
            assert!(names.contains(&"position"));
            for column in kind.data_columns() {
                assert!(names.contains(column), "{} lacks {}", kind, column);
            }
            if let Some(parent) = kind.parent() {
                assert!(names.contains(&parent.column));
            }
        }
    }

    #[test]
    fn test_deleting_movie_cascades_to_media() {
        let conn = Connection::open_in_memory().unwrap();
        latest().create(&conn).unwrap();

        conn.execute(
            "INSERT INTO movies (id, czech_name, original_name, year, language, subtitles, csfd, imdb_code, wiki_en, wiki_cz, note, position)
             VALUES (1, 'Film', 'Movie', 2000, 'EN', '[]', '', -1, '', '', '', 0)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO media (movie_id, length, position) VALUES (1, 100, 0)",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM movies WHERE id = 1", []).unwrap();
        let media: i64 = conn
            .query_row("SELECT COUNT(*) FROM media", [], |r| r.get(0))
            .unwrap();
        assert_eq!(media, 0);
    }
}
