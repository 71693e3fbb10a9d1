//! Row mapping between catalog models and their tables.
//!
//! [`CatalogEntity`] is the capability set the ordered collection manager
//! needs from a record type: a kind descriptor, an optional id, a position
//! and a flat list of column values. Relations that do not live in the
//! record's own row (movie media, genre links) are loaded and saved through
//! the `*_relations` hooks.

use super::error::{CatalogError, CatalogResult};
use super::kind::{AssociationTable, EntityKind, MOVIE_GENRES, SHOW_GENRES};
use super::models::{
    Episode, Game, Genre, Language, Medium, Movie, Music, Program, Season, Show, Song,
};
use super::ordered;
use super::validation::{self, ValidationResult};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Type, Value, ValueRef};
use rusqlite::{params, Connection, Row};
use std::fmt::Debug;

pub trait CatalogEntity: Clone + Debug + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> Option<i64>;

    fn position(&self) -> i64;

    /// One value per entry of `KIND.data_columns()`, in the same order.
    fn column_values(&self) -> CatalogResult<Vec<Value>>;

    /// Builds a record from a row selected with [`select_list`].
    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    fn load_relations(&mut self, _conn: &Connection) -> CatalogResult<()> {
        Ok(())
    }

    /// Replaces the relations of the stored record `id` with this record's.
    fn save_relations(&self, _conn: &Connection, _id: i64) -> CatalogResult<()> {
        Ok(())
    }

    fn validate(&self) -> ValidationResult<()>;
}

/// Top-level record types, positioned in one global scope.
pub trait RootEntity: CatalogEntity {}

/// Record types positioned inside a parent record.
pub trait ChildEntity: CatalogEntity {
    type Parent: CatalogEntity;
}

/// `id, position, <data columns>` of a kind, optionally prefixed with a
/// table alias.
pub fn select_list(kind: EntityKind, alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{}.", a)).unwrap_or_default();
    ["id", "position"]
        .iter()
        .chain(kind.data_columns())
        .map(|column| format!("{}{}", prefix, column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Children of one parent record, in position order, with their relations.
pub fn query_children<E: ChildEntity>(conn: &Connection, parent_id: i64) -> CatalogResult<Vec<E>> {
    let Some(link) = E::KIND.parent() else {
        return Ok(Vec::new());
    };
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE {} = ?1 ORDER BY position, id",
        select_list(E::KIND, None),
        E::KIND.table(),
        link.column
    ))?;
    let mut children = stmt
        .query_map(params![parent_id], |row| E::from_row(row))?
        .collect::<Result<Vec<E>, _>>()?;
    for child in children.iter_mut() {
        child.load_relations(conn)?;
    }
    Ok(children)
}

// =============================================================================
// Column helpers
// =============================================================================

impl FromSql for Language {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Self::from_db_str(s)
            .ok_or_else(|| FromSqlError::Other(format!("Unknown language '{}'", s).into()))
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn flag(value: bool) -> Value {
    Value::Integer(value as i64)
}

fn subtitles_value(subtitles: &[Language]) -> CatalogResult<Value> {
    let codes: Vec<&str> = subtitles.iter().map(|l| l.to_db_str()).collect();
    Ok(Value::Text(serde_json::to_string(&codes)?))
}

fn read_subtitles(row: &Row, column: &str) -> rusqlite::Result<Vec<Language>> {
    let raw: String = row.get(column)?;
    let index = row.as_ref().column_index(column)?;
    let codes: Vec<String> = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))?;
    codes
        .iter()
        .map(|code| {
            Language::from_db_str(code).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    index,
                    Type::Text,
                    format!("Unknown language '{}'", code).into(),
                )
            })
        })
        .collect()
}

fn load_genres(
    conn: &Connection,
    association: &AssociationTable,
    owner_id: i64,
) -> CatalogResult<Vec<Genre>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM genres g JOIN {} l ON l.{} = g.id WHERE l.{} = ?1 ORDER BY g.position",
        select_list(EntityKind::Genre, Some("g")),
        association.table,
        association.target_column,
        association.owner_column
    ))?;
    let genres = stmt
        .query_map(params![owner_id], Genre::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(genres)
}

fn save_genres(
    conn: &Connection,
    association: &AssociationTable,
    owner_id: i64,
    genres: &[Genre],
) -> CatalogResult<()> {
    conn.execute(
        &format!(
            "DELETE FROM {} WHERE {} = ?1",
            association.table, association.owner_column
        ),
        params![owner_id],
    )?;
    let insert = format!(
        "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?1, ?2)",
        association.table, association.owner_column, association.target_column
    );
    for genre in genres {
        let genre_id = genre.id.ok_or(CatalogError::MissingId {
            kind: EntityKind::Genre,
        })?;
        if !ordered::exists(conn, EntityKind::Genre, genre_id)? {
            return Err(CatalogError::RecordNotFound {
                kind: EntityKind::Genre,
                id: genre_id,
            });
        }
        conn.execute(&insert, params![owner_id, genre_id])?;
    }
    Ok(())
}

// =============================================================================
// Implementations
// =============================================================================

impl CatalogEntity for Genre {
    const KIND: EntityKind = EntityKind::Genre;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![text(&self.name)])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Genre {
            id: row.get("id")?,
            name: row.get("name")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_genre(self)
    }
}

impl RootEntity for Genre {}

impl CatalogEntity for Medium {
    const KIND: EntityKind = EntityKind::Medium;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.number - 1
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![Value::Integer(self.length)])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let position: i64 = row.get("position")?;
        Ok(Medium {
            id: row.get("id")?,
            number: position + 1,
            length: row.get("length")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        if self.length < 0 {
            return Err(validation::ValidationError::NegativeValue {
                field: "length",
                value: self.length,
            });
        }
        Ok(())
    }
}

impl ChildEntity for Medium {
    type Parent = Movie;
}

impl CatalogEntity for Movie {
    const KIND: EntityKind = EntityKind::Movie;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            text(&self.czech_name),
            text(&self.original_name),
            Value::Integer(self.year as i64),
            text(self.language.to_db_str()),
            subtitles_value(&self.subtitles)?,
            text(&self.csfd),
            Value::Integer(self.imdb_code as i64),
            text(&self.wiki_en),
            text(&self.wiki_cz),
            self.picture.as_deref().map(text).unwrap_or(Value::Null),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Movie {
            id: row.get("id")?,
            czech_name: row.get("czech_name")?,
            original_name: row.get("original_name")?,
            year: row.get("year")?,
            language: row.get("language")?,
            subtitles: read_subtitles(row, "subtitles")?,
            media: Vec::new(),
            csfd: row.get("csfd")?,
            imdb_code: row.get("imdb_code")?,
            wiki_en: row.get("wiki_en")?,
            wiki_cz: row.get("wiki_cz")?,
            picture: row.get("picture")?,
            note: row.get("note")?,
            position: row.get("position")?,
            genres: Vec::new(),
        })
    }

    fn load_relations(&mut self, conn: &Connection) -> CatalogResult<()> {
        if let Some(id) = self.id {
            self.media = query_children::<Medium>(conn, id)?;
            self.genres = load_genres(conn, &MOVIE_GENRES, id)?;
        }
        Ok(())
    }

    /// Media are matched to the stored rows by position: matched rows keep
    /// their id and get the new length, extra rows are dropped from the tail
    /// and extra media are appended.
    fn save_relations(&self, conn: &Connection, id: i64) -> CatalogResult<()> {
        let stored = ordered::slots_in_scope(conn, EntityKind::Medium, Some(id))?;
        for (slot, medium) in stored.iter().zip(&self.media) {
            conn.execute(
                "UPDATE media SET length = ?1 WHERE id = ?2",
                params![medium.length, slot.id],
            )?;
        }
        for slot in stored.iter().skip(self.media.len()) {
            conn.execute("DELETE FROM media WHERE id = ?1", params![slot.id])?;
        }
        ordered::renumber_scope(conn, EntityKind::Medium, Some(id))?;
        for medium in self.media.iter().skip(stored.len()) {
            ordered::append(conn, EntityKind::Medium, Some(id), medium.column_values()?)?;
        }
        save_genres(conn, &MOVIE_GENRES, id, &self.genres)
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_movie(self)
    }
}

impl RootEntity for Movie {}

impl CatalogEntity for Show {
    const KIND: EntityKind = EntityKind::Show;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            text(&self.czech_name),
            text(&self.original_name),
            text(&self.csfd),
            Value::Integer(self.imdb_code as i64),
            text(&self.wiki_en),
            text(&self.wiki_cz),
            self.picture.as_deref().map(text).unwrap_or(Value::Null),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Show {
            id: row.get("id")?,
            czech_name: row.get("czech_name")?,
            original_name: row.get("original_name")?,
            csfd: row.get("csfd")?,
            imdb_code: row.get("imdb_code")?,
            wiki_en: row.get("wiki_en")?,
            wiki_cz: row.get("wiki_cz")?,
            picture: row.get("picture")?,
            note: row.get("note")?,
            position: row.get("position")?,
            genres: Vec::new(),
        })
    }

    fn load_relations(&mut self, conn: &Connection) -> CatalogResult<()> {
        if let Some(id) = self.id {
            self.genres = load_genres(conn, &SHOW_GENRES, id)?;
        }
        Ok(())
    }

    fn save_relations(&self, conn: &Connection, id: i64) -> CatalogResult<()> {
        save_genres(conn, &SHOW_GENRES, id, &self.genres)
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_show(self)
    }
}

impl RootEntity for Show {}

impl CatalogEntity for Season {
    const KIND: EntityKind = EntityKind::Season;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            Value::Integer(self.number as i64),
            Value::Integer(self.start_year as i64),
            Value::Integer(self.end_year as i64),
            text(self.language.to_db_str()),
            subtitles_value(&self.subtitles)?,
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Season {
            id: row.get("id")?,
            number: row.get("number")?,
            start_year: row.get("start_year")?,
            end_year: row.get("end_year")?,
            language: row.get("language")?,
            subtitles: read_subtitles(row, "subtitles")?,
            note: row.get("note")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_season(self)
    }
}

impl ChildEntity for Season {
    type Parent = Show;
}

impl CatalogEntity for Episode {
    const KIND: EntityKind = EntityKind::Episode;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            Value::Integer(self.number as i64),
            text(&self.name),
            Value::Integer(self.length),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Episode {
            id: row.get("id")?,
            number: row.get("number")?,
            name: row.get("name")?,
            length: row.get("length")?,
            note: row.get("note")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_episode(self)
    }
}

impl ChildEntity for Episode {
    type Parent = Season;
}

impl CatalogEntity for Game {
    const KIND: EntityKind = EntityKind::Game;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.wiki_en),
            text(&self.wiki_cz),
            Value::Integer(self.media_count as i64),
            flag(self.crack),
            flag(self.serial_key),
            flag(self.patch),
            flag(self.trainer),
            flag(self.trainer_data),
            flag(self.editor),
            flag(self.saves),
            text(&self.other_data),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Game {
            id: row.get("id")?,
            name: row.get("name")?,
            wiki_en: row.get("wiki_en")?,
            wiki_cz: row.get("wiki_cz")?,
            media_count: row.get("media_count")?,
            crack: row.get("crack")?,
            serial_key: row.get("serial_key")?,
            patch: row.get("patch")?,
            trainer: row.get("trainer")?,
            trainer_data: row.get("trainer_data")?,
            editor: row.get("editor")?,
            saves: row.get("saves")?,
            other_data: row.get("other_data")?,
            note: row.get("note")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_game(self)
    }
}

impl RootEntity for Game {}

impl CatalogEntity for Program {
    const KIND: EntityKind = EntityKind::Program;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.wiki_en),
            text(&self.wiki_cz),
            Value::Integer(self.media_count as i64),
            flag(self.crack),
            flag(self.serial_key),
            text(&self.other_data),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Program {
            id: row.get("id")?,
            name: row.get("name")?,
            wiki_en: row.get("wiki_en")?,
            wiki_cz: row.get("wiki_cz")?,
            media_count: row.get("media_count")?,
            crack: row.get("crack")?,
            serial_key: row.get("serial_key")?,
            other_data: row.get("other_data")?,
            note: row.get("note")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_program(self)
    }
}

impl RootEntity for Program {}

impl CatalogEntity for Music {
    const KIND: EntityKind = EntityKind::Music;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            text(&self.wiki_en),
            text(&self.wiki_cz),
            Value::Integer(self.media_count as i64),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Music {
            id: row.get("id")?,
            name: row.get("name")?,
            wiki_en: row.get("wiki_en")?,
            wiki_cz: row.get("wiki_cz")?,
            media_count: row.get("media_count")?,
            note: row.get("note")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_music(self)
    }
}

impl RootEntity for Music {}

impl CatalogEntity for Song {
    const KIND: EntityKind = EntityKind::Song;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn column_values(&self) -> CatalogResult<Vec<Value>> {
        Ok(vec![
            text(&self.name),
            Value::Integer(self.length),
            text(&self.note),
        ])
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Song {
            id: row.get("id")?,
            name: row.get("name")?,
            length: row.get("length")?,
            note: row.get("note")?,
            position: row.get("position")?,
        })
    }

    fn validate(&self) -> ValidationResult<()> {
        validation::validate_song(self)
    }
}

impl ChildEntity for Song {
    type Parent = Music;
}
