//! Catalog models.
//!
//! `id` is `None` for records not yet stored. `position` is assigned by the
//! store and ignored on insert and update.

use serde::{Deserialize, Serialize};

// =============================================================================
// Enumerations
// =============================================================================

/// Audio/subtitle language
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Language {
    Cz,
    En,
    Fr,
    Ja,
    Sk,
}

impl Language {
    /// Convert from database string representation
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "CZ" => Some(Language::Cz),
            "EN" => Some(Language::En),
            "FR" => Some(Language::Fr),
            "JA" => Some(Language::Ja),
            "SK" => Some(Language::Sk),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Language::Cz => "CZ",
            Language::En => "EN",
            Language::Fr => "FR",
            Language::Ja => "JA",
            Language::Sk => "SK",
        }
    }
}

// =============================================================================
// Top-level entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<i64>,
    pub name: String,
    pub position: i64,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Genre {
            id: None,
            name: name.into(),
            position: 0,
        }
    }
}

/// One physical medium (disc, tape) of a movie.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medium {
    pub id: Option<i64>,
    /// 1-based, follows the medium's position inside its movie.
    pub number: i64,
    /// Length in minutes.
    pub length: i64,
}

impl Medium {
    pub fn with_length(length: i64) -> Self {
        Medium {
            id: None,
            number: 0,
            length,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Option<i64>,
    pub czech_name: String,
    pub original_name: String,
    pub year: i32,
    pub language: Language,
    pub subtitles: Vec<Language>,
    pub media: Vec<Medium>,
    pub csfd: String,
    /// -1 when unknown.
    pub imdb_code: i32,
    pub wiki_en: String,
    pub wiki_cz: String,
    pub picture: Option<String>,
    pub note: String,
    pub position: i64,
    /// Shared genres, referenced by id.
    pub genres: Vec<Genre>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: Option<i64>,
    pub czech_name: String,
    pub original_name: String,
    pub csfd: String,
    /// -1 when unknown.
    pub imdb_code: i32,
    pub wiki_en: String,
    pub wiki_cz: String,
    pub picture: Option<String>,
    pub note: String,
    pub position: i64,
    pub genres: Vec<Genre>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: Option<i64>,
    pub name: String,
    pub wiki_en: String,
    pub wiki_cz: String,
    pub media_count: i32,
    pub crack: bool,
    pub serial_key: bool,
    pub patch: bool,
    pub trainer: bool,
    pub trainer_data: bool,
    pub editor: bool,
    pub saves: bool,
    pub other_data: String,
    pub note: String,
    pub position: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: Option<i64>,
    pub name: String,
    pub wiki_en: String,
    pub wiki_cz: String,
    pub media_count: i32,
    pub crack: bool,
    pub serial_key: bool,
    pub other_data: String,
    pub note: String,
    pub position: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Music {
    pub id: Option<i64>,
    pub name: String,
    pub wiki_en: String,
    pub wiki_cz: String,
    pub media_count: i32,
    pub note: String,
    pub position: i64,
}

// =============================================================================
// Child entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: Option<i64>,
    pub number: i32,
    pub start_year: i32,
    pub end_year: i32,
    pub language: Language,
    pub subtitles: Vec<Language>,
    pub note: String,
    pub position: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: Option<i64>,
    pub number: i32,
    pub name: String,
    /// Length in minutes.
    pub length: i64,
    pub note: String,
    pub position: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: Option<i64>,
    pub name: String,
    /// Length in seconds.
    pub length: i64,
    pub note: String,
    pub position: i64,
}

/// Aggregate numbers over the whole catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub genres: i64,
    pub movies: i64,
    pub movie_media: i64,
    pub movie_length: i64,
    pub shows: i64,
    pub seasons: i64,
    pub episodes: i64,
    pub show_length: i64,
    pub games: i64,
    pub game_media: i64,
    pub programs: i64,
    pub program_media: i64,
    pub music: i64,
    pub music_media: i64,
    pub songs: i64,
    pub music_length: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_db_roundtrip_for_every_variant() {
        for language in [
            Language::Cz,
            Language::En,
            Language::Fr,
            Language::Ja,
            Language::Sk,
        ] {
            assert_eq!(
                Language::from_db_str(language.to_db_str()),
                Some(language)
            );
        }
        assert_eq!(Language::from_db_str("XX"), None);
    }
}
