//! Validation for catalog entities.
//!
//! Field-level checks run before a record reaches the store. Structural
//! checks (missing parents, unknown ids) are left to the store itself.

use super::models::{Episode, Game, Genre, Movie, Music, Program, Season, Show, Song};
use chrono::Datelike;
use std::fmt;

/// Oldest year accepted for movies and seasons.
pub const MIN_YEAR: i32 = 1930;
/// Largest IMDB code accepted; `-1` marks an unknown code.
pub const MAX_IMDB_CODE: i32 = 9_999_999;

/// Validation error types
#[derive(Debug)]
pub enum ValidationError {
    EmptyField {
        field: &'static str,
    },
    NonPositiveValue {
        field: &'static str,
        value: i64,
    },
    NegativeValue {
        field: &'static str,
        value: i64,
    },
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    YearOrder {
        start_year: i32,
        end_year: i32,
    },
    MissingMedia,
    InvalidImdbCode {
        value: i32,
    },
    MissingId {
        entity_type: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::NonPositiveValue { field, value } => {
                write!(f, "Field '{}' must be positive, got {}", field, value)
            }
            ValidationError::NegativeValue { field, value } => {
                write!(f, "Field '{}' must be non-negative, got {}", field, value)
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "Field '{}' must be between {} and {}, got {}",
                    field, min, max, value
                )
            }
            ValidationError::YearOrder {
                start_year,
                end_year,
            } => {
                write!(
                    f,
                    "Starting year {} is after ending year {}",
                    start_year, end_year
                )
            }
            ValidationError::MissingMedia => write!(f, "A movie needs at least one medium"),
            ValidationError::InvalidImdbCode { value } => {
                write!(
                    f,
                    "IMDB code must be -1 or between 1 and {}, got {}",
                    MAX_IMDB_CODE, value
                )
            }
            ValidationError::MissingId { entity_type } => {
                write!(f, "Referenced {} has no id", entity_type)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

fn require_text(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

fn require_year(field: &'static str, year: i32) -> ValidationResult<()> {
    let current = chrono::Local::now().year();
    if year < MIN_YEAR || year > current {
        return Err(ValidationError::OutOfRange {
            field,
            value: year as i64,
            min: MIN_YEAR as i64,
            max: current as i64,
        });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: i64) -> ValidationResult<()> {
    if value < 1 {
        return Err(ValidationError::NonPositiveValue { field, value });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(())
}

fn require_imdb_code(value: i32) -> ValidationResult<()> {
    if value == -1 || (1..=MAX_IMDB_CODE).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidImdbCode { value })
    }
}

fn require_genre_ids(genres: &[Genre]) -> ValidationResult<()> {
    if genres.iter().any(|genre| genre.id.is_none()) {
        return Err(ValidationError::MissingId {
            entity_type: "genre",
        });
    }
    Ok(())
}

pub fn validate_genre(genre: &Genre) -> ValidationResult<()> {
    require_text("name", &genre.name)
}

pub fn validate_movie(movie: &Movie) -> ValidationResult<()> {
    require_text("czech_name", &movie.czech_name)?;
    require_text("original_name", &movie.original_name)?;
    require_year("year", movie.year)?;
    require_imdb_code(movie.imdb_code)?;
    if movie.media.is_empty() {
        return Err(ValidationError::MissingMedia);
    }
    for medium in &movie.media {
        require_non_negative("length", medium.length)?;
    }
    require_genre_ids(&movie.genres)
}

pub fn validate_show(show: &Show) -> ValidationResult<()> {
    require_text("czech_name", &show.czech_name)?;
    require_text("original_name", &show.original_name)?;
    require_imdb_code(show.imdb_code)?;
    require_genre_ids(&show.genres)
}

/// Validate a season (years must be in range and ordered)
pub fn validate_season(season: &Season) -> ValidationResult<()> {
    require_positive("number", season.number as i64)?;
    require_year("start_year", season.start_year)?;
    require_year("end_year", season.end_year)?;
    if season.start_year > season.end_year {
        return Err(ValidationError::YearOrder {
            start_year: season.start_year,
            end_year: season.end_year,
        });
    }
    Ok(())
}

pub fn validate_episode(episode: &Episode) -> ValidationResult<()> {
    require_positive("number", episode.number as i64)?;
    require_text("name", &episode.name)?;
    require_non_negative("length", episode.length)
}

pub fn validate_game(game: &Game) -> ValidationResult<()> {
    require_text("name", &game.name)?;
    require_positive("media_count", game.media_count as i64)
}

pub fn validate_program(program: &Program) -> ValidationResult<()> {
    require_text("name", &program.name)?;
    require_positive("media_count", program.media_count as i64)
}

pub fn validate_music(music: &Music) -> ValidationResult<()> {
    require_text("name", &music.name)?;
    require_positive("media_count", music.media_count as i64)
}

pub fn validate_song(song: &Song) -> ValidationResult<()> {
    require_text("name", &song.name)?;
    require_non_negative("length", song.length)
}
