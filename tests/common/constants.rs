//! Shared constants for end-to-end tests
//!
//! When the seeded catalog changes, update only this file.

// ============================================================================
// Genres
// ============================================================================

/// Genres seeded in this order.
pub const GENRE_NAMES: [&str; 3] = ["Drama", "Comedy", "Science fiction"];

// ============================================================================
// Movies
// ============================================================================

pub const MOVIE_CZECH_NAME: &str = "Hvězdné války";

pub const MOVIE_ORIGINAL_NAME: &str = "Star Wars";

pub const MOVIE_YEAR: i32 = 1977;

/// Lengths in minutes of the seeded movie's media.
pub const MOVIE_MEDIA_LENGTHS: [i64; 2] = [90, 31];

// ============================================================================
// Shows
// ============================================================================

pub const SHOW_NAME: &str = "Twin Peaks";

/// Episode lengths in minutes, one inner array per seeded season.
pub const SEASON_EPISODE_LENGTHS: [[i64; 3]; 2] = [[47, 46, 48], [45, 44, 47]];

// ============================================================================
// Music
// ============================================================================

pub const MUSIC_NAME: &str = "Kind of Blue";

/// Song names and lengths in seconds.
pub const SONGS: [(&str, i64); 3] = [
    ("So What", 562),
    ("Freddie Freeloader", 586),
    ("Blue in Green", 337),
];

// ============================================================================
// Games and programs
// ============================================================================

pub const GAME_NAMES: [&str; 2] = ["Doom", "Quake"];

/// Media count of every seeded game.
pub const GAME_MEDIA_COUNT: i32 = 2;
