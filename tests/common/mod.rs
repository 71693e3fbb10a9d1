//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestCatalog, GENRE_NAMES};
//!
//! #[test]
//! fn test_genres_are_listed() {
//!     let test = TestCatalog::seeded();
//!     assert_eq!(test.genre_names().len(), GENRE_NAMES.len());
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{
    assert_contiguous, make_episode, make_game, make_movie, make_music, make_season, make_show,
    make_song, TestCatalog,
};
