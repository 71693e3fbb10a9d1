//! Test catalog creation and record builders

#![allow(dead_code)]

use super::constants::*;
use media_catalog::catalog_store::{
    EntityKind, Episode, Game, Genre, Language, Medium, Movie, Music, Season, Show, Song,
    SqliteCatalogStore,
};
use media_catalog::Catalog;
use std::path::PathBuf;
use tempfile::TempDir;

/// A catalog on a temporary on-disk database, removed when dropped.
pub struct TestCatalog {
    pub catalog: Catalog,
    pub db_path: PathBuf,
    pub genres: Vec<Genre>,
    pub movie: Option<Movie>,
    pub show: Option<Show>,
    pub seasons: Vec<Season>,
    pub music: Option<Music>,
    _temp_dir: TempDir,
}

impl TestCatalog {
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("catalog.db");
        let catalog = Catalog::open(&db_path).expect("Failed to open catalog");
        TestCatalog {
            catalog,
            db_path,
            genres: vec![],
            movie: None,
            show: None,
            seasons: vec![],
            music: None,
            _temp_dir: temp_dir,
        }
    }

    /// Three genres, a two-medium movie tagged with the first two genres, a
    /// show with two seasons of three episodes, an album with three songs
    /// and two games.
    pub fn seeded() -> Self {
        let mut test = Self::empty();
        let catalog = &test.catalog;

        test.genres = GENRE_NAMES
            .iter()
            .map(|name| catalog.genres.add(&Genre::new(*name)).unwrap())
            .collect();

        test.movie = Some(
            catalog
                .movies
                .add(&make_movie(
                    MOVIE_CZECH_NAME,
                    &MOVIE_MEDIA_LENGTHS,
                    test.genres[..2].to_vec(),
                ))
                .unwrap(),
        );

        let show = catalog
            .shows
            .add(&make_show(SHOW_NAME, vec![test.genres[0].clone()]))
            .unwrap();
        for (index, lengths) in SEASON_EPISODE_LENGTHS.iter().enumerate() {
            let season = catalog
                .seasons
                .add_to(&show, &make_season(index as i32 + 1))
                .unwrap();
            for (number, length) in lengths.iter().enumerate() {
                catalog
                    .episodes
                    .add_to(&season, &make_episode(number as i32 + 1, *length))
                    .unwrap();
            }
            test.seasons.push(season);
        }
        test.show = Some(show);

        let music = catalog.music.add(&make_music(MUSIC_NAME)).unwrap();
        for (name, length) in SONGS {
            catalog
                .songs
                .add_to(&music, &make_song(name, length))
                .unwrap();
        }
        test.music = Some(music);

        for name in GAME_NAMES {
            catalog
                .games
                .add(&make_game(name, GAME_MEDIA_COUNT))
                .unwrap();
        }

        test
    }

    pub fn store(&self) -> &SqliteCatalogStore {
        self.catalog.store()
    }

    pub fn movie(&self) -> &Movie {
        self.movie.as_ref().expect("catalog was not seeded")
    }

    pub fn show(&self) -> &Show {
        self.show.as_ref().expect("catalog was not seeded")
    }

    pub fn music(&self) -> &Music {
        self.music.as_ref().expect("catalog was not seeded")
    }

    pub fn genre_names(&self) -> Vec<String> {
        self.catalog
            .genres
            .get_all()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect()
    }

    /// Reopens the database file through a fresh store.
    pub fn reopen(&self) -> Catalog {
        Catalog::open(&self.db_path).expect("Failed to reopen catalog")
    }
}

/// Asserts that the scope holds positions `0..N-1` exactly once each.
pub fn assert_contiguous(store: &SqliteCatalogStore, kind: EntityKind, parent: Option<i64>) {
    let positions: Vec<i64> = store
        .scope_slots(kind, parent)
        .unwrap()
        .into_iter()
        .map(|slot| slot.position)
        .collect();
    let expected: Vec<i64> = (0..positions.len() as i64).collect();
    assert_eq!(
        positions, expected,
        "{} scope {:?} is not contiguous",
        kind, parent
    );
}

pub fn make_movie(name: &str, media_lengths: &[i64], genres: Vec<Genre>) -> Movie {
    Movie {
        id: None,
        czech_name: name.to_string(),
        original_name: MOVIE_ORIGINAL_NAME.to_string(),
        year: MOVIE_YEAR,
        language: Language::En,
        subtitles: vec![Language::Cz, Language::Sk],
        media: media_lengths
            .iter()
            .map(|length| Medium::with_length(*length))
            .collect(),
        csfd: "https://www.csfd.cz/film/6712".to_string(),
        imdb_code: 76759,
        wiki_en: String::new(),
        wiki_cz: String::new(),
        picture: None,
        note: String::new(),
        position: 0,
        genres,
    }
}

pub fn make_show(name: &str, genres: Vec<Genre>) -> Show {
    Show {
        id: None,
        czech_name: name.to_string(),
        original_name: name.to_string(),
        csfd: String::new(),
        imdb_code: -1,
        wiki_en: String::new(),
        wiki_cz: String::new(),
        picture: None,
        note: String::new(),
        position: 0,
        genres,
    }
}

pub fn make_season(number: i32) -> Season {
    Season {
        id: None,
        number,
        start_year: 1990,
        end_year: 1991,
        language: Language::En,
        subtitles: vec![Language::Cz],
        note: String::new(),
        position: 0,
    }
}

pub fn make_episode(number: i32, length: i64) -> Episode {
    Episode {
        id: None,
        number,
        name: format!("Episode {}", number),
        length,
        note: String::new(),
        position: 0,
    }
}

pub fn make_music(name: &str) -> Music {
    Music {
        id: None,
        name: name.to_string(),
        wiki_en: String::new(),
        wiki_cz: String::new(),
        media_count: 1,
        note: String::new(),
        position: 0,
    }
}

pub fn make_song(name: &str, length: i64) -> Song {
    Song {
        id: None,
        name: name.to_string(),
        length,
        note: String::new(),
        position: 0,
    }
}

pub fn make_game(name: &str, media_count: i32) -> Game {
    Game {
        id: None,
        name: name.to_string(),
        wiki_en: String::new(),
        wiki_cz: String::new(),
        media_count,
        crack: false,
        serial_key: true,
        patch: false,
        trainer: false,
        trainer_data: false,
        editor: false,
        saves: false,
        other_data: String::new(),
        note: String::new(),
        position: 0,
    }
}
