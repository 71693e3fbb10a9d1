//! End-to-end tests for owned children and shared genre links
//!
//! Shows own seasons and episodes, movies own media, music owns songs.
//! Genres are shared between movies and shows.

mod common;

use common::{
    assert_contiguous, make_movie, make_season, TestCatalog, GAME_MEDIA_COUNT, GAME_NAMES,
    GENRE_NAMES, MOVIE_MEDIA_LENGTHS, SEASON_EPISODE_LENGTHS, SONGS,
};
use media_catalog::catalog_store::{CatalogStats, EntityKind, Episode, Genre, Medium};
use media_catalog::FacadeError;

fn position_lengths(episodes: &[Episode]) -> Vec<(i64, i64)> {
    episodes.iter().map(|e| (e.position, e.length)).collect()
}

// =============================================================================
// Cascade remove
// =============================================================================

#[test]
fn test_removing_a_show_removes_its_subtree() {
    let test = TestCatalog::seeded();
    let second_show = test
        .catalog
        .shows
        .add(&common::make_show("Second", vec![]))
        .unwrap();

    let removed = test
        .catalog
        .remove(EntityKind::Show, test.show().id.unwrap())
        .unwrap();

    // show + 2 seasons + 6 episodes
    assert_eq!(removed, 9);
    assert_eq!(test.catalog.seasons.count().unwrap(), 0);
    assert_eq!(test.catalog.episodes.count().unwrap(), 0);
    let shows = test.catalog.shows.get_all().unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].id, second_show.id);
    assert_eq!(shows[0].position, 0);
}

#[test]
fn test_removing_a_season_renumbers_its_siblings() {
    let test = TestCatalog::seeded();

    test.catalog.seasons.remove(&test.seasons[0]).unwrap();

    let seasons = test.catalog.seasons.find_by_parent(test.show()).unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].id, test.seasons[1].id);
    assert_eq!(seasons[0].position, 0);
    assert_eq!(
        test.catalog.episodes.count().unwrap(),
        SEASON_EPISODE_LENGTHS[1].len() as i64
    );
}

#[test]
fn test_removing_a_genre_drops_its_links() {
    let test = TestCatalog::seeded();

    test.catalog.genres.remove(&test.genres[0]).unwrap();

    let movie = test.catalog.movies.get(test.movie().id.unwrap()).unwrap().unwrap();
    assert_eq!(movie.genres.len(), 1);
    assert_eq!(movie.genres[0].name, GENRE_NAMES[1]);
    let show = test.catalog.shows.get(test.show().id.unwrap()).unwrap().unwrap();
    assert!(show.genres.is_empty());
    assert_contiguous(test.store(), EntityKind::Genre, None);
}

// =============================================================================
// Duplicate
// =============================================================================

#[test]
fn test_duplicating_a_show_deep_copies_seasons_and_episodes() {
    let test = TestCatalog::seeded();

    let copy = test.catalog.shows.duplicate(test.show()).unwrap();

    assert_ne!(copy.id, test.show().id);
    assert_eq!(copy.position, 1);
    assert_eq!(copy.genres, test.show().genres);

    let original_seasons = test.catalog.seasons.find_by_parent(test.show()).unwrap();
    let copied_seasons = test.catalog.seasons.find_by_parent(&copy).unwrap();
    assert_eq!(copied_seasons.len(), original_seasons.len());
    for (original, copied) in original_seasons.iter().zip(&copied_seasons) {
        assert_ne!(original.id, copied.id);
        assert_eq!(original.position, copied.position);
        assert_eq!(original.number, copied.number);

        let original_episodes = test.catalog.episodes.find_by_parent(original).unwrap();
        let copied_episodes = test.catalog.episodes.find_by_parent(copied).unwrap();
        assert_eq!(
            position_lengths(&original_episodes),
            position_lengths(&copied_episodes)
        );
    }
    assert_eq!(test.catalog.episodes.count().unwrap(), 12);
}

#[test]
fn test_duplicating_a_movie_shares_genres_and_copies_media() {
    let test = TestCatalog::seeded();

    let copy = test.catalog.movies.duplicate(test.movie()).unwrap();

    assert_eq!(copy.position, 1);
    assert_eq!(copy.genres, test.movie().genres);
    assert_eq!(test.catalog.genres.count().unwrap(), GENRE_NAMES.len() as i64);
    let lengths: Vec<i64> = copy.media.iter().map(|m| m.length).collect();
    assert_eq!(lengths, MOVIE_MEDIA_LENGTHS);
    let numbers: Vec<i64> = copy.media.iter().map(|m| m.number).collect();
    assert_eq!(numbers, vec![1, 2]);
    for (original, copied) in test.movie().media.iter().zip(&copy.media) {
        assert_ne!(original.id, copied.id);
    }

    // renaming a shared genre shows through both movies
    let mut drama = test.genres[0].clone();
    drama.name = "Tragedy".to_string();
    test.catalog.genres.update(&drama).unwrap();
    for movie in test.catalog.movies.get_all().unwrap() {
        assert_eq!(movie.genres[0].name, "Tragedy");
    }
}

#[test]
fn test_duplicating_a_song_appends_to_its_album() {
    let test = TestCatalog::seeded();
    let songs = test.catalog.songs.find_by_parent(test.music()).unwrap();

    let copy = test.catalog.songs.duplicate(&songs[0]).unwrap();

    assert_eq!(copy.position, SONGS.len() as i64);
    assert_eq!(copy.name, SONGS[0].0);
    assert_contiguous(test.store(), EntityKind::Song, test.music().id);
}

// =============================================================================
// Updates
// =============================================================================

#[test]
fn test_updating_a_movie_replaces_media_and_genres() {
    let test = TestCatalog::seeded();
    let mut movie = test.movie().clone();
    movie.media = vec![Medium::with_length(150)];
    movie.genres = vec![test.genres[2].clone()];
    movie.position = 42;

    test.catalog.movies.update(&movie).unwrap();

    let stored = test.catalog.movies.get(movie.id.unwrap()).unwrap().unwrap();
    assert_eq!(stored.position, 0);
    assert_eq!(stored.media.len(), 1);
    assert_eq!(stored.media[0].length, 150);
    assert_eq!(stored.genres, vec![test.genres[2].clone()]);
    assert_eq!(test.catalog.movies.get_total_length().unwrap(), 150);
}

#[test]
fn test_update_with_unknown_genre_is_rejected_atomically() {
    let test = TestCatalog::seeded();
    let mut movie = test.movie().clone();
    movie.czech_name = "Renamed".to_string();
    movie.genres.push(Genre {
        id: Some(777),
        name: "Ghost".to_string(),
        position: 0,
    });

    assert!(matches!(
        test.catalog.movies.update(&movie),
        Err(FacadeError::NotFound {
            kind: EntityKind::Genre,
            id: 777
        })
    ));
    let stored = test.catalog.movies.get(movie.id.unwrap()).unwrap().unwrap();
    assert_eq!(&stored, test.movie());
}

// =============================================================================
// Aggregates and wipes
// =============================================================================

#[test]
fn test_aggregates_over_the_seeded_catalog() {
    let test = TestCatalog::seeded();
    let catalog = &test.catalog;

    let episode_total: i64 = SEASON_EPISODE_LENGTHS.iter().flatten().sum();
    let song_total: i64 = SONGS.iter().map(|(_, length)| length).sum();

    assert_eq!(catalog.movies.get_total_media_count().unwrap(), 2);
    assert_eq!(
        catalog.movies.get_total_length().unwrap(),
        MOVIE_MEDIA_LENGTHS.iter().sum::<i64>()
    );
    assert_eq!(catalog.shows.get_seasons_count().unwrap(), 2);
    assert_eq!(catalog.shows.get_episodes_count().unwrap(), 6);
    assert_eq!(catalog.shows.get_total_length().unwrap(), episode_total);
    assert_eq!(
        catalog.seasons.get_total_length(&test.seasons[1]).unwrap(),
        SEASON_EPISODE_LENGTHS[1].iter().sum::<i64>()
    );
    assert_eq!(catalog.music.get_songs_count().unwrap(), 3);
    assert_eq!(catalog.music.get_total_length().unwrap(), song_total);
    assert_eq!(catalog.music.get_total_media_count().unwrap(), 1);
    assert_eq!(
        catalog.games.get_total_media_count().unwrap(),
        GAME_NAMES.len() as i64 * GAME_MEDIA_COUNT as i64
    );
    assert_eq!(catalog.programs.get_total_media_count().unwrap(), 0);

    let stats = catalog.stats().unwrap();
    assert_eq!(stats.episodes, 6);
    assert_eq!(stats.show_length, episode_total);
    assert_eq!(stats.music_length, song_total);
}

#[test]
fn test_new_data_wipes_one_type_and_its_dependents() {
    let test = TestCatalog::seeded();

    test.catalog.shows.new_data().unwrap();

    assert_eq!(test.catalog.shows.count().unwrap(), 0);
    assert_eq!(test.catalog.seasons.count().unwrap(), 0);
    assert_eq!(test.catalog.episodes.count().unwrap(), 0);
    assert_eq!(test.catalog.movies.count().unwrap(), 1);
    assert_eq!(test.catalog.genres.count().unwrap(), 3);

    let show = test
        .catalog
        .shows
        .add(&common::make_show("Fresh", vec![]))
        .unwrap();
    assert_eq!(show.position, 0);
    let season = test.catalog.seasons.add_to(&show, &make_season(1)).unwrap();
    assert_eq!(season.position, 0);
}

#[test]
fn test_whole_catalog_wipe() {
    let test = TestCatalog::seeded();

    test.catalog.new_data().unwrap();

    assert_eq!(test.catalog.stats().unwrap(), CatalogStats::default());
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_catalog_survives_reopen() {
    let test = TestCatalog::seeded();
    test.catalog
        .movies
        .add(&make_movie("Second", &[60], vec![]))
        .unwrap();
    let stats = test.catalog.stats().unwrap();

    let reopened = test.reopen();

    assert_eq!(reopened.stats().unwrap(), stats);
    let movies = reopened.movies.get_all().unwrap();
    assert_eq!(movies[0], *test.movie());
    assert_eq!(movies[1].position, 1);
}
