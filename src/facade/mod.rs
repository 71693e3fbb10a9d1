mod catalog_facade;
mod error;

pub use catalog_facade::{
    CatalogFacade, EpisodeFacade, GameFacade, GenreFacade, MovieFacade, MusicFacade,
    ProgramFacade, SeasonFacade, ShowFacade, SongFacade,
};
pub use error::{FacadeError, FacadeResult};

use crate::catalog_store::{CatalogStats, EntityKind, SqliteCatalogStore};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Kinds wiped by [`Catalog::new_data`], owners before the genres they
/// reference.
const WIPE_ORDER: [EntityKind; 6] = [
    EntityKind::Movie,
    EntityKind::Show,
    EntityKind::Game,
    EntityKind::Program,
    EntityKind::Music,
    EntityKind::Genre,
];

/// Every facade over one shared store, plus kind-addressed operations used
/// by the command line.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<SqliteCatalogStore>,
    pub genres: GenreFacade,
    pub movies: MovieFacade,
    pub shows: ShowFacade,
    pub seasons: SeasonFacade,
    pub episodes: EpisodeFacade,
    pub games: GameFacade,
    pub programs: ProgramFacade,
    pub music: MusicFacade,
    pub songs: SongFacade,
}

impl Catalog {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let store = SqliteCatalogStore::new(db_path)?;
        Ok(Catalog::new(Arc::new(store)))
    }

    pub fn new(store: Arc<SqliteCatalogStore>) -> Self {
        Catalog {
            genres: CatalogFacade::new(store.clone()),
            movies: CatalogFacade::new(store.clone()),
            shows: CatalogFacade::new(store.clone()),
            seasons: CatalogFacade::new(store.clone()),
            episodes: CatalogFacade::new(store.clone()),
            games: CatalogFacade::new(store.clone()),
            programs: CatalogFacade::new(store.clone()),
            music: CatalogFacade::new(store.clone()),
            songs: CatalogFacade::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Arc<SqliteCatalogStore> {
        &self.store
    }

    /// Media belong to their movie and change only through a movie update.
    fn editable(kind: EntityKind) -> FacadeResult<EntityKind> {
        match kind {
            EntityKind::Medium => Err(FacadeError::InvalidOperation(
                "media are edited through their movie".to_string(),
            )),
            other => Ok(other),
        }
    }

    /// Removes a record and its subtree. Returns how many records went away.
    pub fn remove(&self, kind: EntityKind, id: i64) -> FacadeResult<usize> {
        Ok(self.store.remove(Self::editable(kind)?, id)?)
    }

    /// Returns the record's new position.
    pub fn move_up(&self, kind: EntityKind, id: i64) -> FacadeResult<i64> {
        Ok(self.store.move_up(Self::editable(kind)?, id)?)
    }

    /// Returns the record's new position.
    pub fn move_down(&self, kind: EntityKind, id: i64) -> FacadeResult<i64> {
        Ok(self.store.move_down(Self::editable(kind)?, id)?)
    }

    /// Returns the id of the copy.
    pub fn duplicate(&self, kind: EntityKind, id: i64) -> FacadeResult<i64> {
        Ok(self.store.duplicate(Self::editable(kind)?, id)?)
    }

    pub fn update_positions(&self, kind: EntityKind) -> FacadeResult<usize> {
        Ok(self.store.renumber(kind)?)
    }

    pub fn wipe(&self, kind: EntityKind) -> FacadeResult<usize> {
        Ok(self.store.wipe(Self::editable(kind)?)?)
    }

    /// Empties the whole catalog.
    pub fn new_data(&self) -> FacadeResult<()> {
        for kind in WIPE_ORDER {
            self.store.wipe(kind)?;
        }
        info!("Catalog emptied");
        Ok(())
    }

    pub fn stats(&self) -> FacadeResult<CatalogStats> {
        Ok(self.store.stats()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::{Genre, Language, Medium, Movie};
    use tempfile::TempDir;

    fn make_movie(genres: Vec<Genre>) -> Movie {
        Movie {
            id: None,
            czech_name: "Film".to_string(),
            original_name: "Film".to_string(),
            year: 1999,
            language: Language::Cz,
            subtitles: vec![],
            media: vec![Medium::with_length(80)],
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

    #[test]
    fn test_media_are_not_addressable_by_kind() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = Catalog::open(temp_dir.path().join("catalog.db")).unwrap();
        let movie = catalog.movies.add(&make_movie(vec![])).unwrap();
        let medium_id = movie.media[0].id.unwrap();

        assert!(matches!(
            catalog.remove(EntityKind::Medium, medium_id),
            Err(FacadeError::InvalidOperation(_))
        ));
        assert_eq!(catalog.movies.get_total_media_count().unwrap(), 1);
    }

    #[test]
    fn test_new_data_empties_everything() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = Catalog::open(temp_dir.path().join("catalog.db")).unwrap();
        let drama = catalog.genres.add(&Genre::new("Drama")).unwrap();
        catalog.movies.add(&make_movie(vec![drama])).unwrap();

        catalog.new_data().unwrap();

        assert_eq!(catalog.stats().unwrap(), CatalogStats::default());
    }
}
