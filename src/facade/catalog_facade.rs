//! Per-type entry point into the catalog.
//!
//! A facade checks caller input (ids present or absent as the operation
//! requires, field validation) before touching the store, and translates
//! store failures into [`FacadeError`].

use super::error::{FacadeError, FacadeResult};
use crate::catalog_store::{
    CatalogEntity, ChildEntity, EntityKind, Episode, Game, Genre, Movie, Music, Program,
    RootEntity, Season, Show, Song, SqliteCatalogStore,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

pub struct CatalogFacade<E> {
    store: Arc<SqliteCatalogStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CatalogFacade<E> {
    fn clone(&self) -> Self {
        CatalogFacade {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

pub type GenreFacade = CatalogFacade<Genre>;
pub type MovieFacade = CatalogFacade<Movie>;
pub type ShowFacade = CatalogFacade<Show>;
pub type SeasonFacade = CatalogFacade<Season>;
pub type EpisodeFacade = CatalogFacade<Episode>;
pub type GameFacade = CatalogFacade<Game>;
pub type ProgramFacade = CatalogFacade<Program>;
pub type MusicFacade = CatalogFacade<Music>;
pub type SongFacade = CatalogFacade<Song>;

fn rejected(kind: EntityKind, err: FacadeError) -> FacadeError {
    warn!("Rejected {} request: {}", kind, err);
    err
}

impl<E: CatalogEntity> CatalogFacade<E> {
    pub fn new(store: Arc<SqliteCatalogStore>) -> Self {
        CatalogFacade {
            store,
            _entity: PhantomData,
        }
    }

    fn require_id(record: &E) -> FacadeResult<i64> {
        record.id().ok_or_else(|| {
            rejected(
                E::KIND,
                FacadeError::InvalidArgument(format!("{} has no id", E::KIND)),
            )
        })
    }

    fn require_new(record: &E) -> FacadeResult<()> {
        match record.id() {
            Some(id) => Err(rejected(
                E::KIND,
                FacadeError::InvalidArgument(format!("new {} must not carry id {}", E::KIND, id)),
            )),
            None => Ok(()),
        }
    }

    fn require_valid(record: &E) -> FacadeResult<()> {
        record
            .validate()
            .map_err(|err| rejected(E::KIND, FacadeError::Validation(err)))
    }

    /// Deletes every record of this type and its dependents.
    pub fn new_data(&self) -> FacadeResult<()> {
        self.store.wipe(E::KIND)?;
        Ok(())
    }

    pub fn get(&self, id: i64) -> FacadeResult<Option<E>> {
        Ok(self.store.get(id)?)
    }

    pub fn get_all(&self) -> FacadeResult<Vec<E>> {
        Ok(self.store.get_all()?)
    }

    pub fn update(&self, record: &E) -> FacadeResult<()> {
        let id = Self::require_id(record)?;
        Self::require_valid(record)?;
        self.store.update(id, record)?;
        Ok(())
    }

    pub fn remove(&self, record: &E) -> FacadeResult<()> {
        let id = Self::require_id(record)?;
        self.store.remove(E::KIND, id)?;
        Ok(())
    }

    /// Returns the stored copy.
    pub fn duplicate(&self, record: &E) -> FacadeResult<E> {
        let id = Self::require_id(record)?;
        Ok(self.store.duplicate_record(id)?)
    }

    pub fn move_up(&self, record: &E) -> FacadeResult<()> {
        let id = Self::require_id(record)?;
        self.store.move_up(E::KIND, id)?;
        Ok(())
    }

    pub fn move_down(&self, record: &E) -> FacadeResult<()> {
        let id = Self::require_id(record)?;
        self.store.move_down(E::KIND, id)?;
        Ok(())
    }

    pub fn update_positions(&self) -> FacadeResult<()> {
        self.store.renumber(E::KIND)?;
        Ok(())
    }

    pub fn count(&self) -> FacadeResult<i64> {
        Ok(self.store.count(E::KIND)?)
    }
}

impl<E: RootEntity> CatalogFacade<E> {
    /// Validates and appends a new record. Returns it as stored.
    pub fn add(&self, record: &E) -> FacadeResult<E> {
        Self::require_new(record)?;
        Self::require_valid(record)?;
        Ok(self.store.add(record)?)
    }
}

impl<E: ChildEntity> CatalogFacade<E> {
    /// Validates and appends a new record under `parent`.
    pub fn add_to(&self, parent: &E::Parent, record: &E) -> FacadeResult<E> {
        let parent_id = parent_id::<E>(parent)?;
        Self::require_new(record)?;
        Self::require_valid(record)?;
        Ok(self.store.add_child(parent_id, record)?)
    }

    pub fn find_by_parent(&self, parent: &E::Parent) -> FacadeResult<Vec<E>> {
        let parent_id = parent_id::<E>(parent)?;
        Ok(self.store.find_by_parent(parent_id)?)
    }
}

fn parent_id<E: ChildEntity>(parent: &E::Parent) -> FacadeResult<i64> {
    parent.id().ok_or_else(|| {
        let parent_kind = <E::Parent as CatalogEntity>::KIND;
        rejected(
            E::KIND,
            FacadeError::InvalidArgument(format!("{} has no id", parent_kind)),
        )
    })
}

// =============================================================================
// Aggregates
// =============================================================================

impl CatalogFacade<Movie> {
    /// Number of media over all movies.
    pub fn get_total_media_count(&self) -> FacadeResult<i64> {
        Ok(self.store.count(EntityKind::Medium)?)
    }

    /// Total length of all movie media, in minutes.
    pub fn get_total_length(&self) -> FacadeResult<i64> {
        Ok(self.store.sum(EntityKind::Medium, "length")?)
    }
}

impl CatalogFacade<Show> {
    /// Total length of every episode of every show, in minutes.
    pub fn get_total_length(&self) -> FacadeResult<i64> {
        Ok(self.store.sum(EntityKind::Episode, "length")?)
    }

    pub fn get_seasons_count(&self) -> FacadeResult<i64> {
        Ok(self.store.count(EntityKind::Season)?)
    }

    pub fn get_episodes_count(&self) -> FacadeResult<i64> {
        Ok(self.store.count(EntityKind::Episode)?)
    }
}

impl CatalogFacade<Season> {
    /// Total length of the season's episodes, in minutes.
    pub fn get_total_length(&self, season: &Season) -> FacadeResult<i64> {
        let id = Self::require_id(season)?;
        if self.store.get::<Season>(id)?.is_none() {
            return Err(FacadeError::NotFound {
                kind: EntityKind::Season,
                id,
            });
        }
        Ok(self.store.sum_in_scope(EntityKind::Episode, id, "length")?)
    }
}

impl CatalogFacade<Game> {
    pub fn get_total_media_count(&self) -> FacadeResult<i64> {
        Ok(self.store.sum(EntityKind::Game, "media_count")?)
    }
}

impl CatalogFacade<Program> {
    pub fn get_total_media_count(&self) -> FacadeResult<i64> {
        Ok(self.store.sum(EntityKind::Program, "media_count")?)
    }
}

impl CatalogFacade<Music> {
    pub fn get_total_media_count(&self) -> FacadeResult<i64> {
        Ok(self.store.sum(EntityKind::Music, "media_count")?)
    }

    /// Total length of all songs, in seconds.
    pub fn get_total_length(&self) -> FacadeResult<i64> {
        Ok(self.store.sum(EntityKind::Song, "length")?)
    }

    pub fn get_songs_count(&self) -> FacadeResult<i64> {
        Ok(self.store.count(EntityKind::Song)?)
    }
}
