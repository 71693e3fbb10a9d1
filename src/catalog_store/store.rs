//! SQLite-backed catalog store.
//!
//! Every structural mutation runs in its own transaction on the single
//! connection, so readers never observe a scope with duplicate positions or
//! a gap.

use super::entity::{select_list, CatalogEntity, ChildEntity, RootEntity};
use super::error::{CatalogError, CatalogResult};
use super::kind::EntityKind;
use super::models::CatalogStats;
use super::ordered::{self, MoveDirection, Slot};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use crate::sqlite_persistence::open_versioned_db;
use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    /// Opens the catalog database at `db_path`, creating or migrating it.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned_db(db_path.as_ref(), CATALOG_VERSIONED_SCHEMAS, "catalog")?;

        let counts = Self::top_level_counts(&conn)?;
        info!(
            "Opened catalog: {}",
            counts
                .iter()
                .map(|(kind, count)| format!("{} {}", count, kind.table()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn top_level_counts(conn: &Connection) -> CatalogResult<Vec<(EntityKind, i64)>> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| kind.parent().is_none())
            .map(|kind| Ok((kind, Self::count_all(conn, kind)?)))
            .collect()
    }

    fn lock(&self) -> CatalogResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| CatalogError::LockPoisoned)
    }

    /// Runs `f` in a transaction, committing only when it succeeds.
    fn write<T>(&self, f: impl FnOnce(&Transaction) -> CatalogResult<T>) -> CatalogResult<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    fn fetch<E: CatalogEntity>(conn: &Connection, id: i64) -> CatalogResult<Option<E>> {
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_list(E::KIND, None),
            E::KIND.table()
        ))?;
        let record = stmt.query_row(params![id], |row| E::from_row(row)).optional()?;
        match record {
            Some(mut record) => {
                record.load_relations(conn)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn fetch_existing<E: CatalogEntity>(conn: &Connection, id: i64) -> CatalogResult<E> {
        Self::fetch(conn, id)?.ok_or(CatalogError::RecordNotFound { kind: E::KIND, id })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get<E: CatalogEntity>(&self, id: i64) -> CatalogResult<Option<E>> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    /// Every record of a type. Children are grouped by parent, each group in
    /// position order.
    pub fn get_all<E: CatalogEntity>(&self) -> CatalogResult<Vec<E>> {
        let conn = self.lock()?;
        let order = match E::KIND.parent() {
            Some(link) => format!("{}, position, id", link.column),
            None => "position, id".to_string(),
        };
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM {} ORDER BY {}",
            select_list(E::KIND, None),
            E::KIND.table(),
            order
        ))?;
        let mut records = stmt
            .query_map([], |row| E::from_row(row))?
            .collect::<Result<Vec<E>, _>>()?;
        for record in records.iter_mut() {
            record.load_relations(&conn)?;
        }
        Ok(records)
    }

    pub fn find_by_parent<E: ChildEntity>(&self, parent_id: i64) -> CatalogResult<Vec<E>> {
        let conn = self.lock()?;
        let parent_kind = <E::Parent as CatalogEntity>::KIND;
        if !ordered::exists(&conn, parent_kind, parent_id)? {
            return Err(CatalogError::ScopeNotFound {
                kind: parent_kind,
                id: parent_id,
            });
        }
        super::entity::query_children(&conn, parent_id)
    }

    /// Slots of one scope in position order.
    pub fn scope_slots(&self, kind: EntityKind, parent: Option<i64>) -> CatalogResult<Vec<Slot>> {
        let conn = self.lock()?;
        ordered::slots_in_scope(&conn, kind, parent)
    }

    pub fn count(&self, kind: EntityKind) -> CatalogResult<i64> {
        let conn = self.lock()?;
        Self::count_all(&conn, kind)
    }

    pub fn count_in_scope(&self, kind: EntityKind, parent: Option<i64>) -> CatalogResult<i64> {
        let conn = self.lock()?;
        ordered::count_in_scope(&conn, kind, parent)
    }

    /// Sum of an integer data column over every record of `kind`.
    pub fn sum(&self, kind: EntityKind, column: &'static str) -> CatalogResult<i64> {
        let conn = self.lock()?;
        Self::sum_where(&conn, kind, column, None)
    }

    /// Sum of an integer data column over the children of one parent.
    pub fn sum_in_scope(
        &self,
        kind: EntityKind,
        parent_id: i64,
        column: &'static str,
    ) -> CatalogResult<i64> {
        let conn = self.lock()?;
        Self::sum_where(&conn, kind, column, Some(parent_id))
    }

    pub fn stats(&self) -> CatalogResult<CatalogStats> {
        let conn = self.lock()?;
        Ok(CatalogStats {
            genres: Self::count_all(&conn, EntityKind::Genre)?,
            movies: Self::count_all(&conn, EntityKind::Movie)?,
            movie_media: Self::count_all(&conn, EntityKind::Medium)?,
            movie_length: Self::sum_where(&conn, EntityKind::Medium, "length", None)?,
            shows: Self::count_all(&conn, EntityKind::Show)?,
            seasons: Self::count_all(&conn, EntityKind::Season)?,
            episodes: Self::count_all(&conn, EntityKind::Episode)?,
            show_length: Self::sum_where(&conn, EntityKind::Episode, "length", None)?,
            games: Self::count_all(&conn, EntityKind::Game)?,
            game_media: Self::sum_where(&conn, EntityKind::Game, "media_count", None)?,
            programs: Self::count_all(&conn, EntityKind::Program)?,
            program_media: Self::sum_where(&conn, EntityKind::Program, "media_count", None)?,
            music: Self::count_all(&conn, EntityKind::Music)?,
            music_media: Self::sum_where(&conn, EntityKind::Music, "media_count", None)?,
            songs: Self::count_all(&conn, EntityKind::Song)?,
            music_length: Self::sum_where(&conn, EntityKind::Song, "length", None)?,
        })
    }

    fn count_all(conn: &Connection, kind: EntityKind) -> CatalogResult<i64> {
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    fn sum_where(
        conn: &Connection,
        kind: EntityKind,
        column: &'static str,
        parent_id: Option<i64>,
    ) -> CatalogResult<i64> {
        if !kind.has_column(column) {
            return Err(CatalogError::UnknownColumn { kind, column });
        }
        let (filter, values) = match (kind.parent(), parent_id) {
            (Some(link), Some(id)) => (format!(" WHERE {} = ?1", link.column), vec![id]),
            (None, Some(_)) => {
                return Err(CatalogError::InvalidScope {
                    kind,
                    has_parent: false,
                })
            }
            _ => (String::new(), vec![]),
        };
        let sum = conn.query_row(
            &format!(
                "SELECT COALESCE(SUM({}), 0) FROM {}{}",
                column,
                kind.table(),
                filter
            ),
            params_from_iter(values),
            |r| r.get(0),
        )?;
        Ok(sum)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Appends a top-level record and returns it as stored.
    pub fn add<E: RootEntity>(&self, record: &E) -> CatalogResult<E> {
        self.insert(None, record)
    }

    /// Appends a record under `parent_id` and returns it as stored.
    pub fn add_child<E: ChildEntity>(&self, parent_id: i64, record: &E) -> CatalogResult<E> {
        self.insert(Some(parent_id), record)
    }

    fn insert<E: CatalogEntity>(&self, parent: Option<i64>, record: &E) -> CatalogResult<E> {
        let values = record.column_values()?;
        self.write(|tx| {
            let id = ordered::append(tx, E::KIND, parent, values)?;
            record.save_relations(tx, id)?;
            let stored: E = Self::fetch_existing(tx, id)?;
            debug!(
                "Added {} {} at position {}",
                E::KIND,
                id,
                stored.position()
            );
            Ok(stored)
        })
    }

    /// Overwrites the data and relations of record `id`. Identity, scope and
    /// position are left untouched. Movie media keep their ids position by
    /// position; only media past the new count are removed.
    pub fn update<E: CatalogEntity>(&self, id: i64, record: &E) -> CatalogResult<()> {
        let kind = E::KIND;
        let mut values = record.column_values()?;
        values.push(rusqlite::types::Value::Integer(id));
        let assignments = kind
            .data_columns()
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");

        self.write(|tx| {
            let changed = tx.execute(
                &format!("UPDATE {} SET {} WHERE id = ?", kind.table(), assignments),
                params_from_iter(values),
            )?;
            if changed == 0 {
                return Err(CatalogError::RecordNotFound { kind, id });
            }
            record.save_relations(tx, id)?;
            debug!("Updated {} {}", kind, id);
            Ok(())
        })
    }

    /// Removes a record with its subtree. Returns how many records were
    /// deleted in total.
    pub fn remove(&self, kind: EntityKind, id: i64) -> CatalogResult<usize> {
        self.write(|tx| {
            let removed = ordered::remove(tx, kind, id)?;
            debug!("Removed {} {} ({} records)", kind, id, removed);
            Ok(removed)
        })
    }

    /// Swaps a record with its neighbour. Returns the record's new position.
    pub fn move_record(
        &self,
        kind: EntityKind,
        id: i64,
        direction: MoveDirection,
    ) -> CatalogResult<i64> {
        self.write(|tx| {
            let position = ordered::move_record(tx, kind, id, direction)?;
            debug!("Moved {} {} {} to position {}", kind, id, direction, position);
            Ok(position)
        })
    }

    pub fn move_up(&self, kind: EntityKind, id: i64) -> CatalogResult<i64> {
        self.move_record(kind, id, MoveDirection::Up)
    }

    pub fn move_down(&self, kind: EntityKind, id: i64) -> CatalogResult<i64> {
        self.move_record(kind, id, MoveDirection::Down)
    }

    /// Deep-copies a record. Returns the id of the copy.
    pub fn duplicate(&self, kind: EntityKind, id: i64) -> CatalogResult<i64> {
        self.write(|tx| {
            let copy_id = ordered::duplicate(tx, kind, id)?;
            debug!("Duplicated {} {} as {}", kind, id, copy_id);
            Ok(copy_id)
        })
    }

    /// Deep-copies a record and returns the copy as stored.
    pub fn duplicate_record<E: CatalogEntity>(&self, id: i64) -> CatalogResult<E> {
        self.write(|tx| {
            let copy_id = ordered::duplicate(tx, E::KIND, id)?;
            debug!("Duplicated {} {} as {}", E::KIND, id, copy_id);
            Self::fetch_existing(tx, copy_id)
        })
    }

    /// Renumbers every scope of `kind`. Returns how many records moved.
    pub fn renumber(&self, kind: EntityKind) -> CatalogResult<usize> {
        self.write(|tx| {
            let changed = ordered::renumber(tx, kind)?;
            debug!("Renumbered {}: {} positions changed", kind, changed);
            Ok(changed)
        })
    }

    /// Deletes every record of `kind` and its dependents.
    pub fn wipe(&self, kind: EntityKind) -> CatalogResult<usize> {
        self.write(|tx| {
            let deleted = ordered::wipe(tx, kind)?;
            info!("Wiped {} {} records", deleted, kind);
            Ok(deleted)
        })
    }
}
