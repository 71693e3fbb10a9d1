//! Ordered collection manager.
//!
//! Keeps the `position` column of every sibling scope dense and zero-based
//! (`0..N-1`) while records are appended, removed, swapped, duplicated or
//! renumbered. A scope is either every top-level record of a kind or every
//! child of one parent record.
//!
//! All functions work on a borrowed connection and never commit. Callers run
//! them inside a transaction so a failed call leaves no partial changes.

use super::error::{CatalogError, CatalogResult};
use super::kind::EntityKind;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    fn offset(self) -> i64 {
        match self {
            MoveDirection::Up => -1,
            MoveDirection::Down => 1,
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Up => write!(f, "up"),
            MoveDirection::Down => write!(f, "down"),
        }
    }
}

/// Where a record sits: its scope and its position inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub id: i64,
    pub parent: Option<i64>,
    pub position: i64,
}

/// SQL condition selecting one sibling scope, with its bound parameters.
struct Scope {
    condition: String,
    params: Vec<Value>,
}

impl Scope {
    fn of(kind: EntityKind, parent: Option<i64>) -> Self {
        match (kind.parent(), parent) {
            (Some(link), Some(parent_id)) => Scope {
                condition: format!("{} = ?", link.column),
                params: vec![Value::Integer(parent_id)],
            },
            (Some(link), None) => Scope {
                condition: format!("{} IS NULL", link.column),
                params: vec![],
            },
            (None, _) => Scope {
                condition: "1 = 1".to_string(),
                params: vec![],
            },
        }
    }

    fn with(&self, extra: impl IntoIterator<Item = Value>) -> Vec<Value> {
        self.params.iter().cloned().chain(extra).collect()
    }
}

pub fn locate(conn: &Connection, kind: EntityKind, id: i64) -> CatalogResult<Slot> {
    let parent_column = kind.parent().map(|link| link.column).unwrap_or("NULL");
    let slot = conn
        .query_row(
            &format!(
                "SELECT id, {}, position FROM {} WHERE id = ?1",
                parent_column,
                kind.table()
            ),
            params![id],
            |row| {
                Ok(Slot {
                    id: row.get(0)?,
                    parent: row.get(1)?,
                    position: row.get(2)?,
                })
            },
        )
        .optional()?;
    slot.ok_or(CatalogError::RecordNotFound { kind, id })
}

pub fn exists(conn: &Connection, kind: EntityKind, id: i64) -> CatalogResult<bool> {
    let found: bool = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", kind.table()),
        params![id],
        |row| row.get(0),
    )?;
    Ok(found)
}

pub fn count_in_scope(
    conn: &Connection,
    kind: EntityKind,
    parent: Option<i64>,
) -> CatalogResult<i64> {
    let scope = Scope::of(kind, parent);
    let count = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            kind.table(),
            scope.condition
        ),
        params_from_iter(scope.params.iter()),
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Slots of one scope in position order. Ties, which only a damaged database
/// can contain, are broken by id.
pub fn slots_in_scope(
    conn: &Connection,
    kind: EntityKind,
    parent: Option<i64>,
) -> CatalogResult<Vec<Slot>> {
    let scope = Scope::of(kind, parent);
    let mut stmt = conn.prepare(&format!(
        "SELECT id, position FROM {} WHERE {} ORDER BY position, id",
        kind.table(),
        scope.condition
    ))?;
    let slots = stmt
        .query_map(params_from_iter(scope.params.iter()), |row| {
            Ok(Slot {
                id: row.get(0)?,
                parent,
                position: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(slots)
}

fn check_scope(conn: &Connection, kind: EntityKind, parent: Option<i64>) -> CatalogResult<()> {
    match (kind.parent(), parent) {
        (Some(link), Some(parent_id)) => {
            if exists(conn, link.kind, parent_id)? {
                Ok(())
            } else {
                Err(CatalogError::ScopeNotFound {
                    kind: link.kind,
                    id: parent_id,
                })
            }
        }
        (None, None) => Ok(()),
        (link, _) => Err(CatalogError::InvalidScope {
            kind,
            has_parent: link.is_some(),
        }),
    }
}

/// Inserts a record at the tail of its scope and returns the new id.
///
/// `values` holds one value per entry of [`EntityKind::data_columns`], in
/// the same order.
pub fn append(
    conn: &Connection,
    kind: EntityKind,
    parent: Option<i64>,
    values: Vec<Value>,
) -> CatalogResult<i64> {
    check_scope(conn, kind, parent)?;
    debug_assert_eq!(values.len(), kind.data_columns().len());
    let position = count_in_scope(conn, kind, parent)?;

    let mut columns: Vec<&str> = kind.data_columns().to_vec();
    let mut row = values;
    if let (Some(link), Some(parent_id)) = (kind.parent(), parent) {
        columns.push(link.column);
        row.push(Value::Integer(parent_id));
    }
    columns.push("position");
    row.push(Value::Integer(position));

    let placeholders = vec!["?"; columns.len()].join(", ");
    conn.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES ({})",
            kind.table(),
            columns.join(", "),
            placeholders
        ),
        params_from_iter(row),
    )?;
    Ok(conn.last_insert_rowid())
}

/// Removes a record with its whole subtree and closes the gap it leaves.
/// Returns how many records were deleted.
pub fn remove(conn: &Connection, kind: EntityKind, id: i64) -> CatalogResult<usize> {
    let slot = locate(conn, kind, id)?;
    let removed = remove_subtree(conn, kind, id)?;
    renumber_scope(conn, kind, slot.parent)?;
    Ok(removed)
}

fn remove_subtree(conn: &Connection, kind: EntityKind, id: i64) -> CatalogResult<usize> {
    let mut removed = 0;
    for &child in kind.children() {
        for slot in slots_in_scope(conn, child, Some(id))? {
            removed += remove_subtree(conn, child, slot.id)?;
        }
    }
    for association in kind.associations() {
        conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?1",
                association.table, association.owner_column
            ),
            params![id],
        )?;
    }
    for association in kind.referenced_by() {
        conn.execute(
            &format!(
                "DELETE FROM {} WHERE {} = ?1",
                association.table, association.target_column
            ),
            params![id],
        )?;
    }
    removed += conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
        params![id],
    )?;
    Ok(removed)
}

/// Swaps a record with its neighbour and returns the record's new position.
pub fn move_record(
    conn: &Connection,
    kind: EntityKind,
    id: i64,
    direction: MoveDirection,
) -> CatalogResult<i64> {
    let slot = locate(conn, kind, id)?;
    let target = slot.position + direction.offset();
    let not_movable = CatalogError::NotMovable {
        kind,
        id,
        direction,
    };
    if target < 0 {
        return Err(not_movable);
    }

    let scope = Scope::of(kind, slot.parent);
    let neighbour: Option<i64> = conn
        .query_row(
            &format!(
                "SELECT id FROM {} WHERE {} AND position = ? ORDER BY id LIMIT 1",
                kind.table(),
                scope.condition
            ),
            params_from_iter(scope.with([Value::Integer(target)])),
            |row| row.get(0),
        )
        .optional()?;
    let Some(neighbour) = neighbour else {
        return Err(not_movable);
    };

    let update = format!("UPDATE {} SET position = ?1 WHERE id = ?2", kind.table());
    conn.execute(&update, params![slot.position, neighbour])?;
    conn.execute(&update, params![target, id])?;
    Ok(target)
}

/// Deep-copies a record and its owned subtree. The copy is appended to the
/// source's scope; copied descendants keep their source positions. Shared
/// associations are copied by reference. Returns the id of the copy.
pub fn duplicate(conn: &Connection, kind: EntityKind, id: i64) -> CatalogResult<i64> {
    let slot = locate(conn, kind, id)?;
    let position = count_in_scope(conn, kind, slot.parent)?;
    let copy_id = copy_row(conn, kind, id, slot.parent, position)?;
    copy_owned(conn, kind, id, copy_id)?;
    Ok(copy_id)
}

fn copy_row(
    conn: &Connection,
    kind: EntityKind,
    source_id: i64,
    parent: Option<i64>,
    position: i64,
) -> CatalogResult<i64> {
    let data = kind.data_columns().join(", ");
    let mut targets = data.clone();
    let mut selected = data;
    let mut values = Vec::new();
    if let (Some(link), Some(parent_id)) = (kind.parent(), parent) {
        targets.push_str(", ");
        targets.push_str(link.column);
        selected.push_str(", ?");
        values.push(Value::Integer(parent_id));
    }
    targets.push_str(", position");
    selected.push_str(", ?");
    values.push(Value::Integer(position));
    values.push(Value::Integer(source_id));

    conn.execute(
        &format!(
            "INSERT INTO {table} ({targets}) SELECT {selected} FROM {table} WHERE id = ?",
            table = kind.table()
        ),
        params_from_iter(values),
    )?;
    Ok(conn.last_insert_rowid())
}

fn copy_owned(
    conn: &Connection,
    kind: EntityKind,
    source_id: i64,
    copy_id: i64,
) -> CatalogResult<()> {
    for association in kind.associations() {
        conn.execute(
            &format!(
                "INSERT INTO {table} ({owner}, {target}) SELECT ?1, {target} FROM {table} WHERE {owner} = ?2",
                table = association.table,
                owner = association.owner_column,
                target = association.target_column
            ),
            params![copy_id, source_id],
        )?;
    }
    for &child in kind.children() {
        for slot in slots_in_scope(conn, child, Some(source_id))? {
            let child_copy = copy_row(conn, child, slot.id, Some(copy_id), slot.position)?;
            copy_owned(conn, child, slot.id, child_copy)?;
        }
    }
    Ok(())
}

/// Reassigns `0..N-1` inside one scope, keeping relative order. Returns how
/// many records changed position.
pub fn renumber_scope(
    conn: &Connection,
    kind: EntityKind,
    parent: Option<i64>,
) -> CatalogResult<usize> {
    let update = format!(
        "UPDATE {} SET position = ?1 WHERE id = ?2 AND position != ?1",
        kind.table()
    );
    let mut changed = 0;
    for (position, slot) in slots_in_scope(conn, kind, parent)?.into_iter().enumerate() {
        changed += conn.execute(&update, params![position as i64, slot.id])?;
    }
    Ok(changed)
}

/// Renumbers every scope of `kind`.
pub fn renumber(conn: &Connection, kind: EntityKind) -> CatalogResult<usize> {
    let Some(link) = kind.parent() else {
        return renumber_scope(conn, kind, None);
    };
    let parents: Vec<i64> = {
        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {} FROM {}",
            link.column,
            kind.table()
        ))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<_, _>>()?
    };
    let mut changed = 0;
    for parent in parents {
        changed += renumber_scope(conn, kind, Some(parent))?;
    }
    Ok(changed)
}

/// Deletes every record of `kind`, its descendants and its association rows.
/// Returns how many records of `kind` were deleted.
pub fn wipe(conn: &Connection, kind: EntityKind) -> CatalogResult<usize> {
    for &child in kind.children() {
        wipe(conn, child)?;
    }
    for association in kind.associations().iter().chain(kind.referenced_by()) {
        conn.execute(&format!("DELETE FROM {}", association.table), [])?;
    }
    let deleted = conn.execute(&format!("DELETE FROM {}", kind.table()), [])?;
    Ok(deleted)
}
