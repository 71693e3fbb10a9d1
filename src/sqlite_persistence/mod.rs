mod versioned_schema;

pub use versioned_schema::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, BASE_DB_VERSION,
};

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Opens (or creates) a SQLite database governed by `schemas`.
///
/// A missing file is created with the latest schema. An existing file must
/// carry a known version in `PRAGMA user_version`; it is validated against
/// that version and then migrated forward in a single transaction.
pub fn open_versioned_db<P: AsRef<Path>>(
    db_path: P,
    schemas: &[VersionedSchema],
    label: &str,
) -> Result<Connection> {
    let path = db_path.as_ref();
    let is_new_db = !path.exists();
    let latest = schemas
        .last()
        .with_context(|| format!("No schema defined for the {} database", label))?;

    let mut conn =
        Connection::open(path).with_context(|| format!("Failed to open {} database", label))?;
    conn.execute("PRAGMA foreign_keys = ON;", [])?;

    if is_new_db {
        info!(
            "Creating new {} database at {:?} (schema version {})",
            label, path, latest.version
        );
        latest.create(&conn)?;
        return Ok(conn);
    }

    let raw_version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if raw_version < BASE_DB_VERSION as i64 {
        bail!(
            "{:?} is not a {} database (user_version {})",
            path,
            label,
            raw_version
        );
    }
    let db_version = (raw_version - BASE_DB_VERSION as i64) as usize;

    let schema = schemas
        .iter()
        .find(|s| s.version == db_version)
        .with_context(|| format!("Unknown {} database version {}", label, db_version))?;
    schema.validate(&conn).with_context(|| {
        format!(
            "{} database schema validation failed for version {}",
            label, db_version
        )
    })?;

    if db_version < latest.version {
        migrate(&mut conn, schemas, db_version, label)?;
    }
    Ok(conn)
}

fn migrate(
    conn: &mut Connection,
    schemas: &[VersionedSchema],
    from_version: usize,
    label: &str,
) -> Result<()> {
    let tx = conn.transaction()?;
    let mut current = from_version;
    for schema in schemas.iter().filter(|s| s.version > from_version) {
        info!(
            "Migrating {} database from version {} to {}",
            label, current, schema.version
        );
        if let Some(migration_fn) = schema.migration {
            migration_fn(&tx)
                .with_context(|| format!("Failed to run migration to version {}", schema.version))?;
        }
        current = schema.version;
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite_column;
    use tempfile::TempDir;

    const NOTES_V1: Table = Table {
        name: "notes",
        columns: &[
            sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
            sqlite_column!("body", &SqlType::Text, non_null = true),
        ],
        indices: &[],
        unique_constraints: &[],
    };

    const NOTES_V2: Table = Table {
        name: "notes",
        columns: &[
            sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
            sqlite_column!("body", &SqlType::Text, non_null = true),
            sqlite_column!(
                "position",
                &SqlType::Integer,
                non_null = true,
                default_value = Some("0")
            ),
        ],
        indices: &[],
        unique_constraints: &[],
    };

    fn add_position(conn: &Connection) -> Result<()> {
        conn.execute(
            "ALTER TABLE notes ADD COLUMN position INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
        Ok(())
    }

    const V1_ONLY: &[VersionedSchema] = &[VersionedSchema {
        version: 1,
        tables: &[NOTES_V1],
        migration: None,
    }];

    const V1_AND_V2: &[VersionedSchema] = &[
        VersionedSchema {
            version: 1,
            tables: &[NOTES_V1],
            migration: None,
        },
        VersionedSchema {
            version: 2,
            tables: &[NOTES_V2],
            migration: Some(add_position),
        },
    ];

    fn user_version(conn: &Connection) -> usize {
        conn.query_row("PRAGMA user_version", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_new_db_gets_latest_schema() {
        let dir = TempDir::new().unwrap();
        let conn = open_versioned_db(dir.path().join("a.db"), V1_AND_V2, "test").unwrap();
        assert_eq!(user_version(&conn), BASE_DB_VERSION + 2);
        V1_AND_V2[1].validate(&conn).unwrap();
    }

    #[test]
    fn test_existing_db_is_migrated_forward() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.db");
        {
            let conn = open_versioned_db(&path, V1_ONLY, "test").unwrap();
            conn.execute("INSERT INTO notes (body) VALUES ('hello')", [])
                .unwrap();
        }

        let conn = open_versioned_db(&path, V1_AND_V2, "test").unwrap();
        assert_eq!(user_version(&conn), BASE_DB_VERSION + 2);
        let position: i64 = conn
            .query_row("SELECT position FROM notes WHERE body = 'hello'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(position, 0);
    }

    #[test]
    fn test_foreign_db_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foreign.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute("CREATE TABLE whatever (x INTEGER)", []).unwrap();
        }

        let err = open_versioned_db(&path, V1_ONLY, "test")
            .unwrap_err()
            .to_string();
        assert!(err.contains("is not a test database"));
    }
}
