use super::kind::EntityKind;
use super::ordered::MoveDirection;
use thiserror::Error;

/// Errors raised by the catalog store.
///
/// On any error the store rolls back the surrounding transaction, so positions
/// are exactly as they were before the failed call.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} {id} does not exist, cannot use it as a parent")]
    ScopeNotFound { kind: EntityKind, id: i64 },

    #[error("{kind} records {}", scope_hint(.has_parent))]
    InvalidScope { kind: EntityKind, has_parent: bool },

    #[error("{kind} {id} not found")]
    RecordNotFound { kind: EntityKind, id: i64 },

    #[error("{kind} {id} cannot be moved {direction}, it has no neighbour there")]
    NotMovable {
        kind: EntityKind,
        id: i64,
        direction: MoveDirection,
    },

    #[error("{kind} reference has no id")]
    MissingId { kind: EntityKind },

    #[error("{kind} has no column named {column}")]
    UnknownColumn {
        kind: EntityKind,
        column: &'static str,
    },

    #[error("catalog connection lock poisoned")]
    LockPoisoned,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn scope_hint(has_parent: &bool) -> &'static str {
    if *has_parent {
        "must be added under a parent"
    } else {
        "cannot be added under a parent"
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
