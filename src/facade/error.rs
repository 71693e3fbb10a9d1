use crate::catalog_store::{CatalogError, EntityKind, ValidationError};
use thiserror::Error;

/// Errors surfaced to catalog callers.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid data: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Operation failed: {0}")]
    OperationFailed(#[source] CatalogError),
}

impl From<CatalogError> for FacadeError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::RecordNotFound { kind, id } | CatalogError::ScopeNotFound { kind, id } => {
                FacadeError::NotFound { kind, id }
            }
            CatalogError::NotMovable { .. } => FacadeError::InvalidOperation(err.to_string()),
            CatalogError::InvalidScope { .. } | CatalogError::MissingId { .. } => {
                FacadeError::InvalidArgument(err.to_string())
            }
            other => FacadeError::OperationFailed(other),
        }
    }
}

pub type FacadeResult<T> = Result<T, FacadeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::MoveDirection;

    #[test]
    fn test_store_errors_map_to_caller_signals() {
        let not_found: FacadeError = CatalogError::RecordNotFound {
            kind: EntityKind::Song,
            id: 3,
        }
        .into();
        assert!(matches!(
            not_found,
            FacadeError::NotFound {
                kind: EntityKind::Song,
                id: 3
            }
        ));

        let missing_parent: FacadeError = CatalogError::ScopeNotFound {
            kind: EntityKind::Music,
            id: 8,
        }
        .into();
        assert_eq!(missing_parent.to_string(), "Music 8 not found");

        let boundary: FacadeError = CatalogError::NotMovable {
            kind: EntityKind::Game,
            id: 1,
            direction: MoveDirection::Up,
        }
        .into();
        assert!(matches!(boundary, FacadeError::InvalidOperation(_)));
        assert!(boundary.to_string().contains("cannot be moved up"));

        let failed: FacadeError = CatalogError::LockPoisoned.into();
        assert!(matches!(failed, FacadeError::OperationFailed(_)));
    }
}
