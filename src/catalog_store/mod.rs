//! Catalog storage: models, schema, the ordered collection manager and the
//! SQLite store built on top of them.

mod entity;
mod error;
mod kind;
mod models;
pub mod ordered;
mod schema;
mod store;
pub mod validation;

pub use entity::{CatalogEntity, ChildEntity, RootEntity};
pub use error::{CatalogError, CatalogResult};
pub use kind::{AssociationTable, EntityKind, ParentLink};
pub use models::*;
pub use ordered::{MoveDirection, Slot};
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use validation::{ValidationError, ValidationResult};
