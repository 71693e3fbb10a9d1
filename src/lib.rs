//! Media Catalog Library
//!
//! Movies, shows, games, programs and music kept in ordered lists on top of
//! SQLite. The store keeps every list densely numbered and cascades removal
//! and duplication through the catalog hierarchy; the facade validates input
//! and maps store failures to caller-facing errors.

pub mod catalog_store;
pub mod config;
pub mod facade;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogError, EntityKind, SqliteCatalogStore};
pub use facade::{Catalog, CatalogFacade, FacadeError};
