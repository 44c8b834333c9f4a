//! Listening History Ingestion Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog_api;
pub mod config;
pub mod ingestion;
pub mod library_store;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_api::{CatalogClient, CatalogError, Endpoints, HttpCatalogClient};
pub use ingestion::{IngestionError, IngestionOrchestrator, IngestionSettings, IngestionSummary};
pub use library_store::{LibraryStore, SqliteLibraryStore, UserHandle};
