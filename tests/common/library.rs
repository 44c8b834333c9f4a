//! Temporary library database wired to a test catalog.

use super::catalog::TestCatalog;
use super::constants::{TEST_PAGE_LIMIT, TEST_TOKEN, TEST_USER};
use listening_history_ingest::catalog_api::{Endpoints, HttpCatalogClient};
use listening_history_ingest::ingestion::{IngestionOrchestrator, IngestionSettings};
use listening_history_ingest::library_store::{LibraryStore, SqliteLibraryStore, UserHandle};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestLibrary {
    pub db_path: PathBuf,
    pub store: Arc<SqliteLibraryStore>,
    pub user: UserHandle,
    _temp_dir: TempDir,
}

impl TestLibrary {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("library.db");
        let store = Arc::new(SqliteLibraryStore::open(&db_path).expect("Failed to open library"));
        let user = store.ensure_user(TEST_USER).expect("Failed to create user");
        Self {
            db_path,
            store,
            user,
            _temp_dir: temp_dir,
        }
    }

    /// A second, independent connection to the same database file.
    pub fn reopen(&self) -> SqliteLibraryStore {
        SqliteLibraryStore::open(&self.db_path).expect("Failed to reopen library")
    }

    pub fn orchestrator(&self, catalog: &TestCatalog) -> IngestionOrchestrator {
        self.orchestrator_with(catalog, TEST_TOKEN, IngestionSettings::default())
    }

    pub fn orchestrator_with(
        &self,
        catalog: &TestCatalog,
        token: &str,
        settings: IngestionSettings,
    ) -> IngestionOrchestrator {
        let client = HttpCatalogClient::new(token, 5).expect("Failed to build client");
        IngestionOrchestrator::new(
            Arc::new(client),
            self.store.clone(),
            Endpoints::new(&catalog.api_base_url, TEST_PAGE_LIMIT),
            settings,
        )
    }
}
