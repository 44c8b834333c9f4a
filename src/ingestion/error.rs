use super::models::JobKind;
use crate::catalog_api::CatalogError;
use crate::library_store::UserHandle;
use std::time::Duration;
use thiserror::Error;

/// Errors that can end an ingestion run.
///
/// Per-record problems (missing IDs, individual write failures) never show up
/// here directly; they are counted in the batch reports.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("{job}: request to {url} failed: {source}")]
    Fetch {
        job: JobKind,
        url: String,
        #[source]
        source: CatalogError,
    },

    #[error("{job}: malformed page at {url}: {message}")]
    InvalidPage {
        job: JobKind,
        url: String,
        message: String,
    },

    #[error("{job}: gave up after {limit} pages")]
    PageLimitExceeded { job: JobKind, limit: usize },

    #[error("{job}: next-page cursor points back at {url}")]
    CursorCycle { job: JobKind, url: String },

    #[error("{job}: {count} records could not be stored")]
    WriteFailures { job: JobKind, count: usize },

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Unknown user: {0}")]
    UserNotFound(UserHandle),

    #[error("Ingestion already running for {0}")]
    AlreadyRunning(UserHandle),

    #[error("Ingestion timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Ingestion cancelled")]
    Cancelled,

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl IngestionError {
    /// The job the error originated in, if it is tied to one.
    pub fn job(&self) -> Option<JobKind> {
        match self {
            IngestionError::Fetch { job, .. }
            | IngestionError::InvalidPage { job, .. }
            | IngestionError::PageLimitExceeded { job, .. }
            | IngestionError::CursorCycle { job, .. }
            | IngestionError::WriteFailures { job, .. } => Some(*job),
            _ => None,
        }
    }
}
