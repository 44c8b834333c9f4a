//! Runs every drain job for a user and flips the completion flag.

use super::batch::{BatchImporter, DEFAULT_IMPORT_CONCURRENCY};
use super::drain::{Drainer, DEFAULT_MAX_PAGES_PER_SOURCE};
use super::error::IngestionError;
use super::models::{DrainReport, IngestionState, IngestionSummary, JobKind};
use super::nested::{NestedDrainer, DEFAULT_PLAYLIST_CONCURRENCY};
use super::registry::RunRegistry;
use crate::catalog_api::{CatalogClient, Endpoints};
use crate::library_store::{LibraryStore, UserHandle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Tuning knobs for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionSettings {
    /// Records of one page written at the same time.
    pub import_concurrency: usize,
    /// Playlists drained at the same time.
    pub playlist_concurrency: usize,
    pub max_pages_per_source: usize,
    /// Whole-run deadline. None waits indefinitely.
    pub run_timeout: Option<Duration>,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            import_concurrency: DEFAULT_IMPORT_CONCURRENCY,
            playlist_concurrency: DEFAULT_PLAYLIST_CONCURRENCY,
            max_pages_per_source: DEFAULT_MAX_PAGES_PER_SOURCE,
            run_timeout: None,
        }
    }
}

pub struct IngestionOrchestrator {
    client: Arc<dyn CatalogClient>,
    store: Arc<dyn LibraryStore>,
    endpoints: Endpoints,
    settings: IngestionSettings,
    registry: RunRegistry,
}

impl IngestionOrchestrator {
    pub fn new(
        client: Arc<dyn CatalogClient>,
        store: Arc<dyn LibraryStore>,
        endpoints: Endpoints,
        settings: IngestionSettings,
    ) -> Self {
        Self {
            client,
            store,
            endpoints,
            settings,
            registry: RunRegistry::new(),
        }
    }

    /// Share run bookkeeping with other orchestrators (one per access token).
    pub fn with_registry(mut self, registry: RunRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    /// Whether the stored completion flag is set for `user`.
    pub fn is_complete(&self, user: UserHandle) -> Result<bool, IngestionError> {
        self.store
            .is_ingestion_complete(user)?
            .ok_or(IngestionError::UserNotFound(user))
    }

    /// State of the latest run for `user` started by this process.
    pub fn state(&self, user: UserHandle) -> IngestionState {
        self.registry.state(user)
    }

    /// Ingest the full listening history of `user`.
    pub async fn run(&self, user: UserHandle) -> Result<IngestionSummary, IngestionError> {
        self.run_until_cancelled(user, CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but gives up as soon as `shutdown` fires.
    ///
    /// The completion flag is only set once all five jobs succeeded. Any
    /// failure, timeout or cancellation leaves it untouched.
    pub async fn run_until_cancelled(
        &self,
        user: UserHandle,
        shutdown: CancellationToken,
    ) -> Result<IngestionSummary, IngestionError> {
        self.with_store(move |store| store.is_ingestion_complete(user))
            .await?
            .ok_or(IngestionError::UserNotFound(user))?;

        let guard = self.registry.begin(user)?;
        info!("Starting ingestion for {}", user);
        let started = Instant::now();

        let drained = tokio::select! {
            result = self.drain_all_with_deadline(user) => result,
            _ = shutdown.cancelled() => Err(IngestionError::Cancelled),
        };

        let result = match drained {
            Ok(jobs) => self
                .with_store(move |store| store.set_ingestion_complete(user))
                .await
                .map(|_| jobs),
            Err(e) => Err(e),
        };

        match result {
            Ok(jobs) => {
                guard.complete();
                let summary = IngestionSummary {
                    jobs,
                    elapsed: started.elapsed(),
                };
                let totals = summary.totals();
                info!(
                    "Ingestion for {} complete in {:?}: {} pages, {} playlists, {} tracks imported, {} skipped",
                    user,
                    summary.elapsed,
                    totals.pages,
                    totals.sub_resources,
                    totals.records.imported,
                    totals.records.skipped
                );
                Ok(summary)
            }
            Err(e) => {
                guard.fail();
                error!("Ingestion for {} failed: {}", user, e);
                Err(e)
            }
        }
    }

    async fn drain_all_with_deadline(
        &self,
        user: UserHandle,
    ) -> Result<Vec<(JobKind, DrainReport)>, IngestionError> {
        match self.settings.run_timeout {
            Some(limit) => tokio::time::timeout(limit, self.drain_all(user))
                .await
                .map_err(|_| IngestionError::TimedOut(limit))?,
            None => self.drain_all(user).await,
        }
    }

    async fn drain_all(
        &self,
        user: UserHandle,
    ) -> Result<Vec<(JobKind, DrainReport)>, IngestionError> {
        let drainer = Drainer::new(self.client.clone(), self.settings.max_pages_per_source);
        let importer = BatchImporter::new(self.store.clone(), self.settings.import_concurrency);
        let job = |kind| self.run_job(kind, &drainer, &importer, user);

        let [long, medium, short, saved, playlists] = JobKind::ALL;
        let reports = tokio::try_join!(
            job(long),
            job(medium),
            job(short),
            job(saved),
            job(playlists)
        )?;

        Ok(vec![reports.0, reports.1, reports.2, reports.3, reports.4])
    }

    async fn run_job(
        &self,
        job: JobKind,
        drainer: &Drainer,
        importer: &BatchImporter,
        user: UserHandle,
    ) -> Result<(JobKind, DrainReport), IngestionError> {
        let report = match job {
            JobKind::TopTracks(range) => {
                let url = self.endpoints.top_tracks(range);
                drainer.drain_tracks(job, &url, importer, user).await?
            }
            JobKind::SavedTracks => {
                let url = self.endpoints.saved_tracks();
                drainer.drain_tracks(job, &url, importer, user).await?
            }
            JobKind::Playlists => {
                let url = self.endpoints.playlists();
                NestedDrainer::new(drainer, importer, self.settings.playlist_concurrency)
                    .drain(job, &url, user)
                    .await?
            }
        };

        if report.records.failed > 0 {
            return Err(IngestionError::WriteFailures {
                job,
                count: report.records.failed,
            });
        }
        Ok((job, report))
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T, IngestionError>
    where
        F: FnOnce(&dyn LibraryStore) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| IngestionError::TaskFailed(e.to_string()))?
            .map_err(IngestionError::Store)
    }
}
