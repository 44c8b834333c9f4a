//! Sequential drain of one paginated listing.

use super::batch::BatchImporter;
use super::error::IngestionError;
use super::models::{BatchReport, DrainReport, JobKind};
use crate::catalog_api::{CatalogClient, Page};
use crate::library_store::UserHandle;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_MAX_PAGES_PER_SOURCE: usize = 10_000;

/// Follows `next` cursors of a listing until it runs out.
pub struct Drainer {
    client: Arc<dyn CatalogClient>,
    max_pages: usize,
}

impl Drainer {
    pub fn new(client: Arc<dyn CatalogClient>, max_pages: usize) -> Self {
        Self {
            client,
            max_pages: max_pages.max(1),
        }
    }

    /// Walk every page starting at `start_url`, feeding the items of each page
    /// to `f` together with the accumulator.
    ///
    /// The next page is only requested after `f` has resolved for the current
    /// one. Returns the final accumulator and the number of pages fetched.
    pub async fn fold_pages<T, A, F, Fut>(
        &self,
        job: JobKind,
        start_url: &str,
        init: A,
        mut f: F,
    ) -> Result<(A, usize), IngestionError>
    where
        T: DeserializeOwned,
        F: FnMut(A, Vec<T>) -> Fut,
        Fut: Future<Output = Result<A, IngestionError>>,
    {
        let mut acc = init;
        let mut url = start_url.to_string();
        let mut pages = 0;

        loop {
            if pages >= self.max_pages {
                return Err(IngestionError::PageLimitExceeded {
                    job,
                    limit: self.max_pages,
                });
            }

            debug!("{}: fetching page {} ({})", job, pages + 1, url);
            let body = self
                .client
                .get_json(&url)
                .await
                .map_err(|source| IngestionError::Fetch {
                    job,
                    url: url.clone(),
                    source,
                })?;
            let page: Page<T> =
                Page::from_body(body).map_err(|e| IngestionError::InvalidPage {
                    job,
                    url: url.clone(),
                    message: e.to_string(),
                })?;
            pages += 1;

            acc = f(acc, page.items).await?;

            match page.next {
                Some(next) if !next.trim().is_empty() => {
                    if next == url {
                        return Err(IngestionError::CursorCycle { job, url: next });
                    }
                    url = next;
                }
                _ => break,
            }
        }

        Ok((acc, pages))
    }

    /// Drain a listing of track records into the library of `user`.
    ///
    /// Write failures are counted in the report, not raised, so every page is
    /// still visited.
    pub async fn drain_tracks(
        &self,
        job: JobKind,
        start_url: &str,
        importer: &BatchImporter,
        user: UserHandle,
    ) -> Result<DrainReport, IngestionError> {
        let (records, pages) = self
            .fold_pages(
                job,
                start_url,
                BatchReport::default(),
                |mut acc, items: Vec<Value>| async move {
                    let report = importer.import(user, items).await;
                    acc.merge(&report);
                    Ok::<_, IngestionError>(acc)
                },
            )
            .await?;

        info!(
            "{}: drained {} ({} pages, {} imported, {} skipped, {} failed)",
            job, start_url, pages, records.imported, records.skipped, records.failed
        );

        Ok(DrainReport {
            pages,
            sub_resources: 0,
            records,
        })
    }
}
