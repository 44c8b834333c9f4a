//! Two-level drain: the playlists listing, then every playlist's tracks.

use super::batch::BatchImporter;
use super::drain::Drainer;
use super::error::IngestionError;
use super::models::{DrainReport, JobKind};
use crate::catalog_api::PlaylistSummary;
use crate::library_store::UserHandle;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub const DEFAULT_PLAYLIST_CONCURRENCY: usize = 4;

pub struct NestedDrainer<'a> {
    drainer: &'a Drainer,
    importer: &'a BatchImporter,
    concurrency: usize,
}

impl<'a> NestedDrainer<'a> {
    pub fn new(drainer: &'a Drainer, importer: &'a BatchImporter, concurrency: usize) -> Self {
        Self {
            drainer,
            importer,
            concurrency: concurrency.max(1),
        }
    }

    /// Collects the track-listing URL of every playlist, in listing order and
    /// without duplicates. Returns the URLs and the number of pages read.
    pub async fn collect_locators(
        &self,
        job: JobKind,
        start_url: &str,
    ) -> Result<(Vec<String>, usize), IngestionError> {
        let (locators, pages) = self
            .drainer
            .fold_pages(
                job,
                start_url,
                Vec::new(),
                |mut locators: Vec<String>, items: Vec<Value>| async move {
                    for item in items {
                        match PlaylistSummary::deserialize(&item) {
                            Ok(playlist) => match playlist.track_listing_url() {
                                Some(url) => locators.push(url.to_string()),
                                None => warn!(
                                    "{}: playlist {:?} ({:?}) has no track listing, skipping",
                                    job,
                                    playlist.name.as_deref().unwrap_or(""),
                                    playlist.id
                                ),
                            },
                            Err(e) => warn!("{}: unreadable playlist entry: {}", job, e),
                        }
                    }
                    Ok::<_, IngestionError>(locators)
                },
            )
            .await?;

        let mut seen = HashSet::new();
        let unique: Vec<String> = locators
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .collect();
        Ok((unique, pages))
    }

    /// Drain every playlist reachable from `start_url`.
    ///
    /// Playlists are drained concurrently with each other. All of them are
    /// awaited even when one fails; the first failure is then returned.
    pub async fn drain(
        &self,
        job: JobKind,
        start_url: &str,
        user: UserHandle,
    ) -> Result<DrainReport, IngestionError> {
        let (locators, pages) = self.collect_locators(job, start_url).await?;
        debug!("{}: found {} playlists", job, locators.len());

        let results: Vec<Result<DrainReport, IngestionError>> = stream::iter(&locators)
            .map(|url| self.drainer.drain_tracks(job, url, self.importer, user))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = DrainReport {
            pages,
            sub_resources: locators.len(),
            ..Default::default()
        };
        let mut first_error = None;
        for result in results {
            match result {
                Ok(sub) => report.absorb(&sub),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => warn!("{}: another playlist failed: {}", job, e),
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        info!(
            "{}: drained {} playlists ({} pages total)",
            job, report.sub_resources, report.pages
        );
        Ok(report)
    }
}
