//! Normalizes and stores one page worth of raw records.

use super::models::BatchReport;
use super::normalizer::{normalize, Normalized, NormalizedTrack};
use crate::library_store::{LibraryStore, TrackHandle, UserHandle};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_IMPORT_CONCURRENCY: usize = 8;

enum RecordOutcome {
    Imported,
    Skipped,
    Failed,
}

/// Writes artist, track and membership for one normalized record, in that
/// order since each step needs the previous handle.
pub fn write_track(
    store: &dyn LibraryStore,
    user: UserHandle,
    track: &NormalizedTrack,
) -> Result<TrackHandle> {
    let artist = store.ensure_artist(&track.artist_external_id, &track.artist_name)?;
    let handle = store.ensure_track(
        &track.external_id,
        artist,
        &track.name,
        track.popularity,
        track.preview_url.as_deref(),
    )?;
    store.ensure_membership(user, handle)?;
    Ok(handle)
}

pub struct BatchImporter {
    store: Arc<dyn LibraryStore>,
    concurrency: usize,
}

impl BatchImporter {
    pub fn new(store: Arc<dyn LibraryStore>, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Import every record for `user`.
    ///
    /// Resolves only once all records have been written or skipped. A failed
    /// write is counted and logged; the remaining records still go through.
    pub async fn import(&self, user: UserHandle, records: Vec<Value>) -> BatchReport {
        let outcomes: Vec<RecordOutcome> = stream::iter(records)
            .map(|record| self.import_one(user, record))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Imported => report.imported += 1,
                RecordOutcome::Skipped => report.skipped += 1,
                RecordOutcome::Failed => report.failed += 1,
            }
        }
        report
    }

    async fn import_one(&self, user: UserHandle, record: Value) -> RecordOutcome {
        let track = match normalize(&record) {
            Normalized::Track(track) => track,
            Normalized::Skip(reason) => {
                debug!("Skipping record ({}): {}", reason.as_str(), record);
                return RecordOutcome::Skipped;
            }
        };

        let external_id = track.external_id.clone();
        let store = self.store.clone();
        let result =
            tokio::task::spawn_blocking(move || write_track(store.as_ref(), user, &track)).await;

        match result {
            Ok(Ok(_)) => RecordOutcome::Imported,
            Ok(Err(e)) => {
                warn!("Failed to store track {} for {}: {:#}", external_id, user, e);
                RecordOutcome::Failed
            }
            Err(e) => {
                warn!("Store task for track {} panicked: {}", external_id, e);
                RecordOutcome::Failed
            }
        }
    }
}
