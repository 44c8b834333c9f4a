//! Listening-history ingestion pipeline.
//!
//! Five listings are drained concurrently for a user: favorite tracks over
//! three time ranges, saved tracks, and playlists (whose own track listings
//! are drained in a second stage). Each listing is walked page by page, and a
//! page is fully stored before the next one is requested. Records are
//! normalized and written through find-or-create operations, so the same
//! track arriving from several listings ends up as a single row.

mod batch;
mod drain;
mod error;
mod models;
mod nested;
mod normalizer;
mod orchestrator;
mod registry;
#[cfg(test)]
mod test_support;

pub use batch::{write_track, BatchImporter, DEFAULT_IMPORT_CONCURRENCY};
pub use drain::{Drainer, DEFAULT_MAX_PAGES_PER_SOURCE};
pub use error::IngestionError;
pub use models::{BatchReport, DrainReport, IngestionState, IngestionSummary, JobKind};
pub use nested::{NestedDrainer, DEFAULT_PLAYLIST_CONCURRENCY};
pub use normalizer::{normalize, Normalized, NormalizedTrack, SkipReason};
pub use orchestrator::{IngestionOrchestrator, IngestionSettings};
pub use registry::{RunGuard, RunRegistry};
