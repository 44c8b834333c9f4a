use crate::catalog_api::TimeRange;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// One of the independent listings drained during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    TopTracks(TimeRange),
    SavedTracks,
    Playlists,
}

impl JobKind {
    pub const ALL: [JobKind; 5] = [
        JobKind::TopTracks(TimeRange::LongTerm),
        JobKind::TopTracks(TimeRange::MediumTerm),
        JobKind::TopTracks(TimeRange::ShortTerm),
        JobKind::SavedTracks,
        JobKind::Playlists,
    ];
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::TopTracks(range) => write!(f, "top_tracks:{}", range),
            JobKind::SavedTracks => write!(f, "saved_tracks"),
            JobKind::Playlists => write!(f, "playlists"),
        }
    }
}

impl Serialize for JobKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome counts of importing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.imported + self.skipped + self.failed
    }

    pub fn merge(&mut self, other: &BatchReport) {
        self.imported += other.imported;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Result of fully draining one listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Pages fetched, including nested listings.
    pub pages: usize,
    /// Nested listings discovered and drained (playlists).
    pub sub_resources: usize,
    pub records: BatchReport,
}

impl DrainReport {
    pub fn absorb(&mut self, other: &DrainReport) {
        self.pages += other.pages;
        self.sub_resources += other.sub_resources;
        self.records.merge(&other.records);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    pub jobs: Vec<(JobKind, DrainReport)>,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl IngestionSummary {
    pub fn totals(&self) -> DrainReport {
        let mut total = DrainReport::default();
        for (_, report) in &self.jobs {
            total.absorb(report);
        }
        total
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Lifecycle of a user's ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionState {
    NotStarted,
    InProgress,
    Completed,
    Failed,
}
