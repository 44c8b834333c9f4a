//! Client side of the third-party music catalog API.

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod models;

pub use client::{CatalogClient, CatalogError, HttpCatalogClient};
#[cfg(test)]
pub(crate) use fake::FakeCatalogClient;
pub use models::{
    Endpoints, Page, PlaylistSummary, TimeRange, TrackListingRef, DEFAULT_API_BASE_URL,
    MAX_PAGE_LIMIT,
};
