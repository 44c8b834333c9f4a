//! HTTP client for the catalog API.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Access token rejected")]
    Unauthorized,

    #[error("Rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    /// Maps a non-success status to an error.
    pub fn from_status(status: StatusCode, retry_after: Option<&str>, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => CatalogError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => CatalogError::RateLimited {
                retry_after_secs: retry_after.and_then(|v| v.trim().parse().ok()),
            },
            _ => CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            },
        }
    }
}

/// Issues authenticated GET requests against the catalog.
///
/// Token refresh and rate-limit handling belong to the implementation; the
/// ingestion pipeline only sees a parsed body or an error.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch an absolute URL and return its JSON body.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, CatalogError>;
}

/// Catalog client authenticating with a bearer token.
pub struct HttpCatalogClient {
    client: Client,
    access_token: String,
}

impl HttpCatalogClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `access_token` - OAuth bearer token of the user being ingested
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(access_token: impl Into<String>, timeout_sec: u64) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            access_token: access_token.into(),
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, CatalogError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else {
                    CatalogError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::from_status(
                status,
                retry_after.as_deref(),
                &body,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}
