//! Scripted in-memory catalog used by unit tests.

use super::client::{CatalogClient, CatalogError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeCatalogClient {
    pages: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl FakeCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: Value) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.failures.insert(url.to_string(), status);
        self
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    /// URLs in the order they were requested.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalogClient {
    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        self.requests.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(status) = self.failures.get(url) {
            return Err(CatalogError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            });
        }
        self.pages.get(url).cloned().ok_or_else(|| CatalogError::Api {
            status: 404,
            message: format!("no page scripted for {}", url),
        })
    }
}
