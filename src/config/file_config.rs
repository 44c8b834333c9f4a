use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub catalog_api_base_url: Option<String>,
    pub page_limit: Option<u32>,
    pub request_timeout_sec: Option<u64>,

    // Feature configs
    pub ingestion: Option<IngestionConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct IngestionConfig {
    pub import_concurrency: Option<usize>,
    pub playlist_concurrency: Option<usize>,
    pub max_pages_per_source: Option<usize>,
    /// 0 disables the deadline.
    pub run_timeout_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
