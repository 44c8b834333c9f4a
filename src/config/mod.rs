mod file_config;

pub use file_config::{FileConfig, IngestionConfig};

use crate::catalog_api::{Endpoints, DEFAULT_API_BASE_URL, MAX_PAGE_LIMIT};
use crate::ingestion::IngestionSettings;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub catalog_api_base_url: String,
    pub page_limit: u32,
    pub request_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            catalog_api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_limit: MAX_PAGE_LIMIT,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_path: PathBuf,
    pub catalog_api_base_url: String,
    pub page_limit: u32,
    pub request_timeout_sec: u64,

    // Feature configs (with defaults)
    pub ingestion: IngestionSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        // The database file may not exist yet, its directory must
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let catalog_api_base_url = file
            .catalog_api_base_url
            .unwrap_or_else(|| cli.catalog_api_base_url.clone());
        if !catalog_api_base_url.starts_with("http://")
            && !catalog_api_base_url.starts_with("https://")
        {
            bail!(
                "catalog_api_base_url must be an http(s) URL, got {:?}",
                catalog_api_base_url
            );
        }

        let page_limit = file.page_limit.unwrap_or(cli.page_limit);
        if !(1..=MAX_PAGE_LIMIT).contains(&page_limit) {
            bail!(
                "page_limit must be between 1 and {}, got {}",
                MAX_PAGE_LIMIT,
                page_limit
            );
        }

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than 0");
        }

        // Ingestion settings - merge file config with defaults
        let defaults = IngestionSettings::default();
        let ing_file = file.ingestion.unwrap_or_default();
        let ingestion = IngestionSettings {
            import_concurrency: ing_file
                .import_concurrency
                .unwrap_or(defaults.import_concurrency),
            playlist_concurrency: ing_file
                .playlist_concurrency
                .unwrap_or(defaults.playlist_concurrency),
            max_pages_per_source: ing_file
                .max_pages_per_source
                .unwrap_or(defaults.max_pages_per_source),
            run_timeout: ing_file
                .run_timeout_sec
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };
        if ingestion.import_concurrency == 0 {
            bail!("ingestion.import_concurrency must be greater than 0");
        }
        if ingestion.playlist_concurrency == 0 {
            bail!("ingestion.playlist_concurrency must be greater than 0");
        }
        if ingestion.max_pages_per_source == 0 {
            bail!("ingestion.max_pages_per_source must be greater than 0");
        }

        Ok(Self {
            db_path,
            catalog_api_base_url,
            page_limit,
            request_timeout_sec,
            ingestion,
        })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.catalog_api_base_url, self.page_limit)
    }
}
