use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use listening_history_ingest::catalog_api::{
    HttpCatalogClient, DEFAULT_API_BASE_URL, MAX_PAGE_LIMIT,
};
use listening_history_ingest::config::{self, DEFAULT_REQUEST_TIMEOUT_SEC};
use listening_history_ingest::ingestion::IngestionOrchestrator;
use listening_history_ingest::library_store::{LibraryStore, SqliteLibraryStore};

/// Environment variable read when --access-token is not given.
const ACCESS_TOKEN_ENV: &str = "CATALOG_ACCESS_TOKEN";

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite library database file, created if missing.
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Base URL of the catalog API.
    #[clap(long, default_value = DEFAULT_API_BASE_URL)]
    pub catalog_api_base_url: String,

    /// Items requested per page.
    #[clap(long, default_value_t = MAX_PAGE_LIMIT)]
    pub page_limit: u32,

    /// Timeout in seconds for catalog requests.
    #[clap(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SEC)]
    pub request_timeout_sec: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingests the listening history of the given user, creating the user
    /// if it doesn't exist yet.
    Run {
        user_handle: String,

        /// OAuth bearer token of the user. Falls back to $CATALOG_ACCESS_TOKEN.
        #[clap(long)]
        access_token: Option<String>,
    },

    /// Shows whether ingestion completed for the given user.
    Status { user_handle: String },
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            catalog_api_base_url: args.catalog_api_base_url.clone(),
            page_limit: args.page_limit,
            request_timeout_sec: args.request_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    let store = Arc::new(SqliteLibraryStore::open(&app_config.db_path)?);

    match cli_args.command {
        Command::Run {
            user_handle,
            access_token,
        } => {
            let access_token = access_token
                .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok())
                .filter(|t| !t.trim().is_empty())
                .with_context(|| {
                    format!(
                        "An access token is required, pass --access-token or set {}",
                        ACCESS_TOKEN_ENV
                    )
                })?;

            info!("Configuration loaded:");
            info!("  db_path: {:?}", app_config.db_path);
            info!("  catalog_api_base_url: {}", app_config.catalog_api_base_url);
            info!("  page_limit: {}", app_config.page_limit);
            info!("  ingestion: {:?}", app_config.ingestion);

            let user = store.ensure_user(&user_handle)?;
            let client = Arc::new(HttpCatalogClient::new(
                access_token,
                app_config.request_timeout_sec,
            )?);
            let orchestrator = IngestionOrchestrator::new(
                client,
                store.clone(),
                app_config.endpoints(),
                app_config.ingestion.clone(),
            );

            let shutdown = CancellationToken::new();
            tokio::spawn({
                let shutdown = shutdown.clone();
                async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("Received Ctrl+C, stopping ingestion");
                        shutdown.cancel();
                    }
                }
            });

            let summary = orchestrator
                .run_until_cancelled(user, shutdown)
                .await
                .with_context(|| format!("Ingestion failed for {}", user_handle))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Status { user_handle } => {
            let user = store
                .get_user(&user_handle)?
                .with_context(|| format!("Unknown user: {}", user_handle))?;
            let complete = store.is_ingestion_complete(user)?.unwrap_or(false);
            let status = serde_json::json!({
                "user": user_handle,
                "ingestion_complete": complete,
                "tracks": store.get_user_track_count(user)?,
                "library": store.get_counts()?,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
