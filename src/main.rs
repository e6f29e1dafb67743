//! Track Splitter
//!
//! A small HTTP service that cuts a source recording into track files with
//! ffmpeg stream copy, optionally tagging each track with metadata.

mod config;
mod config_file;
mod error;
mod http;
mod job;
mod state;
mod transcoder;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, ServerConfig};
use crate::config_file::{generate_default_config, ConfigFile};
use crate::error::{Result, SplitError};
use crate::http::create_router;
use crate::state::AppState;
use crate::transcoder::FfmpegTranscoder;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "track-splitter";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "track-splitter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file. Defaults are used when it does not exist.
    #[arg(default_value = "config.toml")]
    config: PathBuf,

    /// Override the configured listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Write a default configuration file to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.write_default_config {
        generate_default_config(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let (mut config, config_warning) = load_config(&args.config);
    if let Some(port) = args.port {
        config.port = port;
    }

    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Some(warning) = config_warning {
        tracing::warn!("{}", warning);
    }
    tracing::info!("Configuration loaded: {:?}", config);

    let ffmpeg = FfmpegTranscoder::new(config.transcoder.ffmpeg_path.clone());
    match ffmpeg.version_info().await {
        Some(version) => tracing::info!("Transcoder: {}", version),
        None => tracing::warn!(
            "Could not run {}; every job will fail until it is available",
            ffmpeg.binary().display()
        ),
    }

    prepare_directories(&config)?;

    // Create application state
    let state = Arc::new(AppState::new(config.clone()));

    // Build router
    let app = create_router(state)?;

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| SplitError::Config(format!("invalid listen address: {}", e)))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Load the configuration file, falling back to defaults.
///
/// Logging is not set up yet, so problems are handed back for later.
fn load_config(path: &std::path::Path) -> (ServerConfig, Option<String>) {
    if !path.exists() {
        return (ServerConfig::default(), None);
    }
    match ConfigFile::from_file(path) {
        Ok(cf) => (cf.into_server_config(), None),
        Err(e) => (
            ServerConfig::default(),
            Some(format!(
                "Failed to load config file {}: {}. Using defaults.",
                path.display(),
                e
            )),
        ),
    }
}

/// Create the output directory and check the sources directory
fn prepare_directories(config: &ServerConfig) -> Result<()> {
    std::fs::create_dir_all(&config.paths.output_dir)?;
    if !config.paths.sources_dir.is_dir() {
        tracing::warn!(
            "Sources directory {} does not exist",
            config.paths.sources_dir.display()
        );
    }
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
