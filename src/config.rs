//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory roots the service reads from and writes to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the source recordings
    pub sources_dir: PathBuf,

    /// Directory receiving the cut tracks
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources_dir: PathBuf::from("sources"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// External transcoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// ffmpeg binary, looked up on PATH when not absolute
    pub ffmpeg_path: PathBuf,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Source and output directories
    pub paths: PathsConfig,

    /// Transcoder settings
    pub transcoder: TranscoderConfig,

    /// Only origin allowed to call the API cross-origin. No CORS headers when unset.
    pub allowed_origin: Option<String>,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            paths: PathsConfig::default(),
            transcoder: TranscoderConfig::default(),
            allowed_origin: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn default_log_filter(&self) -> String {
        format!(
            "track_splitter={level},tower_http={level}",
            level = self.logging.level
        )
    }
}
