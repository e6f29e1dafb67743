//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{LogFormat, LoggingConfig, PathsConfig, ServerConfig, TranscoderConfig};
use crate::error::{Result, SplitError};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Directory settings
    pub paths: Option<PathSettings>,
    /// Transcoder settings
    pub transcoder: Option<TranscoderSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: Option<String>,
    /// Port to listen on
    pub port: u16,
    /// Origin allowed to make cross-origin requests
    pub allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory holding source recordings
    pub sources_dir: Option<PathBuf>,
    /// Directory receiving cut tracks
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderSettings {
    /// ffmpeg binary
    pub ffmpeg_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| SplitError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SplitError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerSettings {
                host: Some(defaults.host),
                port: defaults.port,
                allowed_origin: None,
            },
            paths: Some(PathSettings {
                sources_dir: Some(defaults.paths.sources_dir),
                output_dir: Some(defaults.paths.output_dir),
            }),
            transcoder: Some(TranscoderSettings {
                ffmpeg_path: Some(defaults.transcoder.ffmpeg_path),
            }),
            logging: Some(LoggingSettings {
                level: Some(defaults.logging.level),
                format: Some(defaults.logging.format),
            }),
        }
    }

    /// Convert to ServerConfig, filling unset keys with defaults
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        let paths = self.paths.map_or(defaults.paths.clone(), |p| PathsConfig {
            sources_dir: p.sources_dir.unwrap_or(defaults.paths.sources_dir),
            output_dir: p.output_dir.unwrap_or(defaults.paths.output_dir),
        });
        let transcoder = TranscoderConfig {
            ffmpeg_path: self
                .transcoder
                .and_then(|t| t.ffmpeg_path)
                .unwrap_or(defaults.transcoder.ffmpeg_path),
        };
        let logging = self.logging.map_or(defaults.logging.clone(), |l| LoggingConfig {
            level: l.level.unwrap_or(defaults.logging.level),
            format: l.format.unwrap_or(defaults.logging.format),
        });

        ServerConfig {
            host: self.server.host.unwrap_or(defaults.host),
            port: self.server.port,
            paths,
            transcoder,
            allowed_origin: self.server.allowed_origin,
            logging,
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}
