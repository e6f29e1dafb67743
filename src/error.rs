use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the track splitter
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Transcoder error: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path escapes its directory: {0}")]
    UnsafePath(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("End time {end} is before start time {start}")]
    NegativeDuration { start: String, end: String },

    #[error("Failed to remove intermediate file {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Job task failed: {0}")]
    Join(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Transcoder process errors
#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transcoder exited with {status} while writing {}", .output.display())]
    Exited {
        status: std::process::ExitStatus,
        output: PathBuf,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SplitError>;
