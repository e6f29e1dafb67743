//! Application state management
//!
//! Holds the configuration and the orchestrator shared by every request.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::job::orchestrator::Orchestrator;
use crate::job::planner::TrackPlanner;
use crate::transcoder::{FfmpegTranscoder, Transcoder};

pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Shared with spawned job tasks
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// State backed by the ffmpeg binary named in the configuration
    pub fn new(config: ServerConfig) -> Self {
        let transcoder = Arc::new(FfmpegTranscoder::new(
            config.transcoder.ffmpeg_path.clone(),
        ));
        Self::with_transcoder(config, transcoder)
    }

    pub fn with_transcoder(config: ServerConfig, transcoder: Arc<dyn Transcoder>) -> Self {
        let planner = TrackPlanner::new(&config.paths);
        Self {
            orchestrator: Arc::new(Orchestrator::new(planner, transcoder)),
            config,
        }
    }
}
