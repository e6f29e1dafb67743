//! Test fixtures for integration tests
//!
//! Provides a scratch directory layout and a recording transcoder so jobs can
//! run end to end without an ffmpeg binary.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::config::{PathsConfig, ServerConfig};
use crate::error::TranscodeError;
use crate::job::model::{DirectTrack, JobRequest, TaggedJob, TaggedTrack, Timestamp};
use crate::job::orchestrator::Orchestrator;
use crate::job::planner::TrackPlanner;
use crate::state::AppState;
use crate::transcoder::{ExtractRequest, Transcoder};

/// Transcoder double that records every request and writes its output file
#[derive(Debug, Default)]
pub struct RecordingTranscoder {
    calls: Mutex<Vec<ExtractRequest>>,
    /// 0-based call that fails instead of writing
    fail_on: Option<usize>,
    /// Leave the filesystem untouched
    no_writes: bool,
}

impl RecordingTranscoder {
    pub fn calls(&self) -> Vec<ExtractRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for RecordingTranscoder {
    async fn extract(&self, request: &ExtractRequest) -> Result<(), TranscodeError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len() - 1
        };

        if self.fail_on == Some(index) {
            return Err(TranscodeError::Spawn {
                program: "fake-ffmpeg".to_string(),
                source: std::io::Error::other("simulated failure"),
            });
        }
        if !self.no_writes {
            if let Some(parent) = request.output.parent() {
                tokio::fs::create_dir_all(parent).await.unwrap();
            }
            tokio::fs::write(&request.output, request.end.as_bytes())
                .await
                .unwrap();
        }
        Ok(())
    }
}

/// Scratch `sources/` + `output/` tree with a recording transcoder
pub struct Fixture {
    pub dir: TempDir,
    pub transcoder: Arc<RecordingTranscoder>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_transcoder(RecordingTranscoder::default())
    }

    pub fn failing_on_call(index: usize) -> Self {
        Self::with_transcoder(RecordingTranscoder {
            fail_on: Some(index),
            ..Default::default()
        })
    }

    pub fn without_writes() -> Self {
        Self::with_transcoder(RecordingTranscoder {
            no_writes: true,
            ..Default::default()
        })
    }

    fn with_transcoder(transcoder: RecordingTranscoder) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("sources")).unwrap();
        std::fs::create_dir_all(dir.path().join("output")).unwrap();
        Self {
            dir,
            transcoder: Arc::new(transcoder),
        }
    }

    pub fn paths(&self) -> PathsConfig {
        PathsConfig {
            sources_dir: self.dir.path().join("sources"),
            output_dir: self.dir.path().join("output"),
        }
    }

    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            paths: self.paths(),
            ..Default::default()
        }
    }

    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(TrackPlanner::new(&self.paths()), self.transcoder.clone())
    }

    pub fn state(&self, config: ServerConfig) -> Arc<AppState> {
        Arc::new(AppState::with_transcoder(config, self.transcoder.clone()))
    }

    pub fn source(&self, name: &str) -> PathBuf {
        self.dir.path().join("sources").join(name)
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join("output").join(name)
    }

    pub fn touch_output(&self, name: &str) {
        std::fs::write(self.output(name), b"existing").unwrap();
    }
}

fn ts(s: &str) -> Timestamp {
    Timestamp::find(s).unwrap()
}

/// Direct job cutting `set.mp3`; each entry is `(toFile, start, end)`
pub fn direct_job(tracks: &[(&str, &str, &str)]) -> JobRequest {
    JobRequest::Direct(
        tracks
            .iter()
            .map(|(to_file, start, end)| DirectTrack {
                from_file: "set.mp3".to_string(),
                to_file: to_file.to_string(),
                start: ts(start),
                end: ts(end),
            })
            .collect(),
    )
}

/// Tagged m4a job cutting `live.m4a`; each entry is `(name, start, end)`
pub fn tagged_job(tracks: &[(&str, &str, &str)]) -> JobRequest {
    JobRequest::Tagged(TaggedJob {
        source_file: "live.m4a".to_string(),
        file_format: "m4a".to_string(),
        metadata: Default::default(),
        tracks: tracks
            .iter()
            .map(|(name, start, end)| TaggedTrack {
                name: name.to_string(),
                start: ts(start),
                end: ts(end),
            })
            .collect(),
    })
}
