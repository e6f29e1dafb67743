//! External transcoder boundary
//!
//! The rest of the crate only sees [`Transcoder::extract`]. The ffmpeg
//! adapter owns every detail of how a process gets launched.

pub mod ffmpeg;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::TranscodeError;

pub use ffmpeg::FfmpegTranscoder;

/// Copy `[start, end]` of `input` into `output` without re-encoding,
/// writing `tags` as container metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start: String,
    pub end: String,
    pub tags: BTreeMap<String, String>,
}

#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Runs to completion. Returns once the underlying process has exited.
    async fn extract(&self, request: &ExtractRequest) -> Result<(), TranscodeError>;
}
