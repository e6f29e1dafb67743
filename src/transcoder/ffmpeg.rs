//! ffmpeg process adapter
//!
//! Arguments are passed as a vector straight to the binary. Nothing is ever
//! handed to a shell, so filenames and timestamps are never interpreted.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::{ExtractRequest, Transcoder};
use crate::error::TranscodeError;

/// How many trailing stderr lines are kept for diagnostics
const STDERR_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Argument vector for one stream-copy cut
    pub fn build_args(request: &ExtractRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(request.input.clone().into_os_string());
        for (key, value) in &request.tags {
            args.push("-metadata".into());
            args.push(format!("{}={}", key, value).into());
        }
        args.extend(
            [
                "-c",
                "copy",
                "-ss",
                request.start.as_str(),
                "-to",
                request.end.as_str(),
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(request.output.clone().into_os_string());
        args
    }

    /// First line of `ffmpeg -version`, if the binary can be run at all
    pub async fn version_info(&self) -> Option<String> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(str::to_string)
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn extract(&self, request: &ExtractRequest) -> Result<(), TranscodeError> {
        let args = Self::build_args(request);
        tracing::debug!("Running {} {:?}", self.binary.display(), args);

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                program: self.binary.display().to_string(),
                source,
            })?;

        if output.status.success() {
            tracing::debug!("ffmpeg wrote {}", request.output.display());
            return Ok(());
        }

        tracing::error!(
            "ffmpeg failed ({}) writing {}:\n{}",
            output.status,
            request.output.display(),
            stderr_tail(&output.stderr)
        );
        Err(TranscodeError::Exited {
            status: output.status,
            output: request.output.clone(),
        })
    }
}
