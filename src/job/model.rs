//! Typed job requests
//!
//! These are only ever built by the validator, so every value here already
//! has the right shape.

use chrono::{NaiveTime, Timelike};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SplitError};

fn time_pattern() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"[0-9]{2}:[0-9]{2}:[0-9]{2}").unwrap())
}

/// An `HH:MM:SS` time bound
///
/// The pattern is searched, not anchored: `"at 00:01:30"` is accepted and
/// keeps `00:01:30`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn find(raw: &str) -> Option<Self> {
        time_pattern()
            .find(raw)
            .map(|m| Timestamp(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Seconds since midnight, reading the value as a wall-clock time.
    pub fn seconds_of_day(&self) -> Result<i64> {
        let time = NaiveTime::parse_from_str(&self.0, "%H:%M:%S")
            .map_err(|_| SplitError::InvalidTime(self.0.clone()))?;
        Ok(i64::from(time.num_seconds_from_midnight()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One track of a direct job: its own source and destination file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectTrack {
    pub from_file: String,
    pub to_file: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// One track of a tagged job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTrack {
    pub name: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// A job cutting every track from one shared source and tagging the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedJob {
    pub source_file: String,
    pub file_format: String,
    pub metadata: BTreeMap<String, String>,
    pub tracks: Vec<TaggedTrack>,
}

/// A validated `POST /splitIntoTracks` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Direct(Vec<DirectTrack>),
    Tagged(TaggedJob),
}

impl JobRequest {
    pub fn track_count(&self) -> usize {
        match self {
            JobRequest::Direct(tracks) => tracks.len(),
            JobRequest::Tagged(job) => job.tracks.len(),
        }
    }
}
