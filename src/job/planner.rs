//! Track planner - turns one track request into the passes that produce it

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use super::model::{DirectTrack, TaggedJob, TaggedTrack, Timestamp};
use crate::config::PathsConfig;
use crate::error::{Result, SplitError};
use crate::transcoder::ExtractRequest;

/// Start bound of the correction pass
const TRACK_START: &str = "00:00:00";

/// One sequential step of a track plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run the transcoder
    Extract(ExtractRequest),
    /// Delete an intermediate file
    Remove(PathBuf),
}

/// Everything needed to produce one output track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPlan {
    /// Track name used in logs
    pub label: String,
    /// Final output file
    pub output: PathBuf,
    /// Steps, executed in order
    pub steps: Vec<Step>,
}

/// Planner outcome for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Output already on disk, nothing to do
    Skip { output: PathBuf },
    /// Output must be produced
    Run(TrackPlan),
}

/// Resolves paths under the configured roots and decides what each track needs
#[derive(Debug, Clone)]
pub struct TrackPlanner {
    sources_dir: PathBuf,
    output_dir: PathBuf,
}

impl TrackPlanner {
    pub fn new(paths: &PathsConfig) -> Self {
        Self {
            sources_dir: paths.sources_dir.clone(),
            output_dir: paths.output_dir.clone(),
        }
    }

    /// Single pass: copy `[start, end]` of `fromFile` into `toFile`.
    pub async fn plan_direct(&self, track: &DirectTrack) -> Result<Decision> {
        let output = resolve_within(&self.output_dir, &track.to_file)?;
        if tokio::fs::try_exists(&output).await? {
            return Ok(Decision::Skip { output });
        }
        let input = resolve_within(&self.sources_dir, &track.from_file)?;

        Ok(Decision::Run(TrackPlan {
            label: track.to_file.clone(),
            output: output.clone(),
            steps: vec![Step::Extract(ExtractRequest {
                input,
                output,
                start: track.start.as_str().to_owned(),
                end: track.end.as_str().to_owned(),
                tags: BTreeMap::new(),
            })],
        }))
    }

    /// Two passes: a tagged cut into an intermediate file, then an exact
    /// trim to the track length from `00:00:00`, then removal of the
    /// intermediate.
    ///
    /// `number` is the 1-based position of this track among the tracks
    /// actually produced by the job.
    pub async fn plan_tagged(
        &self,
        job: &TaggedJob,
        track: &TaggedTrack,
        number: u32,
    ) -> Result<Decision> {
        let output = resolve_within(
            &self.output_dir,
            &format!("{}.{}", track.name, job.file_format),
        )?;
        if tokio::fs::try_exists(&output).await? {
            return Ok(Decision::Skip { output });
        }
        let uncut = resolve_within(
            &self.output_dir,
            &format!("{}.uncut.{}", track.name, job.file_format),
        )?;
        let input = resolve_within(&self.sources_dir, &job.source_file)?;
        let duration = track_duration(&track.start, &track.end)?;

        Ok(Decision::Run(TrackPlan {
            label: track.name.clone(),
            output: output.clone(),
            steps: vec![
                Step::Extract(ExtractRequest {
                    input,
                    output: uncut.clone(),
                    start: track.start.as_str().to_owned(),
                    end: track.end.as_str().to_owned(),
                    tags: merge_tags(number, &track.name, &job.metadata),
                }),
                Step::Extract(ExtractRequest {
                    input: uncut.clone(),
                    output,
                    start: TRACK_START.to_string(),
                    end: duration,
                    tags: BTreeMap::new(),
                }),
                Step::Remove(uncut),
            ],
        }))
    }
}

/// Join `name` under `root`, refusing anything that could land outside it.
pub fn resolve_within(root: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if name.is_empty() || !plain {
        return Err(SplitError::UnsafePath(name.to_string()));
    }
    Ok(root.join(relative))
}

/// Track length as `00:MM:SS`.
///
/// Both bounds are read as times of the same day. An end before the start is
/// an error; a length of an hour or more lets the minutes run past 59.
pub fn track_duration(start: &Timestamp, end: &Timestamp) -> Result<String> {
    let seconds = end.seconds_of_day()? - start.seconds_of_day()?;
    if seconds < 0 {
        return Err(SplitError::NegativeDuration {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(format_duration(seconds))
}

pub fn format_duration(seconds: i64) -> String {
    format!("00:{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Default `track`/`title` tags overlaid with the job's own metadata.
pub fn merge_tags(
    number: u32,
    title: &str,
    user: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::from([
        ("track".to_string(), format!("{:02}", number)),
        ("title".to_string(), title.to_string()),
    ]);
    tags.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    tags
}
