//! Extraction orchestrator
//!
//! Drives a job one track at a time, one step at a time. The first error
//! stops the whole job; files written by earlier tracks stay on disk.

use std::path::PathBuf;
use std::sync::Arc;

use super::model::JobRequest;
use super::planner::{Decision, Step, TrackPlan, TrackPlanner};
use crate::error::{Result, SplitError};
use crate::transcoder::Transcoder;

/// What a finished job did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobReport {
    /// Tracks written by this job
    pub created: Vec<PathBuf>,
    /// Tracks whose output already existed
    pub skipped: Vec<PathBuf>,
}

pub struct Orchestrator {
    planner: TrackPlanner,
    transcoder: Arc<dyn Transcoder>,
}

impl Orchestrator {
    pub fn new(planner: TrackPlanner, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            planner,
            transcoder,
        }
    }

    pub async fn run(&self, job: &JobRequest) -> Result<JobReport> {
        let mut report = JobReport::default();

        match job {
            JobRequest::Direct(tracks) => {
                for track in tracks {
                    let decision = self.planner.plan_direct(track).await?;
                    self.apply(decision, &mut report).await?;
                }
            }
            JobRequest::Tagged(tagged) => {
                // Skipped tracks do not take a track number.
                let mut number = 1;
                for track in &tagged.tracks {
                    let decision = self
                        .planner
                        .plan_tagged(tagged, track, number)
                        .await?;
                    if self.apply(decision, &mut report).await? {
                        number += 1;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Returns whether a track was produced
    async fn apply(&self, decision: Decision, report: &mut JobReport) -> Result<bool> {
        match decision {
            Decision::Skip { output } => {
                tracing::info!("File {} already exists, skipping", output.display());
                report.skipped.push(output);
                Ok(false)
            }
            Decision::Run(plan) => {
                self.execute(&plan).await?;
                tracing::info!("Created track {} at {}", plan.label, plan.output.display());
                report.created.push(plan.output);
                Ok(true)
            }
        }
    }

    async fn execute(&self, plan: &TrackPlan) -> Result<()> {
        for step in &plan.steps {
            match step {
                Step::Extract(request) => {
                    if let Err(e) = self.transcoder.extract(request).await {
                        tracing::error!("Error creating track {}: {}", plan.label, e);
                        return Err(e.into());
                    }
                }
                Step::Remove(path) => {
                    tokio::fs::remove_file(path)
                        .await
                        .map_err(|source| SplitError::Cleanup {
                            path: path.clone(),
                            source,
                        })?;
                }
            }
        }
        Ok(())
    }
}
