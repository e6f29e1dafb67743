//! HTTP request handlers
//!
//! Implements `POST /splitIntoTracks`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::SplitError;
use crate::job::validate::{validate_job, ValidationError};
use crate::state::AppState;

/// Response body for every outcome
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// HTTP error type
///
/// The caller only ever sees a fixed message. Details go to the log.
#[derive(Debug)]
pub enum ApiError {
    InvalidBody,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidBody => (StatusCode::BAD_REQUEST, "Invalid request body"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        ApiError::InvalidBody
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        tracing::warn!("{}", err);
        ApiError::InvalidBody
    }
}

impl From<SplitError> for ApiError {
    fn from(err: SplitError) -> Self {
        tracing::error!("Job failed: {}", err);
        ApiError::Internal
    }
}

/// Split a source recording into tracks
/// POST /splitIntoTracks
///
/// The job runs on its own task, so it finishes even if the client goes away.
pub async fn split_into_tracks(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let job = validate_job(&body)?;

    let job_id = Uuid::new_v4();
    let span = tracing::info_span!("job", id = %job_id);
    span.in_scope(|| tracing::info!("Accepted job with {} track(s)", job.track_count()));

    let orchestrator = state.orchestrator.clone();
    let report = tokio::spawn(async move { orchestrator.run(&job).await }.instrument(span))
        .await
        .map_err(|e| SplitError::Join(e.to_string()))??;

    tracing::info!(
        "Job {} finished: {} created, {} skipped",
        job_id,
        report.created.len(),
        report.skipped.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Tracks created",
        }),
    )
        .into_response())
}
