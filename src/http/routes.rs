//! Axum router configuration

use axum::{
    http::{header, HeaderValue, Method},
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Result, SplitError};
use crate::state::AppState;

use super::handlers::split_into_tracks;

/// CORS layer admitting only the configured origin
///
/// Requests from any other origin get no CORS headers at all.
fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|e| SplitError::Config(format!("invalid allowed origin {:?}: {}", origin, e)))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600)))
}

/// Create the Axum router
pub fn create_router(state: Arc<AppState>) -> Result<Router> {
    let cors = state
        .config
        .allowed_origin
        .as_deref()
        .map(cors_layer)
        .transpose()?;

    let router = Router::new()
        .route("/splitIntoTracks", post(split_into_tracks))
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };

    Ok(router.with_state(state))
}
