//! HTTP server module
//!
//! - Axum router with the single split endpoint
//! - Request handler and error-to-status mapping
//! - Optional single-origin CORS

pub mod handlers;
pub mod routes;

pub use routes::create_router;
