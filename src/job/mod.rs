//! Split jobs
//!
//! This module holds the request-to-files pipeline:
//! - Request body validation into typed jobs
//! - Per-track planning (paths, skip decision, passes)
//! - Sequential, fail-fast execution of the planned passes

pub mod model;
pub mod orchestrator;
pub mod planner;
pub mod validate;

