//! HTTP API for the Child Support Assessment Engine.
//!
//! This module provides the axum router, request/response types and
//! shared state for serving assessments over HTTP.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AssessmentRequest, ChildRequest, OtherCaseChildRequest, ParentRequest,
    RelevantDependentsRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
