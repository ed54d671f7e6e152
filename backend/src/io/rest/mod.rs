//! # REST API Interface Layer
//!
//! Thin HTTP surface over the sync service so a presentation client can list
//! records, submit the forms and read the derived summary.
//!
//! Handlers hold no logic of their own. They call the domain services, map the
//! results to `shared` DTOs and translate [`SyncError`] into status codes:
//!
//! - validation failure: 400 with the user-facing message
//! - unknown record: 404
//! - unreachable store: 503
//! - partial savings reset: 500 with the deleted and failed counts

pub mod expense_apis;
pub mod mappers;
pub mod saving_apis;
pub mod summary_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::{ErrorResponse, PartialResetResponse};

use crate::domain::SyncError;
use crate::storage::StoreError;

/// Translate a domain error into an HTTP response
pub fn error_response(error: &SyncError) -> Response {
    let status = match error {
        SyncError::Validation(_) => StatusCode::BAD_REQUEST,
        SyncError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        SyncError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        SyncError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SyncError::PartialReset { deleted, failed, .. } => {
            let body = PartialResetResponse {
                error: error.to_string(),
                deleted: *deleted,
                failed: *failed,
            };
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    let body = ErrorResponse {
        error: error.to_string(),
    };
    (status, Json(body)).into_response()
}

pub async fn health_check() -> &'static str {
    "OK"
}
