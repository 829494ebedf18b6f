use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dreamweek_scheduler::SchedulerError;
use dreamweek_storage::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// The store could not be reached; the client may retry.
    Unavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => {
                tracing::warn!("storage unavailable: {msg}");
                (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable, try again".to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Serialization(e) => ApiError::Internal(e.to_string()),
            other => ApiError::Unavailable(other.to_string()),
        }
    }
}

impl From<SchedulerError> for ApiError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::Storage(e) => e.into(),
            SchedulerError::Core(e) => ApiError::BadRequest(e.to_string()),
            e @ (SchedulerError::InstanceNotFound { .. }
            | SchedulerError::DreamNotFound { .. }
            | SchedulerError::GoalNotFound { .. }) => ApiError::NotFound(e.to_string()),
            e @ (SchedulerError::PolicyMismatch { .. } | SchedulerError::InvalidGoal(_)) => {
                ApiError::BadRequest(e.to_string())
            }
        }
    }
}
