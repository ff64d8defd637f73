use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tabrag_core::error::TabragError;

/// Returned for every request while the service is not ready
pub const NOT_INITIALIZED: &str = "System is not initialized. Check the logs.";

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::internal(NOT_INITIALIZED)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

impl From<TabragError> for ApiError {
    fn from(err: TabragError) -> Self {
        match err {
            TabragError::Validation { reason } => Self::unprocessable(reason),
            other => Self::internal(other.to_string()),
        }
    }
}
