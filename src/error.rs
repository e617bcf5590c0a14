//! Wire error codes and the HTTP API error type.
//!
//! Every error that reaches a client carries a stable `code`, its display
//! message, and whether retrying the same request can succeed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

/// Stable machine-readable code for an error surfaced to clients.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body for an error: `{"code", "message", "retryable"}`.
#[must_use]
pub fn error_body(err: &(impl ErrorCode + ?Sized)) -> serde_json::Value {
    serde_json::json!({
        "code": err.error_code(),
        "message": err.to_string(),
        "retryable": err.retryable(),
    })
}

/// Errors returned by configurator API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("configurator session {0} not found")]
    SessionNotFound(Uuid),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "E_SESSION_NOT_FOUND",
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(error_body(&self))).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
