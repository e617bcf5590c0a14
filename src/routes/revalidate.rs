//! CMS publish webhook.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use crate::services::revalidation::{self, RevalidateError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
}

/// `POST /api/revalidate?secret=...`: drop cached listing pages.
pub async fn revalidate(State(state): State<AppState>, Query(query): Query<RevalidateQuery>) -> Response {
    let result = revalidation::revalidate_pages(
        &state.pages,
        state.revalidate_secret.as_deref(),
        query.secret.as_deref(),
    )
    .await;

    match result {
        Ok(timestamp) => Json(serde_json::json!({ "revalidated": true, "timestamp": timestamp })).into_response(),
        Err(RevalidateError::InvalidSecret) => {
            tracing::warn!("revalidation rejected: invalid secret");
            (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "message": "Invalid secret" }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "revalidation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "message": "Error revalidating", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "revalidate_test.rs"]
mod tests;
