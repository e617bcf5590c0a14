//! Catalog and content listing routes.

use axum::extract::State;
use axum::response::Json;

use crate::catalog::Catalog;
use crate::services::listing;
use crate::state::AppState;

/// `GET /api/catalog`: the options every session chooses from.
pub async fn catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.as_ref().clone())
}

/// `GET /api/models`: CMS model listing (`loaded`, `empty`, or `error`).
pub async fn models(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(listing::model_listing(&state).await)
}

/// `GET /api/home`: featured models for the home page.
pub async fn home(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(listing::home_feed(&state).await)
}
