//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the configurator, content, and webhook endpoints under a
//! single Axum router. The marketing site, when configured, is served as
//! static files for every path the API does not claim.

pub mod configurator;
pub mod content;
pub mod revalidate;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes: configurator sessions, content listings, and the revalidation webhook.
pub fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/catalog", get(content::catalog))
        .route("/api/models", get(content::models))
        .route("/api/home", get(content::home))
        .route("/api/revalidate", post(revalidate::revalidate))
        .route("/api/configurator", post(configurator::create_session))
        .route(
            "/api/configurator/{id}",
            get(configurator::get_session).delete(configurator::delete_session),
        )
        .route("/api/configurator/{id}/advance", post(configurator::advance))
        .route("/api/configurator/{id}/retreat", post(configurator::retreat))
        .route("/api/configurator/{id}/reset", post(configurator::reset))
        .route("/api/configurator/{id}/submit", post(configurator::submit))
        .route("/api/configurator/{id}/model", put(configurator::select_model))
        .route(
            "/api/configurator/{id}/modules/{module_id}/toggle",
            post(configurator::toggle_module),
        )
        .route(
            "/api/configurator/{id}/materials/{category}",
            put(configurator::select_material),
        )
        .route("/api/configurator/{id}/contact", patch(configurator::update_contact))
        .route("/api/configurator/{id}/summary", get(configurator::summary))
        .route("/api/configurator/{id}/preview", get(configurator::preview))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes plus the static site fallback at `website_dir`.
pub fn app(state: AppState, website_dir: Option<&Path>) -> Router {
    let router = api_routes(state);
    match website_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
