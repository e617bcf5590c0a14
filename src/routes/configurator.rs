//! Configurator session routes.
//!
//! Every mutation answers with the full session view plus whether the
//! mutation applied. Invalid or out-of-step mutations are not errors; they
//! come back with `applied: false` and the unchanged session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::configurator::preview::{Scene, build_scene};
use crate::configurator::pricing::{MaterialSummary, PriceBreakdown};
use crate::configurator::{ContactField, ContactInfo, Configurator, Selection, SubmissionStatus, WizardStep};
use crate::error::ApiError;
use crate::services::quote;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: WizardStep,
    pub step_number: u8,
    pub step_complete: bool,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub can_submit: bool,
    pub selection: Selection,
    pub contact: ContactInfo,
    pub submission: SubmissionStatus,
    pub price: PriceBreakdown,
    pub module_names: Vec<String>,
    pub materials: Vec<MaterialSummary>,
}

impl SessionView {
    #[must_use]
    pub fn new(id: Uuid, session: &Configurator) -> Self {
        Self {
            id,
            step: session.step(),
            step_number: session.step().number(),
            step_complete: session.is_step_complete(session.step()),
            can_advance: session.can_advance(),
            can_retreat: session.can_retreat(),
            can_submit: session.can_submit(),
            selection: session.selection().clone(),
            contact: session.contact().clone(),
            submission: session.submission().clone(),
            price: session.price_breakdown(),
            module_names: session.selected_module_names(),
            materials: session.selected_material_summaries(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub applied: bool,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub started: bool,
    pub submission: SubmissionStatus,
    pub session: SessionView,
}

#[derive(Deserialize)]
pub struct SelectModelBody {
    pub model_id: u32,
}

#[derive(Deserialize)]
pub struct SelectMaterialBody {
    pub material_id: String,
}

#[derive(Deserialize)]
pub struct UpdateContactBody {
    pub field: ContactField,
    pub value: String,
}

async fn view(state: &AppState, id: Uuid) -> Result<SessionView, ApiError> {
    state
        .with_session(id, |session| SessionView::new(id, session))
        .await
        .ok_or(ApiError::SessionNotFound(id))
}

async fn mutate(
    state: &AppState,
    id: Uuid,
    apply: impl FnOnce(&mut Configurator) -> bool,
) -> Result<Json<MutationResponse>, ApiError> {
    state
        .with_session(id, |session| {
            let applied = apply(session);
            Json(MutationResponse { applied, session: SessionView::new(id, session) })
        })
        .await
        .ok_or(ApiError::SessionNotFound(id))
}

/// `POST /api/configurator`: start a session.
pub async fn create_session(State(state): State<AppState>) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let id = state.open_session().await;
    tracing::info!(session_id = %id, "configurator session opened");
    Ok((StatusCode::CREATED, Json(view(&state, id).await?)))
}

/// `GET /api/configurator/:id`
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(view(&state, id).await?))
}

/// `DELETE /api/configurator/:id`
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if state.close_session(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// `POST /api/configurator/:id/advance`
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, Configurator::advance).await
}

/// `POST /api/configurator/:id/retreat`
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, Configurator::retreat).await
}

/// `POST /api/configurator/:id/reset`
pub async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, |session| {
        session.reset();
        true
    })
    .await
}

/// `PUT /api/configurator/:id/model`
pub async fn select_model(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectModelBody>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, |session| session.select_model(body.model_id)).await
}

/// `POST /api/configurator/:id/modules/:module_id/toggle`
pub async fn toggle_module(
    State(state): State<AppState>,
    Path((id, module_id)): Path<(Uuid, String)>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, |session| session.toggle_module(&module_id)).await
}

/// `PUT /api/configurator/:id/materials/:category`
pub async fn select_material(
    State(state): State<AppState>,
    Path((id, category)): Path<(Uuid, String)>,
    Json(body): Json<SelectMaterialBody>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, |session| session.select_material(&body.material_id, &category)).await
}

/// `PATCH /api/configurator/:id/contact`
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateContactBody>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutate(&state, id, |session| session.update_contact(body.field, body.value)).await
}

/// `POST /api/configurator/:id/submit`: 202 when delivery started, 200 when
/// the request was a no-op (not ready, in flight, or already submitted).
pub async fn submit(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let attempt = quote::start_submission(&state, id)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    let status = if attempt.started { StatusCode::ACCEPTED } else { StatusCode::OK };
    let body = SubmitResponse { started: attempt.started, submission: attempt.status, session: view(&state, id).await? };
    Ok((status, Json(body)).into_response())
}

/// `GET /api/configurator/:id/summary`: plain-text configuration summary.
pub async fn summary(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let summary = state
        .with_session(id, |session| session.configuration_summary())
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], summary).into_response())
}

/// `GET /api/configurator/:id/preview`: scene description for the 3D viewer.
pub async fn preview(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Scene>, ApiError> {
    let snapshot = state
        .with_session(id, |session| session.snapshot())
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(build_scene(&snapshot, &state.catalog)))
}

#[cfg(test)]
#[path = "configurator_test.rs"]
mod tests;
