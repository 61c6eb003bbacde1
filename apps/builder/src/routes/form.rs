use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::form::schema::{form_schema, FormSchema, SectionKind};
use crate::form::state::FormState;
use crate::models::resume::ResumeDocument;
use crate::notify::Notice;
use crate::session::SessionStatus;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FieldInput {
    pub field: String,
    pub value: String,
}

#[derive(Serialize)]
pub struct SectionEditResponse {
    pub section: SectionKind,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

/// GET /api/v1/schema
pub async fn handle_get_schema() -> Json<FormSchema> {
    Json(form_schema())
}

/// GET /api/v1/form
pub async fn handle_get_form(State(state): State<AppState>) -> Json<FormState> {
    Json(state.session.form_state())
}

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.document())
}

/// PATCH /api/v1/form/fields
pub async fn handle_edit_field(
    State(state): State<AppState>,
    Json(input): Json<FieldInput>,
) -> Result<Json<ResumeDocument>, AppError> {
    state.session.edit_field(&input.field, input.value)?;
    Ok(Json(state.session.document()))
}

/// POST /api/v1/form/sections/:section
pub async fn handle_append_instance(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<SectionEditResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    let index = state.session.append_instance(section)?;
    Ok(Json(SectionEditResponse {
        section,
        count: state.session.instance_count(section),
        index: Some(index),
    }))
}

/// DELETE /api/v1/form/sections/:section/:index
pub async fn handle_remove_instance(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Json<SectionEditResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    let count = state.session.remove_instance(section, index)?;
    Ok(Json(SectionEditResponse {
        section,
        count,
        index: None,
    }))
}

/// POST /api/v1/form/populate
pub async fn handle_populate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.session.populate(body)?))
}

/// POST /api/v1/form/sample
pub async fn handle_fill_sample(State(state): State<AppState>) -> Json<ResumeDocument> {
    Json(state.session.fill_sample())
}

/// POST /api/v1/form/clear
pub async fn handle_clear(State(state): State<AppState>) -> Result<Json<FormState>, AppError> {
    state.session.clear_all()?;
    Ok(Json(state.session.form_state()))
}

/// POST /api/v1/form/save
pub async fn handle_save(State(state): State<AppState>) -> Result<Json<SessionStatus>, AppError> {
    state.session.save_now()?;
    Ok(Json(state.session.status()))
}

/// GET /api/v1/preview
pub async fn handle_preview(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.session.preview()?))
}

/// GET /api/v1/notices
pub async fn handle_drain_notices(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.session.drain_notices())
}

/// GET /api/v1/status
pub async fn handle_status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.session.status())
}
