use std::path::PathBuf;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::{CoverLetter, JdAnalysis};
use crate::models::resume::ResumeDocument;
use crate::session::JobOverrides;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DownloadResponse {
    pub path: PathBuf,
}

#[derive(Deserialize)]
pub struct ImportRequest {
    pub path: PathBuf,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub text: Option<String>,
    pub path: Option<PathBuf>,
}

#[derive(Serialize)]
pub struct MailtoResponse {
    pub url: String,
}

#[derive(Serialize)]
pub struct ClipboardResponse {
    pub text: String,
}

/// POST /api/v1/export/pdf
pub async fn handle_export_pdf(
    State(state): State<AppState>,
) -> Result<Json<DownloadResponse>, AppError> {
    let path = state.session.export_pdf().await?;
    Ok(Json(DownloadResponse { path }))
}

/// POST /api/v1/import/pdf
pub async fn handle_import_pdf(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    Ok(Json(state.session.import_pdf(req.path).await?))
}

/// POST /api/v1/jobs/analyze
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<JdAnalysis>, AppError> {
    Ok(Json(state.session.analyze_job(req.text, req.path).await?))
}

/// POST /api/v1/cover-letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(overrides): Json<JobOverrides>,
) -> Result<Json<CoverLetter>, AppError> {
    Ok(Json(state.session.generate_cover_letter(overrides).await?))
}

/// GET /api/v1/cover-letter/mailto
pub async fn handle_cover_letter_mailto(
    State(state): State<AppState>,
) -> Result<Json<MailtoResponse>, AppError> {
    Ok(Json(MailtoResponse {
        url: state.session.cover_letter_mailto()?,
    }))
}

/// GET /api/v1/cover-letter/clipboard
pub async fn handle_cover_letter_clipboard(
    State(state): State<AppState>,
) -> Result<Json<ClipboardResponse>, AppError> {
    Ok(Json(ClipboardResponse {
        text: state.session.cover_letter_clipboard()?,
    }))
}
