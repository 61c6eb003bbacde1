pub mod export;
pub mod form;
pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form editing
        .route("/api/v1/schema", get(form::handle_get_schema))
        .route("/api/v1/form", get(form::handle_get_form))
        .route("/api/v1/document", get(form::handle_get_document))
        .route("/api/v1/form/fields", patch(form::handle_edit_field))
        .route(
            "/api/v1/form/sections/:section",
            post(form::handle_append_instance),
        )
        .route(
            "/api/v1/form/sections/:section/:index",
            delete(form::handle_remove_instance),
        )
        .route("/api/v1/form/populate", post(form::handle_populate))
        .route("/api/v1/form/sample", post(form::handle_fill_sample))
        .route("/api/v1/form/clear", post(form::handle_clear))
        .route("/api/v1/form/save", post(form::handle_save))
        .route("/api/v1/preview", get(form::handle_preview))
        .route("/api/v1/notices", get(form::handle_drain_notices))
        .route("/api/v1/status", get(form::handle_status))
        // Export
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .route("/api/v1/import/pdf", post(export::handle_import_pdf))
        .route("/api/v1/jobs/analyze", post(export::handle_analyze_job))
        .route(
            "/api/v1/cover-letter",
            post(export::handle_generate_cover_letter),
        )
        .route(
            "/api/v1/cover-letter/mailto",
            get(export::handle_cover_letter_mailto),
        )
        .route(
            "/api/v1/cover-letter/clipboard",
            get(export::handle_cover_letter_clipboard),
        )
        .with_state(state)
}
