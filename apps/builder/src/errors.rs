use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::form::schema::UnknownSection;
use crate::form::sections::SectionEditError;
use crate::form::state::FieldPathError;
use crate::persistence::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FieldPathError> for AppError {
    fn from(e: FieldPathError) -> Self {
        match e {
            FieldPathError::IndexOutOfRange { .. } => AppError::NotFound(e.to_string()),
            FieldPathError::Malformed(_) | FieldPathError::UnknownField(_) => {
                AppError::Validation(e.to_string())
            }
        }
    }
}

impl From<SectionEditError> for AppError {
    fn from(e: SectionEditError) -> Self {
        match e {
            SectionEditError::Incomplete { .. } => AppError::Validation(e.to_string()),
            SectionEditError::NoSuchInstance { .. } => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<UnknownSection> for AppError {
    fn from(e: UnknownSection) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", e.user_message())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "The local cache could not be updated".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "A file could not be read or written".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
