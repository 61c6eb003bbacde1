//! Backend collaborators: the remote services the form engine talks to.
//!
//! Everything remote goes through [`ResumeBackend`]: the HTTP
//! implementation in [`http`] for real sessions, a stub in tests.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

use crate::models::job::{CoverLetter, CoverLetterRequest, JdAnalysis};
use crate::models::resume::ResumeDocument;

pub mod http;
#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Application error reported in a JSON body.
    #[error("{0}")]
    Server(String),

    #[error("Server returned an empty document")]
    EmptyPayload,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// Message suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Server(message) => message.clone(),
            BackendError::Status { message, .. } if !message.is_empty() => message.clone(),
            BackendError::Status { status, .. } => format!("Request failed with status {status}"),
            BackendError::EmptyPayload => "The server returned an empty document.".to_string(),
            BackendError::Http(_) => "Could not reach the server. Please try again.".to_string(),
            BackendError::Parse(_) => "The server sent an unexpected response.".to_string(),
        }
    }
}

/// A file picked by the user, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Free text and/or a file describing the job. At least one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDescriptionInput {
    pub text: Option<String>,
    pub file: Option<FileUpload>,
}

impl JobDescriptionInput {
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty()) && self.file.is_none()
    }
}

#[async_trait]
pub trait ResumeBackend: Send + Sync {
    /// Server-held snapshot for the current session, in any accepted shape.
    async fn fetch_resume_data(&self) -> Result<Option<Value>, BackendError>;

    /// Uploads a resume PDF and returns the extracted flat document.
    async fn upload_pdf(&self, upload: FileUpload) -> Result<Value, BackendError>;

    async fn generate_pdf(&self, doc: &ResumeDocument) -> Result<Bytes, BackendError>;

    async fn save_resume(&self, doc: &ResumeDocument) -> Result<(), BackendError>;

    async fn analyze_job(&self, input: JobDescriptionInput) -> Result<JdAnalysis, BackendError>;

    async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetter, BackendError>;
}
