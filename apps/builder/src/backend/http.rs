//! HTTP backend, the single client for every remote endpoint.
//!
//! No other module talks to the network. Requests are sent once: there is
//! no retry, and no timeout beyond the transport's own.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::backend::{BackendError, FileUpload, JobDescriptionInput, ResumeBackend};
use crate::models::job::{CoverLetter, CoverLetterRequest, JdAnalysis};
use crate::models::resume::ResumeDocument;

const RESUME_DATA_PATH: &str = "/api/resume-data";
const UPLOAD_PDF_PATH: &str = "/upload-pdf";
const GENERATE_PDF_PATH: &str = "/generate-pdf";
const SAVE_RESUME_PATH: &str = "/save-resume";
const ANALYZE_JD_PATH: &str = "/analyze-jd";
const COVER_LETTER_PATH: &str = "/generate-cover-letter";

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl ResumeBackend for HttpBackend {
    async fn fetch_resume_data(&self) -> Result<Option<Value>, BackendError> {
        let response = self.client.get(self.url(RESUME_DATA_PATH)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let value: Value = serde_json::from_slice(&body)?;
        Ok(Some(value).filter(|v| !v.is_null()))
    }

    async fn upload_pdf(&self, upload: FileUpload) -> Result<Value, BackendError> {
        debug!(
            "Uploading {} ({} bytes) for extraction",
            upload.file_name,
            upload.bytes.len()
        );
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let response = self
            .client
            .post(self.url(UPLOAD_PDF_PATH))
            .multipart(Form::new().part("pdf", part))
            .send()
            .await?;
        read_json(response).await
    }

    async fn generate_pdf(&self, doc: &ResumeDocument) -> Result<Bytes, BackendError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, "Requesting PDF generation");
        let response = self
            .client
            .post(self.url(GENERATE_PDF_PATH))
            .json(doc)
            .send()
            .await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?;
        debug!(%request_id, %status, bytes = body.len(), "PDF generation responded");

        classify_pdf_response(status, content_type.as_deref(), body)
    }

    async fn save_resume(&self, doc: &ResumeDocument) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url(SAVE_RESUME_PATH))
            .json(doc)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }
        Ok(())
    }

    async fn analyze_job(&self, input: JobDescriptionInput) -> Result<JdAnalysis, BackendError> {
        let mut form = Form::new();
        if let Some(text) = input.text.filter(|t| !t.trim().is_empty()) {
            form = form.text("jd_text", text);
        }
        if let Some(file) = input.file {
            form = form.part(
                "jd_file",
                Part::bytes(file.bytes).file_name(file.file_name),
            );
        }
        let response = self
            .client
            .post(self.url(ANALYZE_JD_PATH))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetter, BackendError> {
        let response = self
            .client
            .post(self.url(COVER_LETTER_PATH))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Sorts a PDF-generation response into a document or an error.
///
/// A JSON content type always means an error payload, whatever the status.
/// A successful but zero-length body is [`BackendError::EmptyPayload`].
pub fn classify_pdf_response(
    status: StatusCode,
    content_type: Option<&str>,
    body: Bytes,
) -> Result<Bytes, BackendError> {
    if content_type.is_some_and(is_json_content_type) {
        let message = serde_json::from_slice::<Value>(&body)
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| String::from_utf8_lossy(&body).trim().to_string());
        return Err(if status.is_success() {
            BackendError::Server(message)
        } else {
            BackendError::Status {
                status: status.as_u16(),
                message,
            }
        });
    }
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    if body.is_empty() {
        return Err(BackendError::EmptyPayload);
    }
    Ok(body)
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Pulls the message out of `{"error": "..."}` or `{"error": {"message": "..."}}`.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => o.get("message").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> BackendError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
    BackendError::Status {
        status: status.as_u16(),
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    let value: Value = serde_json::from_slice(&body)?;
    if let Some(message) = error_message(&value) {
        return Err(BackendError::Server(message));
    }
    Ok(serde_json::from_value(value)?)
}
