//! In-memory [`ResumeBackend`] for tests: canned responses plus a record
//! of every call.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tokio::sync::Notify;

use crate::backend::{BackendError, FileUpload, JobDescriptionInput, ResumeBackend};
use crate::models::job::{CoverLetter, CoverLetterRequest, JdAnalysis};
use crate::models::resume::ResumeDocument;

#[derive(Debug, Clone)]
pub enum StubPdf {
    Document(Vec<u8>),
    ServerError(String),
    Status(u16),
    Empty,
}

#[derive(Default)]
struct StubState {
    resume_data: Option<Value>,
    resume_data_fails: bool,
    upload_response: Option<Value>,
    uploads: Vec<FileUpload>,
    pdf: Option<StubPdf>,
    pdf_requests: Vec<ResumeDocument>,
    pdf_gate: Option<Arc<Notify>>,
    saved: Vec<ResumeDocument>,
    save_attempts: usize,
    fail_saves: bool,
    analysis: Option<JdAnalysis>,
    analyze_inputs: Vec<JobDescriptionInput>,
    cover_letter: Option<CoverLetter>,
    cover_letter_requests: Vec<CoverLetterRequest>,
}

#[derive(Default)]
pub struct StubBackend {
    state: Mutex<StubState>,
}

impl StubBackend {
    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap()
    }

    pub fn with_resume_data(self, value: Value) -> Self {
        self.state().resume_data = Some(value);
        self
    }

    pub fn failing_resume_data(self) -> Self {
        self.state().resume_data_fails = true;
        self
    }

    pub fn with_upload_response(self, value: Value) -> Self {
        self.state().upload_response = Some(value);
        self
    }

    pub fn with_pdf(self, pdf: StubPdf) -> Self {
        self.state().pdf = Some(pdf);
        self
    }

    pub fn with_analysis(self, analysis: JdAnalysis) -> Self {
        self.state().analysis = Some(analysis);
        self
    }

    pub fn with_cover_letter(self, letter: CoverLetter) -> Self {
        self.state().cover_letter = Some(letter);
        self
    }

    /// Makes `generate_pdf` wait until the returned handle is notified.
    pub fn hold_pdf(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state().pdf_gate = Some(gate.clone());
        gate
    }

    pub fn fail_saves(&self) {
        self.state().fail_saves = true;
    }

    pub fn saved(&self) -> Vec<ResumeDocument> {
        self.state().saved.clone()
    }

    pub fn save_attempts(&self) -> usize {
        self.state().save_attempts
    }

    pub fn uploads(&self) -> Vec<FileUpload> {
        self.state().uploads.clone()
    }

    pub fn pdf_requests(&self) -> Vec<ResumeDocument> {
        self.state().pdf_requests.clone()
    }

    pub fn analyze_inputs(&self) -> Vec<JobDescriptionInput> {
        self.state().analyze_inputs.clone()
    }

    pub fn cover_letter_requests(&self) -> Vec<CoverLetterRequest> {
        self.state().cover_letter_requests.clone()
    }
}

#[async_trait]
impl ResumeBackend for StubBackend {
    async fn fetch_resume_data(&self) -> Result<Option<Value>, BackendError> {
        let state = self.state();
        if state.resume_data_fails {
            return Err(BackendError::Status {
                status: 500,
                message: "unavailable".into(),
            });
        }
        Ok(state.resume_data.clone())
    }

    async fn upload_pdf(&self, upload: FileUpload) -> Result<Value, BackendError> {
        let mut state = self.state();
        state.uploads.push(upload);
        state
            .upload_response
            .clone()
            .ok_or_else(|| BackendError::Server("Error processing PDF".into()))
    }

    async fn generate_pdf(&self, doc: &ResumeDocument) -> Result<Bytes, BackendError> {
        let gate = {
            let mut state = self.state();
            state.pdf_requests.push(doc.clone());
            state.pdf_gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.state().pdf.clone().unwrap_or(StubPdf::Empty) {
            StubPdf::Document(bytes) => Ok(Bytes::from(bytes)),
            StubPdf::ServerError(message) => Err(BackendError::Server(message)),
            StubPdf::Status(status) => Err(BackendError::Status {
                status,
                message: String::new(),
            }),
            StubPdf::Empty => Err(BackendError::EmptyPayload),
        }
    }

    async fn save_resume(&self, doc: &ResumeDocument) -> Result<(), BackendError> {
        let mut state = self.state();
        state.save_attempts += 1;
        if state.fail_saves {
            return Err(BackendError::Status {
                status: 503,
                message: "down".into(),
            });
        }
        state.saved.push(doc.clone());
        Ok(())
    }

    async fn analyze_job(&self, input: JobDescriptionInput) -> Result<JdAnalysis, BackendError> {
        let mut state = self.state();
        state.analyze_inputs.push(input);
        state
            .analysis
            .clone()
            .ok_or_else(|| BackendError::Server("Analysis failed".into()))
    }

    async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetter, BackendError> {
        let mut state = self.state();
        state.cover_letter_requests.push(request.clone());
        state
            .cover_letter
            .clone()
            .ok_or_else(|| BackendError::Server("Generation failed".into()))
    }
}
