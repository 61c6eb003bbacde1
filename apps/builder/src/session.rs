//! One editing session: the live form plus everything that reads or writes it.
//!
//! Form state sits behind a short-held mutex. Handlers snapshot the collected
//! document, release the lock, and only then await the backend, so no lock is
//! ever held across an `.await`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{BackendError, JobDescriptionInput, ResumeBackend};
use crate::errors::AppError;
use crate::export::busy::{Controls, ControlsSnapshot};
use crate::export::{cover_letter, pdf};
use crate::form::collector::collect;
use crate::form::populator::{clear, merge_personal, populate, populate_from_value};
use crate::form::sample::sample_document;
use crate::form::schema::SectionKind;
use crate::form::sections;
use crate::form::state::{FieldPath, FormState};
use crate::models::job::{CoverLetter, CoverLetterRequest, JdAnalysis, JobContext};
use crate::models::resume::{is_blank, ResumeDocument};
use crate::models::shape::normalize;
use crate::notify::{Notice, Notifier};
use crate::persistence::autosave::{write_local, Autosave};
use crate::persistence::reconciler::{reconcile, LoadOutcome, LoadSource, SessionIdentity};
use crate::persistence::store::{LocalStore, CACHE_KEY};
use crate::render::preview::render_preview;

const MISSING_NAME_OR_EMAIL: &str = "Please fill in at least Name and Email!";
const MISSING_JOB: &str = "Please provide a job title and company name, or analyze a job description first.";
const NOT_A_PDF: &str = "Please upload a PDF file.";
const EXTRACTION_FAILED: &str = "Error extracting PDF. Please ensure it's a valid resume PDF.";
const NO_JOB_DESCRIPTION: &str = "Please paste a job description or choose a file.";
const JD_FILE_UNREADABLE: &str = "Could not read the job description file.";
const NO_DRAFT: &str = "No cover letter has been generated yet";

/// Job details supplied with a cover-letter request. Blank values fall back
/// to the last job-description analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobOverrides {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub jd_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub owner: Option<String>,
    pub controls: ControlsSnapshot,
    pub selected_upload: Option<PathBuf>,
    pub remote_save_pending: bool,
    pub has_analysis: bool,
    pub has_cover_letter: bool,
    pub pending_notices: usize,
}

#[derive(Default)]
struct Drafts {
    analysis: Option<JdAnalysis>,
    /// Job the current cover letter was written for.
    job: Option<JobContext>,
    cover_letter: Option<CoverLetter>,
}

struct Inner {
    form: Mutex<FormState>,
    last_persisted: Mutex<Option<ResumeDocument>>,
    drafts: Mutex<Drafts>,
    selected_upload: Mutex<Option<PathBuf>>,
    autosave: Autosave,
    backend: Arc<dyn ResumeBackend>,
    notifier: Notifier,
    controls: Controls,
    download_dir: PathBuf,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Session {
    pub fn new(
        backend: Arc<dyn ResumeBackend>,
        store: Arc<dyn LocalStore>,
        identity: SessionIdentity,
        download_dir: PathBuf,
        save_debounce: Duration,
    ) -> Self {
        let autosave = Autosave::new(store, backend.clone(), identity, save_debounce);
        Self {
            inner: Arc::new(Inner {
                form: Mutex::new(FormState::blank()),
                last_persisted: Mutex::new(None),
                drafts: Mutex::new(Drafts::default()),
                selected_upload: Mutex::new(None),
                autosave,
                backend,
                notifier: Notifier::new(),
                controls: Controls::default(),
                download_dir,
            }),
        }
    }

    fn form(&self) -> MutexGuard<'_, FormState> {
        lock(&self.inner.form)
    }

    fn drafts(&self) -> MutexGuard<'_, Drafts> {
        lock(&self.inner.drafts)
    }

    fn identity(&self) -> &SessionIdentity {
        self.inner.autosave.identity()
    }

    /// Chooses the startup source once and applies it to the form.
    pub async fn load(&self) -> LoadOutcome {
        let server = match self.inner.backend.fetch_resume_data().await {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not fetch server snapshot, continuing without it: {e}");
                None
            }
        };

        let store = self.inner.autosave.store();
        let cached = match store.read(CACHE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not read local cache: {e}");
                None
            }
        };

        let source = LoadSource::select_from_value(server, cached.as_deref(), self.identity());
        let outcome = {
            let mut form = self.form();
            reconcile(source, &mut form, store, self.identity())
        };
        info!(?outcome, populated = outcome.populated(), "Form loaded");

        if let Some((level, message)) = outcome.notice() {
            self.inner.notifier.push(level, message);
        }
        outcome
    }

    pub fn form_state(&self) -> FormState {
        self.form().clone()
    }

    pub fn document(&self) -> ResumeDocument {
        collect(&self.form())
    }

    pub fn instance_count(&self, section: SectionKind) -> usize {
        self.form().instance_count(section)
    }

    /// One field-input event.
    pub fn edit_field(&self, field: &str, value: String) -> Result<(), AppError> {
        let path: FieldPath = field.parse()?;
        let doc = {
            let mut form = self.form();
            form.set_field(&path, value)?;
            collect(&form)
        };
        debug!(%path, "Field edited");
        self.persist_quietly(doc);
        Ok(())
    }

    /// Appends a blank instance and returns its index.
    pub fn append_instance(&self, section: SectionKind) -> Result<usize, AppError> {
        let result = sections::append(&mut self.form(), section);
        match result {
            Ok(index) => Ok(index),
            Err(e) => {
                self.inner.notifier.warning(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Removes one instance and returns how many remain.
    pub fn remove_instance(&self, section: SectionKind, index: usize) -> Result<usize, AppError> {
        let (remaining, doc) = {
            let mut form = self.form();
            let remaining = sections::remove(&mut form, section, index)?;
            (remaining, collect(&form))
        };
        self.persist_quietly(doc);
        Ok(remaining)
    }

    /// Replaces the whole form from any accepted document shape.
    pub fn populate(&self, value: Value) -> Result<ResumeDocument, AppError> {
        let doc = {
            let mut form = self.form();
            let populated = populate_from_value(&mut form, value)
                .map_err(|e| AppError::Validation(format!("Unreadable resume document: {e}")))?;
            if !populated {
                return Err(AppError::Validation(
                    "Resume document must be a JSON object".to_string(),
                ));
            }
            collect(&form)
        };
        self.persist_quietly(doc.clone());
        Ok(doc)
    }

    /// Replaces the form with the demo resume. Never runs on its own.
    pub fn fill_sample(&self) -> ResumeDocument {
        let doc = {
            let mut form = self.form();
            populate(&mut form, sample_document());
            collect(&form)
        };
        self.persist_quietly(doc.clone());
        info!("Sample data loaded");
        self.inner
            .notifier
            .success("Sample data loaded! You can now generate and download your resume.");
        doc
    }

    /// Resets the form, drops the cache record and cancels any pending save.
    pub fn clear_all(&self) -> Result<(), AppError> {
        clear(&mut self.form());
        *lock(&self.inner.last_persisted) = None;
        self.inner.autosave.clear()?;
        info!("Form cleared");
        Ok(())
    }

    /// Explicit save action.
    pub fn save_now(&self) -> Result<(), AppError> {
        let doc = self.document();
        *lock(&self.inner.last_persisted) = Some(doc.clone());
        self.inner.autosave.persist(doc)?;
        Ok(())
    }

    /// Periodic save. The local cache is always rewritten; the remote save
    /// is only scheduled when the document changed since the last persist.
    pub fn autosave_tick(&self) {
        let doc = self.document();
        if lock(&self.inner.last_persisted).as_ref() != Some(&doc) {
            self.persist_quietly(doc);
            return;
        }
        if let Err(e) = write_local(self.inner.autosave.store(), self.identity(), &doc) {
            warn!("Local cache write failed: {e}");
        }
    }

    pub fn spawn_autosave_ticker(&self, period: Duration) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                session.autosave_tick();
            }
        })
    }

    fn persist_quietly(&self, doc: ResumeDocument) {
        *lock(&self.inner.last_persisted) = Some(doc.clone());
        if let Err(e) = self.inner.autosave.persist(doc) {
            warn!("Local cache write failed: {e}");
        }
    }

    pub fn preview(&self) -> Result<String, AppError> {
        let doc = self.document();
        self.require_name_and_email(&doc)?;
        Ok(render_preview(&doc))
    }

    fn require_name_and_email(&self, doc: &ResumeDocument) -> Result<(), AppError> {
        if doc.missing_required().is_empty() {
            Ok(())
        } else {
            Err(self.validation(MISSING_NAME_OR_EMAIL))
        }
    }

    fn validation(&self, message: &str) -> AppError {
        self.inner.notifier.warning(message);
        AppError::Validation(message.to_string())
    }

    fn backend_failure(&self, e: BackendError, fallback: Option<&str>) -> AppError {
        let message = match (&e, fallback) {
            (BackendError::Server(_), _) | (_, None) => e.user_message(),
            (_, Some(fallback)) => fallback.to_string(),
        };
        self.inner.notifier.error(message);
        AppError::Backend(e)
    }

    /// Requests a PDF of the current document and writes it to the download
    /// directory, returning the written path.
    pub async fn export_pdf(&self) -> Result<PathBuf, AppError> {
        let doc = self.document();
        self.require_name_and_email(&doc)?;

        let _busy = self.inner.controls.download_pdf.begin_busy(pdf::BUSY_LABEL);
        let request_id = Uuid::new_v4();
        debug!(%request_id, "Requesting PDF");

        let bytes = self
            .inner
            .backend
            .generate_pdf(&doc)
            .await
            .map_err(|e| self.backend_failure(e, None))?;

        let file_name = pdf::download_file_name(&doc.personal.full_name);
        let path = match pdf::save_download(&self.inner.download_dir, &file_name, &bytes).await {
            Ok(path) => path,
            Err(e) => {
                self.inner.notifier.error("Failed to save the PDF. Please try again.");
                return Err(e.into());
            }
        };

        info!(%request_id, path = %path.display(), bytes = bytes.len(), "PDF downloaded");
        self.inner.notifier.success(format!("Downloaded {file_name}"));
        Ok(path)
    }

    pub fn selected_upload(&self) -> Option<PathBuf> {
        lock(&self.inner.selected_upload).clone()
    }

    /// Uploads a resume PDF and merges the extracted contact details and
    /// summary into the form. The selection is cleared whatever the outcome.
    pub async fn import_pdf(&self, path: PathBuf) -> Result<ResumeDocument, AppError> {
        *lock(&self.inner.selected_upload) = Some(path.clone());
        let result = self.import_selected(&path).await;
        lock(&self.inner.selected_upload).take();
        result
    }

    async fn import_selected(&self, path: &Path) -> Result<ResumeDocument, AppError> {
        if !pdf::has_pdf_extension(path) {
            return Err(self.validation(NOT_A_PDF));
        }

        let _busy = self.inner.controls.upload_pdf.begin_busy(pdf::UPLOAD_BUSY_LABEL);
        let upload = match pdf::read_upload(path).await {
            Ok(upload) => upload,
            Err(e) => {
                self.inner.notifier.error(EXTRACTION_FAILED);
                return Err(e.into());
            }
        };
        debug!(file = %upload.file_name, bytes = upload.bytes.len(), "Uploading PDF");

        let extracted = self
            .inner
            .backend
            .upload_pdf(upload)
            .await
            .and_then(|value| normalize(value).map_err(BackendError::from))
            .map_err(|e| self.backend_failure(e, Some(EXTRACTION_FAILED)))?
            .ok_or_else(|| {
                self.backend_failure(
                    BackendError::Server(EXTRACTION_FAILED.to_string()),
                    None,
                )
            })?;

        let doc = {
            let mut form = self.form();
            merge_personal(&mut form, &extracted);
            collect(&form)
        };
        self.persist_quietly(doc.clone());
        self.inner
            .notifier
            .success("PDF extracted successfully! Form fields populated.");
        Ok(doc)
    }

    pub async fn analyze_job(
        &self,
        text: Option<String>,
        file: Option<PathBuf>,
    ) -> Result<JdAnalysis, AppError> {
        let file = match file {
            Some(path) => match pdf::read_upload(&path).await {
                Ok(upload) => Some(upload),
                Err(e) => {
                    warn!(path = %path.display(), "Could not read job description file: {e}");
                    self.inner.notifier.error(JD_FILE_UNREADABLE);
                    return Err(e.into());
                }
            },
            None => None,
        };
        let input = JobDescriptionInput {
            text: text.filter(|t| !is_blank(t)),
            file,
        };
        if input.is_empty() {
            return Err(self.validation(NO_JOB_DESCRIPTION));
        }

        let _busy = self
            .inner
            .controls
            .analyze_job
            .begin_busy(cover_letter::ANALYZE_BUSY_LABEL);
        let analysis = self
            .inner
            .backend
            .analyze_job(input)
            .await
            .map_err(|e| self.backend_failure(e, None))?;

        info!(job_title = %analysis.job_title, company = %analysis.company_name, "Job description analyzed");
        self.drafts().analysis = Some(analysis.clone());
        self.inner.notifier.success("Job description analyzed.");
        Ok(analysis)
    }

    fn job_context(&self, overrides: JobOverrides) -> JobContext {
        let mut job = self
            .drafts()
            .analysis
            .as_ref()
            .map(JobContext::from)
            .unwrap_or_default();
        let apply = |slot: &mut String, value: Option<String>| {
            if let Some(value) = value.filter(|v| !is_blank(v)) {
                *slot = value;
            }
        };
        apply(&mut job.job_title, overrides.job_title);
        apply(&mut job.company_name, overrides.company_name);
        apply(&mut job.jd_summary, overrides.jd_summary);
        job
    }

    pub async fn generate_cover_letter(
        &self,
        overrides: JobOverrides,
    ) -> Result<CoverLetter, AppError> {
        let doc = self.document();
        self.require_name_and_email(&doc)?;
        let job = self.job_context(overrides);
        if !job.missing_required().is_empty() {
            return Err(self.validation(MISSING_JOB));
        }

        let _busy = self
            .inner
            .controls
            .cover_letter
            .begin_busy(cover_letter::BUSY_LABEL);
        let request = CoverLetterRequest::build(&doc, &job);
        let request_id = Uuid::new_v4();
        debug!(%request_id, company = %job.company_name, "Requesting cover letter");

        let letter = self
            .inner
            .backend
            .generate_cover_letter(&request)
            .await
            .map_err(|e| self.backend_failure(e, None))?;

        info!(%request_id, "Cover letter generated");
        {
            let mut drafts = self.drafts();
            drafts.job = Some(job);
            drafts.cover_letter = Some(letter.clone());
        }
        self.inner.notifier.success("Cover letter generated.");
        Ok(letter)
    }

    pub fn cover_letter_mailto(&self) -> Result<String, AppError> {
        let drafts = self.drafts();
        let letter = drafts
            .cover_letter
            .as_ref()
            .ok_or_else(|| AppError::NotFound(NO_DRAFT.to_string()))?;
        let recipient = drafts.job.as_ref().and_then(|j| j.recruiter_email.as_deref());
        Ok(cover_letter::mailto_url(letter, recipient))
    }

    pub fn cover_letter_clipboard(&self) -> Result<String, AppError> {
        self.drafts()
            .cover_letter
            .as_ref()
            .map(cover_letter::clipboard_text)
            .ok_or_else(|| AppError::NotFound(NO_DRAFT.to_string()))
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.inner.notifier.drain()
    }

    pub fn status(&self) -> SessionStatus {
        let drafts = self.drafts();
        SessionStatus {
            owner: self.identity().to_owner(),
            controls: self.inner.controls.snapshot(),
            selected_upload: self.selected_upload(),
            remote_save_pending: self.inner.autosave.remote_save_pending(),
            has_analysis: drafts.analysis.is_some(),
            has_cover_letter: drafts.cover_letter.is_some(),
            pending_notices: self.inner.notifier.pending_count(),
        }
    }
}
