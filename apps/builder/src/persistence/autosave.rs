//! Ongoing persistence: synchronous local cache write plus a debounced
//! remote save.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::ResumeBackend;
use crate::models::resume::ResumeDocument;
use crate::persistence::debounce::Debouncer;
use crate::persistence::reconciler::SessionIdentity;
use crate::persistence::store::{LocalStore, StoreError, CACHE_KEY};

/// Borrowed twin of `StorageEnvelope`, so writes don't clone the document.
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    owner: Option<&'a str>,
    content: &'a ResumeDocument,
}

/// Overwrites the cache record with `doc`, tagged with the session owner.
pub fn write_local(
    store: &dyn LocalStore,
    identity: &SessionIdentity,
    doc: &ResumeDocument,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(&EnvelopeRef {
        owner: identity.owner(),
        content: doc,
    })?;
    store.write(CACHE_KEY, &raw)
}

pub struct Autosave {
    store: Arc<dyn LocalStore>,
    remote: Arc<dyn ResumeBackend>,
    identity: SessionIdentity,
    debouncer: Debouncer,
}

impl Autosave {
    pub fn new(
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn ResumeBackend>,
        identity: SessionIdentity,
        quiet_period: Duration,
    ) -> Self {
        Self {
            store,
            remote,
            identity,
            debouncer: Debouncer::new(quiet_period),
        }
    }

    pub fn store(&self) -> &dyn LocalStore {
        self.store.as_ref()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Writes the local cache now (last writer wins) and re-arms the remote save.
    ///
    /// The remote save is scheduled even if the local write fails.
    pub fn persist(&self, doc: ResumeDocument) -> Result<(), StoreError> {
        let local = write_local(self.store.as_ref(), &self.identity, &doc);
        self.schedule_remote(doc);
        local
    }

    fn schedule_remote(&self, doc: ResumeDocument) {
        let remote = self.remote.clone();
        let request_id = Uuid::new_v4();
        self.debouncer.schedule(async move {
            debug!(%request_id, "Saving resume to remote store");
            // Failures are not retried: the next edit schedules another save.
            if let Err(e) = remote.save_resume(&doc).await {
                warn!(%request_id, "Remote save failed: {e}");
            }
        });
    }

    pub fn remote_save_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Drops the cache record and any pending remote save.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.debouncer.cancel();
        self.store.remove(CACHE_KEY)
    }
}
