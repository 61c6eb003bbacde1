//! Load-time reconciliation between the server snapshot and the local cache.
//!
//! Selection is evaluated once at startup and produces a [`LoadSource`].
//! Priority: server snapshot, then an owned cache record, then nothing.
//! Cache records owned by someone else, untagged legacy records, and
//! unparsable records are all discarded without touching the form.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::form::populator::populate;
use crate::form::state::FormState;
use crate::models::envelope::StorageEnvelope;
use crate::models::resume::ResumeDocument;
use crate::models::shape::normalize_non_empty;
use crate::notify::NoticeLevel;
use crate::persistence::autosave::write_local;
use crate::persistence::store::{LocalStore, CACHE_KEY};

/// Identity of the active session, used to tag and check cache ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity(Option<String>);

impl SessionIdentity {
    pub fn new(owner: Option<String>) -> Self {
        Self(owner.map(|o| o.trim().to_string()).filter(|o| !o.is_empty()))
    }

    pub fn owner(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn to_owner(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Parsed form of a raw cache record.
#[derive(Debug)]
pub enum CachedRecord {
    Envelope(StorageEnvelope),
    /// A bare document written before owner tagging existed.
    Untagged,
    Corrupt(serde_json::Error),
}

impl CachedRecord {
    pub fn parse(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => return CachedRecord::Corrupt(e),
        };
        let is_envelope = value
            .as_object()
            .is_some_and(|o| o.contains_key("content"));
        if !is_envelope {
            return CachedRecord::Untagged;
        }
        match serde_json::from_value(value) {
            Ok(envelope) => CachedRecord::Envelope(envelope),
            Err(e) => CachedRecord::Corrupt(e),
        }
    }
}

#[derive(Debug)]
pub enum LoadSource {
    ServerSnapshot(ResumeDocument),
    OwnedCache(ResumeDocument),
    ForeignCache { owner: Option<String> },
    UntaggedCache,
    CorruptCache(serde_json::Error),
    Empty,
}

impl LoadSource {
    /// Picks the authoritative source. `server` must already be normalized;
    /// an empty server document counts as absent.
    pub fn select(
        server: Option<ResumeDocument>,
        cached: Option<&str>,
        identity: &SessionIdentity,
    ) -> Self {
        if let Some(doc) = server.filter(|d| !d.is_empty()) {
            return LoadSource::ServerSnapshot(doc);
        }

        let Some(raw) = cached else {
            return LoadSource::Empty;
        };

        match CachedRecord::parse(raw) {
            CachedRecord::Envelope(envelope) if envelope.is_owned_by(identity.owner()) => {
                LoadSource::OwnedCache(envelope.content)
            }
            CachedRecord::Envelope(envelope) => LoadSource::ForeignCache {
                owner: envelope.owner,
            },
            CachedRecord::Untagged => LoadSource::UntaggedCache,
            CachedRecord::Corrupt(e) => LoadSource::CorruptCache(e),
        }
    }

    /// Convenience for the resume-data endpoint's raw JSON body.
    pub fn select_from_value(
        server: Option<Value>,
        cached: Option<&str>,
        identity: &SessionIdentity,
    ) -> Self {
        let server = server.and_then(|v| match normalize_non_empty(v) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Ignoring malformed server snapshot: {e}");
                None
            }
        });
        Self::select(server, cached, identity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    ForeignOwner,
    Untagged,
    Corrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum LoadOutcome {
    FromServer,
    RestoredFromCache,
    CacheDiscarded(DiscardReason),
    Fresh,
}

impl LoadOutcome {
    pub fn populated(self) -> bool {
        matches!(self, LoadOutcome::FromServer | LoadOutcome::RestoredFromCache)
    }

    /// User-facing notice for this outcome, if any.
    pub fn notice(self) -> Option<(NoticeLevel, &'static str)> {
        match self {
            LoadOutcome::FromServer => Some((NoticeLevel::Success, "Loaded your saved resume.")),
            LoadOutcome::RestoredFromCache => {
                Some((NoticeLevel::Info, "Restored unsaved changes."))
            }
            LoadOutcome::CacheDiscarded(_) | LoadOutcome::Fresh => None,
        }
    }
}

/// Applies a selected source to the form and the local cache.
///
/// Cache write and remove failures are logged; the form outcome stands.
pub fn reconcile(
    source: LoadSource,
    form: &mut FormState,
    store: &dyn LocalStore,
    identity: &SessionIdentity,
) -> LoadOutcome {
    match source {
        LoadSource::ServerSnapshot(doc) => load_server_snapshot(doc, form, store, identity),
        LoadSource::OwnedCache(doc) => restore_owned_cache(doc, form),
        LoadSource::ForeignCache { owner } => {
            info!(
                "Discarding cached form owned by {:?} (session: {:?})",
                owner,
                identity.owner()
            );
            discard_cache(store, DiscardReason::ForeignOwner)
        }
        LoadSource::UntaggedCache => {
            info!("Discarding untagged cached form; ownership cannot be verified");
            discard_cache(store, DiscardReason::Untagged)
        }
        LoadSource::CorruptCache(e) => {
            warn!("Discarding unreadable cached form: {e}");
            discard_cache(store, DiscardReason::Corrupt)
        }
        LoadSource::Empty => LoadOutcome::Fresh,
    }
}

fn load_server_snapshot(
    doc: ResumeDocument,
    form: &mut FormState,
    store: &dyn LocalStore,
    identity: &SessionIdentity,
) -> LoadOutcome {
    info!("Populating form from server snapshot");
    if let Err(e) = write_local(store, identity, &doc) {
        warn!("Could not cache server snapshot: {e}");
    }
    populate(form, doc);
    LoadOutcome::FromServer
}

fn restore_owned_cache(doc: ResumeDocument, form: &mut FormState) -> LoadOutcome {
    info!("Restoring form from local cache");
    populate(form, doc);
    LoadOutcome::RestoredFromCache
}

fn discard_cache(store: &dyn LocalStore, reason: DiscardReason) -> LoadOutcome {
    if let Err(e) = store.remove(CACHE_KEY) {
        warn!(?reason, "Could not remove cached form: {e}");
    }
    LoadOutcome::CacheDiscarded(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Personal;
    use crate::persistence::store::{MemoryStore, ReadOnlyStore};
    use serde_json::json;

    fn doc_named(name: &str) -> ResumeDocument {
        ResumeDocument {
            personal: Personal {
                full_name: name.into(),
                email: "someone@x.com".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn envelope_json(owner: Option<&str>, doc: &ResumeDocument) -> String {
        let envelope = StorageEnvelope {
            owner: owner.map(String::from),
            content: doc.clone(),
        };
        serde_json::to_string(&envelope).unwrap()
    }

    fn identity(owner: &str) -> SessionIdentity {
        SessionIdentity::new(Some(owner.into()))
    }

    #[test]
    fn test_server_snapshot_wins_over_cache() {
        let cached = envelope_json(Some("a@x.com"), &doc_named("Cached"));
        let source = LoadSource::select(
            Some(doc_named("Server")),
            Some(&cached),
            &identity("a@x.com"),
        );
        assert!(matches!(source, LoadSource::ServerSnapshot(ref d) if d.personal.full_name == "Server"));
    }

    #[test]
    fn test_empty_server_snapshot_falls_through_to_cache() {
        let cached = envelope_json(Some("a@x.com"), &doc_named("Cached"));
        let source = LoadSource::select(
            Some(ResumeDocument::default()),
            Some(&cached),
            &identity("a@x.com"),
        );
        assert!(matches!(source, LoadSource::OwnedCache(_)));
    }

    #[test]
    fn test_server_snapshot_overwrites_cache_with_owner_tag() {
        let store = MemoryStore::with_record(CACHE_KEY, "stale");
        let mut form = FormState::blank();
        let id = identity("a@x.com");

        let outcome = reconcile(
            LoadSource::select(Some(doc_named("Server")), None, &id),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::FromServer);
        assert_eq!(form.personal.full_name, "Server");
        let raw = store.read(CACHE_KEY).unwrap().unwrap();
        let CachedRecord::Envelope(env) = CachedRecord::parse(&raw) else {
            panic!("cache should hold an envelope");
        };
        assert_eq!(env.owner.as_deref(), Some("a@x.com"));
        assert_eq!(env.content.personal.full_name, "Server");
    }

    #[test]
    fn test_owned_cache_is_restored_with_notice() {
        let store = MemoryStore::new();
        let cached = envelope_json(Some("a@x.com"), &doc_named("Mine"));
        let mut form = FormState::blank();
        let id = identity("a@x.com");

        let outcome = reconcile(
            LoadSource::select(None, Some(&cached), &id),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::RestoredFromCache);
        assert_eq!(form.personal.full_name, "Mine");
        assert_eq!(
            outcome.notice(),
            Some((NoticeLevel::Info, "Restored unsaved changes."))
        );
    }

    #[test]
    fn test_foreign_cache_is_discarded_and_not_populated() {
        let cached = envelope_json(Some("a@x.com"), &doc_named("Someone Else"));
        let store = MemoryStore::with_record(CACHE_KEY, &cached);
        let mut form = FormState::blank();
        let id = identity("b@y.com");

        let outcome = reconcile(
            LoadSource::select(None, Some(&cached), &id),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::CacheDiscarded(DiscardReason::ForeignOwner));
        assert_eq!(form, FormState::blank());
        assert_eq!(store.read(CACHE_KEY).unwrap(), None);
        assert_eq!(outcome.notice(), None);
    }

    #[test]
    fn test_server_snapshot_populates_when_cache_write_fails() {
        let store = ReadOnlyStore::default();
        let mut form = FormState::blank();
        let id = identity("a@x.com");

        let outcome = reconcile(
            LoadSource::select_from_value(
                Some(json!({"personal": {"fullName": "Server Ada"}})),
                None,
                &id,
            ),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::FromServer);
        assert_eq!(form.personal.full_name, "Server Ada");
    }

    #[test]
    fn test_foreign_cache_is_discarded_when_remove_fails() {
        let cached = envelope_json(Some("a@x.com"), &doc_named("Someone Else"));
        let store = ReadOnlyStore::with_record(CACHE_KEY, &cached);
        let mut form = FormState::blank();
        let id = identity("b@y.com");

        let outcome = reconcile(
            LoadSource::select(None, Some(&cached), &id),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::CacheDiscarded(DiscardReason::ForeignOwner));
        assert_eq!(form, FormState::blank());
    }

    #[test]
    fn test_untagged_cache_is_discarded_even_for_matching_content() {
        let legacy = serde_json::to_string(&doc_named("Legacy")).unwrap();
        let store = MemoryStore::with_record(CACHE_KEY, &legacy);
        let mut form = FormState::blank();
        let id = identity("someone@x.com");

        let outcome = reconcile(
            LoadSource::select(None, Some(&legacy), &id),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::CacheDiscarded(DiscardReason::Untagged));
        assert!(!outcome.populated());
        assert_eq!(form, FormState::blank());
        assert_eq!(store.read(CACHE_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_cache_is_discarded() {
        let store = MemoryStore::with_record(CACHE_KEY, "{not json");
        let mut form = FormState::blank();
        let id = SessionIdentity::default();

        let outcome = reconcile(
            LoadSource::select(None, Some("{not json"), &id),
            &mut form,
            &store,
            &id,
        );

        assert_eq!(outcome, LoadOutcome::CacheDiscarded(DiscardReason::Corrupt));
        assert_eq!(store.read(CACHE_KEY).unwrap(), None);
    }

    #[test]
    fn test_nothing_available_leaves_form_fresh() {
        let store = MemoryStore::new();
        let mut form = FormState::blank();
        let id = SessionIdentity::default();
        let outcome = reconcile(LoadSource::select(None, None, &id), &mut form, &store, &id);
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert_eq!(form, FormState::blank());
    }

    #[test]
    fn test_anonymous_session_restores_anonymous_cache() {
        let cached = envelope_json(None, &doc_named("Anon"));
        let source = LoadSource::select(None, Some(&cached), &SessionIdentity::default());
        assert!(matches!(source, LoadSource::OwnedCache(_)));

        let source = LoadSource::select(None, Some(&cached), &identity("a@x.com"));
        assert!(matches!(source, LoadSource::ForeignCache { owner: None }));
    }

    #[test]
    fn test_flat_server_value_is_normalized_before_selection() {
        let source = LoadSource::select_from_value(
            Some(json!({"name": "Flat Name", "email": "f@x.com"})),
            None,
            &SessionIdentity::default(),
        );
        let LoadSource::ServerSnapshot(doc) = source else {
            panic!("expected server snapshot");
        };
        assert_eq!(doc.personal.full_name, "Flat Name");
    }

    #[test]
    fn test_placeholder_server_value_counts_as_absent() {
        let source = LoadSource::select_from_value(
            Some(json!({"name": "N/A"})),
            None,
            &SessionIdentity::default(),
        );
        assert!(matches!(source, LoadSource::Empty));
    }

    #[test]
    fn test_identity_normalizes_blank_owner() {
        assert_eq!(SessionIdentity::new(Some("  ".into())), SessionIdentity::default());
        assert_eq!(
            SessionIdentity::new(Some(" a@x.com ".into())).owner(),
            Some("a@x.com")
        );
    }
}
