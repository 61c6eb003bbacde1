//! Writes a document back into the form.

use serde_json::Value;

use crate::form::state::FormState;
use crate::models::resume::ResumeDocument;
use crate::models::shape::{normalize, overlay_personal};

/// Overwrites every field and rebuilds every section to match `doc`.
///
/// A section with no entries gets exactly one blank instance.
pub fn populate(form: &mut FormState, doc: ResumeDocument) {
    *form = FormState {
        personal: doc.personal,
        summary: doc.summary,
        skills: reseeded(doc.skills),
        experience: reseeded(doc.experience),
        education: reseeded(doc.education),
        projects: reseeded(doc.projects),
        certifications: reseeded(doc.certifications),
    };
}

/// Populates from any accepted external shape (standard, flat, envelope).
///
/// Returns `Ok(false)` and leaves the form alone for non-object payloads.
pub fn populate_from_value(form: &mut FormState, value: Value) -> Result<bool, serde_json::Error> {
    match normalize(value)? {
        Some(doc) => {
            populate(form, doc);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Overlays extracted contact fields without touching repeatable sections.
pub fn merge_personal(form: &mut FormState, extracted: &ResumeDocument) {
    let mut current = ResumeDocument {
        personal: form.personal.clone(),
        summary: form.summary.clone(),
        ..Default::default()
    };
    overlay_personal(&mut current, extracted);
    form.personal = current.personal;
    form.summary = current.summary;
}

/// Resets every field and reseeds one blank instance per section.
pub fn clear(form: &mut FormState) {
    *form = FormState::blank();
}

fn reseeded<T: Default>(entries: Vec<T>) -> Vec<T> {
    if entries.is_empty() {
        vec![T::default()]
    } else {
        entries
    }
}
