//! Shape detection for documents arriving from outside the form engine.
//!
//! The resume-data endpoint, the PDF extraction service, and old cache
//! records do not agree on a single shape. Everything is funnelled through
//! [`IncomingShape::detect`] and converted to a [`ResumeDocument`] before
//! anything else touches it.

use serde::Deserialize;
use serde_json::Value;

use crate::models::envelope::StorageEnvelope;
use crate::models::resume::{is_blank, Personal, ResumeDocument};

/// Placeholder the extraction service emits when it could not find a name.
const EXTRACTION_PLACEHOLDER: &str = "N/A";

/// Top-level `name/email/...` document produced by the PDF extraction service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyFlatDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl LegacyFlatDocument {
    pub fn into_document(self) -> ResumeDocument {
        let full_name = self
            .name
            .filter(|n| n.trim() != EXTRACTION_PLACEHOLDER)
            .unwrap_or_default();

        ResumeDocument {
            personal: Personal {
                full_name,
                email: self.email.unwrap_or_default(),
                phone: self.phone.unwrap_or_default(),
                location: self.location.unwrap_or_default(),
                linkedin: self.linkedin.unwrap_or_default(),
                github: self.github.unwrap_or_default(),
                portfolio: self.portfolio.unwrap_or_default(),
            },
            summary: self.summary.unwrap_or_default(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IncomingShape {
    Standard(ResumeDocument),
    LegacyFlat(LegacyFlatDocument),
    Enveloped(StorageEnvelope),
    Unrecognized,
}

impl IncomingShape {
    /// Classifies a JSON value.
    ///
    /// `content` marks an envelope, `personal` a standard document. Without
    /// `personal`, a top-level `name` or `email` marks the flat shape. Any
    /// other object is read as a (possibly partial) standard document.
    pub fn detect(value: Value) -> Result<Self, serde_json::Error> {
        let Some(object) = value.as_object() else {
            return Ok(IncomingShape::Unrecognized);
        };

        if object.contains_key("content") {
            return Ok(IncomingShape::Enveloped(serde_json::from_value(value)?));
        }
        if object.contains_key("personal") {
            return Ok(IncomingShape::Standard(serde_json::from_value(value)?));
        }
        if object.contains_key("name") || object.contains_key("email") {
            return Ok(IncomingShape::LegacyFlat(serde_json::from_value(value)?));
        }
        Ok(IncomingShape::Standard(serde_json::from_value(value)?))
    }

    pub fn into_document(self) -> Option<ResumeDocument> {
        match self {
            IncomingShape::Standard(doc) => Some(doc),
            IncomingShape::LegacyFlat(flat) => Some(flat.into_document()),
            IncomingShape::Enveloped(envelope) => Some(envelope.content),
            IncomingShape::Unrecognized => None,
        }
    }
}

/// Detects and normalizes in one step. `Ok(None)` for non-object payloads.
pub fn normalize(value: Value) -> Result<Option<ResumeDocument>, serde_json::Error> {
    Ok(IncomingShape::detect(value)?.into_document())
}

/// Same as [`normalize`] but treats a document without user data as absent.
pub fn normalize_non_empty(value: Value) -> Result<Option<ResumeDocument>, serde_json::Error> {
    Ok(normalize(value)?.filter(|doc| !doc.is_empty()))
}

/// Overlays the non-blank personal fields and summary of `extracted` onto `target`.
pub fn overlay_personal(target: &mut ResumeDocument, extracted: &ResumeDocument) {
    let src = &extracted.personal;
    let dst = &mut target.personal;
    for (from, to) in [
        (&src.full_name, &mut dst.full_name),
        (&src.email, &mut dst.email),
        (&src.phone, &mut dst.phone),
        (&src.location, &mut dst.location),
        (&src.linkedin, &mut dst.linkedin),
        (&src.github, &mut dst.github),
        (&src.portfolio, &mut dst.portfolio),
    ] {
        if !is_blank(from) {
            to.clone_from(from);
        }
    }
    if !is_blank(&extracted.summary) {
        target.summary.clone_from(&extracted.summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_standard_shape() {
        let shape = IncomingShape::detect(json!({
            "personal": {"fullName": "Ada", "email": "ada@x.com"},
            "skills": [{"category": "Lang", "items": "Rust"}]
        }))
        .unwrap();
        let IncomingShape::Standard(doc) = shape else {
            panic!("expected standard shape");
        };
        assert_eq!(doc.skills.len(), 1);
    }

    #[test]
    fn test_flat_shape_is_up_converted() {
        let doc = normalize(json!({
            "name": "Ada Lovelace",
            "email": "ada@x.com",
            "phone": "+44 1",
            "github": null,
            "summary": "Analyst"
        }))
        .unwrap()
        .unwrap();
        assert_eq!(doc.personal.full_name, "Ada Lovelace");
        assert_eq!(doc.personal.phone, "+44 1");
        assert_eq!(doc.personal.github, "");
        assert_eq!(doc.summary, "Analyst");
    }

    #[test]
    fn test_personal_key_wins_over_flat_keys() {
        let shape = IncomingShape::detect(json!({
            "personal": {"fullName": "Nested"},
            "name": "Flat"
        }))
        .unwrap();
        assert!(matches!(shape, IncomingShape::Standard(_)));
        assert_eq!(
            shape.into_document().unwrap().personal.full_name,
            "Nested"
        );
    }

    #[test]
    fn test_envelope_is_unwrapped() {
        let doc = normalize(json!({
            "owner": "a@x.com",
            "content": {"personal": {"fullName": "Ada"}}
        }))
        .unwrap()
        .unwrap();
        assert_eq!(doc.personal.full_name, "Ada");
    }

    #[test]
    fn test_placeholder_name_is_dropped() {
        let doc = normalize(json!({"name": "N/A", "email": ""}))
            .unwrap()
            .unwrap();
        assert!(doc.is_empty());
        assert_eq!(normalize_non_empty(json!({"name": "N/A"})).unwrap(), None);
    }

    #[test]
    fn test_non_object_is_unrecognized() {
        assert_eq!(normalize(json!([1, 2])).unwrap(), None);
        assert_eq!(normalize(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_overlay_keeps_existing_values_for_blank_fields() {
        let mut target = ResumeDocument {
            personal: Personal {
                full_name: "Typed Name".into(),
                phone: "123".into(),
                ..Default::default()
            },
            summary: "kept".into(),
            ..Default::default()
        };
        let extracted = ResumeDocument {
            personal: Personal {
                email: "new@x.com".into(),
                phone: "  ".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        overlay_personal(&mut target, &extracted);
        assert_eq!(target.personal.full_name, "Typed Name");
        assert_eq!(target.personal.email, "new@x.com");
        assert_eq!(target.personal.phone, "123");
        assert_eq!(target.summary, "kept");
    }
}
