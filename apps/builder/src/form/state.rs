//! The editable form: every field value plus every repeatable-section
//! instance, including blank in-progress ones that collection will drop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::schema::{personal_field_mut, SectionEntry, SectionKind, PERSONAL_FIELDS};
use crate::models::resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, Personal, ProjectEntry, SkillEntry,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub personal: Personal,
    pub summary: String,
    pub skills: Vec<SkillEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::blank()
    }
}

impl FormState {
    /// Empty form with one blank instance per repeatable section.
    pub fn blank() -> Self {
        FormState {
            personal: Personal::default(),
            summary: String::new(),
            skills: vec![SkillEntry::default()],
            experience: vec![ExperienceEntry::default()],
            education: vec![EducationEntry::default()],
            projects: vec![ProjectEntry::default()],
            certifications: vec![CertificationEntry::default()],
        }
    }

    pub fn section(&self, kind: SectionKind) -> &dyn SectionInstances {
        match kind {
            SectionKind::Skills => &self.skills,
            SectionKind::Experience => &self.experience,
            SectionKind::Education => &self.education,
            SectionKind::Projects => &self.projects,
            SectionKind::Certifications => &self.certifications,
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut dyn SectionInstances {
        match kind {
            SectionKind::Skills => &mut self.skills,
            SectionKind::Experience => &mut self.experience,
            SectionKind::Education => &mut self.education,
            SectionKind::Projects => &mut self.projects,
            SectionKind::Certifications => &mut self.certifications,
        }
    }

    pub fn instance_count(&self, kind: SectionKind) -> usize {
        self.section(kind).len()
    }

    /// Applies one field-input event.
    pub fn set_field(&mut self, path: &FieldPath, value: String) -> Result<(), FieldPathError> {
        let slot = match path {
            FieldPath::Summary => Some(&mut self.summary),
            FieldPath::Personal(key) => personal_field_mut(&mut self.personal, key),
            FieldPath::Entry {
                section,
                index,
                key,
            } => {
                let instances = self.section_mut(*section);
                let len = instances.len();
                if *index >= len {
                    return Err(FieldPathError::IndexOutOfRange {
                        section: *section,
                        index: *index,
                        len,
                    });
                }
                instances.field_mut(*index, key)
            }
        };

        let slot = slot.ok_or_else(|| FieldPathError::UnknownField(path.to_string()))?;
        *slot = value;
        Ok(())
    }
}

/// Object-safe view over one section's instance list.
pub trait SectionInstances {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_blank(&mut self);

    /// Removes the instance at `index`; `false` when out of range.
    fn remove_at(&mut self, index: usize) -> bool;

    /// Blank required fields of the last instance; `None` when there are no instances.
    fn last_missing_for_append(&self) -> Option<Vec<&'static str>>;

    fn field_mut(&mut self, index: usize, key: &str) -> Option<&mut String>;
}

impl<T: SectionEntry> SectionInstances for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn push_blank(&mut self) {
        self.push(T::default());
    }

    fn remove_at(&mut self, index: usize) -> bool {
        if index < Vec::len(self) {
            self.remove(index);
            true
        } else {
            false
        }
    }

    fn last_missing_for_append(&self) -> Option<Vec<&'static str>> {
        self.last().map(SectionEntry::missing_for_append)
    }

    fn field_mut(&mut self, index: usize, key: &str) -> Option<&mut String> {
        self.get_mut(index).and_then(|entry| entry.field_mut(key))
    }
}

/// Address of a single form field, e.g. `personal.fullName`, `summary`,
/// or `experience[0].startDate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    Personal(String),
    Summary,
    Entry {
        section: SectionKind,
        index: usize,
        key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    #[error("Malformed field path '{0}'")]
    Malformed(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("No {section} entry at index {index} (section has {len})")]
    IndexOutOfRange {
        section: SectionKind,
        index: usize,
        len: usize,
    },
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "summary" {
            return Ok(FieldPath::Summary);
        }

        let (head, key) = s
            .split_once('.')
            .ok_or_else(|| FieldPathError::Malformed(s.to_string()))?;

        if head == "personal" {
            if !PERSONAL_FIELDS.iter().any(|f| f.key == key) {
                return Err(FieldPathError::UnknownField(s.to_string()));
            }
            return Ok(FieldPath::Personal(key.to_string()));
        }

        let (section, index) = head
            .strip_suffix(']')
            .and_then(|h| h.split_once('['))
            .ok_or_else(|| FieldPathError::Malformed(s.to_string()))?;
        let section: SectionKind = section
            .parse()
            .map_err(|_| FieldPathError::UnknownField(s.to_string()))?;
        let index: usize = index
            .parse()
            .map_err(|_| FieldPathError::Malformed(s.to_string()))?;
        if !section.has_field(key) {
            return Err(FieldPathError::UnknownField(s.to_string()));
        }

        Ok(FieldPath::Entry {
            section,
            index,
            key: key.to_string(),
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Personal(key) => write!(f, "personal.{key}"),
            FieldPath::Summary => f.write_str("summary"),
            FieldPath::Entry {
                section,
                index,
                key,
            } => write!(f, "{section}[{index}].{key}"),
        }
    }
}
