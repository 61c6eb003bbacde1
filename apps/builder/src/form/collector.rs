//! Reads the form into a normalized document.
//!
//! Collection never fails. Blank or partial instances stay in the form but
//! are filtered out here, so they never reach preview, export, or storage.
//! Required-field checks belong to the export paths, not to collection.

use crate::form::schema::SectionEntry;
use crate::form::state::FormState;
use crate::models::resume::ResumeDocument;

pub fn collect(form: &FormState) -> ResumeDocument {
    ResumeDocument {
        personal: form.personal.clone(),
        summary: form.summary.clone(),
        skills: retained(&form.skills),
        experience: retained(&form.experience),
        education: retained(&form.education),
        projects: retained(&form.projects),
        certifications: retained(&form.certifications),
    }
}

fn retained<T: SectionEntry>(instances: &[T]) -> Vec<T> {
    instances.iter().filter(|e| e.is_retained()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, ProjectEntry, SkillEntry};

    #[test]
    fn test_blank_form_collects_to_empty_document() {
        let doc = collect(&FormState::blank());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_in_progress_entries_are_filtered_but_kept_in_form() {
        let mut form = FormState::blank();
        form.skills = vec![
            SkillEntry {
                category: "Languages".into(),
                items: "Rust".into(),
            },
            SkillEntry {
                category: "Tools".into(),
                items: String::new(),
            },
        ];
        form.projects.push(ProjectEntry {
            description: "no title yet".into(),
            ..Default::default()
        });

        let doc = collect(&form);
        assert_eq!(doc.skills.len(), 1);
        assert!(doc.projects.is_empty());
        assert_eq!(form.skills.len(), 2);
        assert_eq!(form.projects.len(), 2);
    }

    #[test]
    fn test_order_is_preserved() {
        let mut form = FormState::blank();
        form.experience = ["A", "", "B", "C"]
            .into_iter()
            .map(|c| ExperienceEntry {
                company: c.into(),
                ..Default::default()
            })
            .collect();
        let companies: Vec<_> = collect(&form)
            .experience
            .into_iter()
            .map(|e| e.company)
            .collect();
        assert_eq!(companies, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_required_personal_fields_do_not_fail_collection() {
        let mut form = FormState::blank();
        form.summary = "Only a summary".into();
        let doc = collect(&form);
        assert_eq!(doc.summary, "Only a summary");
        assert_eq!(doc.missing_required(), vec!["fullName", "email"]);
    }
}
