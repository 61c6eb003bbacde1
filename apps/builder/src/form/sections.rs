//! Append and remove repeatable section instances.

use thiserror::Error;

use crate::form::schema::SectionKind;
use crate::form::state::FormState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionEditError {
    /// The last instance is missing part of its required subset.
    #[error("{warning}")]
    Incomplete {
        section: SectionKind,
        missing: Vec<&'static str>,
        warning: &'static str,
    },

    #[error("No {section} entry at index {index}")]
    NoSuchInstance { section: SectionKind, index: usize },
}

/// Appends a blank instance, returning its index.
///
/// Rejected without any change when the current last instance has a blank
/// required field. An empty section always accepts.
pub fn append(form: &mut FormState, section: SectionKind) -> Result<usize, SectionEditError> {
    let instances = form.section_mut(section);
    if let Some(missing) = instances.last_missing_for_append() {
        if !missing.is_empty() {
            return Err(SectionEditError::Incomplete {
                section,
                missing,
                warning: section.spec().append_warning,
            });
        }
    }
    instances.push_blank();
    Ok(instances.len() - 1)
}

/// Removes exactly one instance, returning how many remain.
///
/// Removing the only instance is allowed; populate and clear reseed.
pub fn remove(
    form: &mut FormState,
    section: SectionKind,
    index: usize,
) -> Result<usize, SectionEditError> {
    let instances = form.section_mut(section);
    if !instances.remove_at(index) {
        return Err(SectionEditError::NoSuchInstance { section, index });
    }
    Ok(instances.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::FieldPath;

    fn set(form: &mut FormState, path: &str, value: &str) {
        form.set_field(&path.parse::<FieldPath>().unwrap(), value.into())
            .unwrap();
    }

    #[test]
    fn test_append_rejected_when_last_instance_incomplete() {
        let mut form = FormState::blank();
        set(&mut form, "experience[0].company", "Acme");
        set(&mut form, "experience[0].title", "Engineer");

        let err = append(&mut form, SectionKind::Experience).unwrap_err();
        match err {
            SectionEditError::Incomplete { missing, .. } => {
                assert_eq!(missing, vec!["startDate"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(form.instance_count(SectionKind::Experience), 1);
    }

    #[test]
    fn test_append_succeeds_once_required_subset_filled() {
        let mut form = FormState::blank();
        set(&mut form, "experience[0].company", "Acme");
        set(&mut form, "experience[0].title", "Engineer");
        set(&mut form, "experience[0].startDate", "2020");

        assert_eq!(append(&mut form, SectionKind::Experience).unwrap(), 1);
        assert_eq!(form.instance_count(SectionKind::Experience), 2);
    }

    #[test]
    fn test_each_section_checks_its_own_subset() {
        let cases: [(SectionKind, &[(&str, &str)]); 4] = [
            (
                SectionKind::Skills,
                &[("category", "Lang"), ("items", "Rust")],
            ),
            (
                SectionKind::Education,
                &[("degree", "BSc"), ("university", "MIT"), ("year", "2020")],
            ),
            (
                SectionKind::Projects,
                &[("title", "Engine"), ("description", "Computes")],
            ),
            (
                SectionKind::Certifications,
                &[("name", "CKA"), ("organization", "CNCF")],
            ),
        ];

        for (section, fields) in cases {
            let mut form = FormState::blank();
            for (i, (key, value)) in fields.iter().enumerate() {
                assert!(
                    append(&mut form, section).is_err(),
                    "{section} accepted append with {i} of {} fields",
                    fields.len()
                );
                set(&mut form, &format!("{section}[0].{key}"), value);
            }
            assert!(append(&mut form, section).is_ok(), "{section}");
        }
    }

    #[test]
    fn test_warning_message_comes_from_schema() {
        let mut form = FormState::blank();
        let err = append(&mut form, SectionKind::Skills).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please fill in the current skill entry before adding another."
        );
    }

    #[test]
    fn test_append_to_empty_section_always_succeeds() {
        let mut form = FormState::blank();
        remove(&mut form, SectionKind::Projects, 0).unwrap();
        assert_eq!(append(&mut form, SectionKind::Projects).unwrap(), 0);
    }

    #[test]
    fn test_remove_reduces_count_by_exactly_one() {
        let mut form = FormState::blank();
        set(&mut form, "skills[0].category", "Lang");
        set(&mut form, "skills[0].items", "Rust");
        append(&mut form, SectionKind::Skills).unwrap();
        set(&mut form, "skills[1].category", "Tools");

        assert_eq!(remove(&mut form, SectionKind::Skills, 0).unwrap(), 1);
        assert_eq!(form.skills[0].category, "Tools");
        assert_eq!(remove(&mut form, SectionKind::Skills, 0).unwrap(), 0);
    }

    #[test]
    fn test_remove_out_of_range_is_rejected() {
        let mut form = FormState::blank();
        let err = remove(&mut form, SectionKind::Education, 3).unwrap_err();
        assert_eq!(
            err,
            SectionEditError::NoSuchInstance {
                section: SectionKind::Education,
                index: 3
            }
        );
        assert_eq!(form.instance_count(SectionKind::Education), 1);
    }
}
