//! Static description of every field the form captures.
//!
//! Each repeatable section declares its fields, the subset that must be
//! filled before another instance may be appended, and the rule deciding
//! whether an instance is kept when the form is collected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::resume::{
    is_blank, CertificationEntry, EducationEntry, ExperienceEntry, Personal, ProjectEntry,
    SkillEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// JSON key of the field inside its entry.
    pub key: &'static str,
    pub label: &'static str,
    pub multiline: bool,
}

/// Collection-time rule for keeping an instance.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "rule", content = "fields", rename_all = "snake_case")]
pub enum Retention {
    /// Every listed field must be non-blank.
    AllOf(&'static [&'static str]),
    /// At least one listed field must be non-blank.
    AnyOf(&'static [&'static str]),
}

#[derive(Debug, Serialize)]
pub struct SectionSpec {
    pub kind: SectionKind,
    pub fields: &'static [FieldSpec],
    pub required_for_append: &'static [&'static str],
    pub retention: Retention,
    pub append_warning: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        multiline: false,
    }
}

const fn multiline(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        multiline: true,
    }
}

pub const PERSONAL_FIELDS: &[FieldSpec] = &[
    field("fullName", "Full Name"),
    field("email", "Email"),
    field("phone", "Phone"),
    field("location", "Location"),
    field("linkedin", "LinkedIn"),
    field("github", "GitHub"),
    field("portfolio", "Portfolio"),
];

pub const SUMMARY_FIELD: FieldSpec = multiline("summary", "Professional Summary");

static SKILLS: SectionSpec = SectionSpec {
    kind: SectionKind::Skills,
    fields: &[
        field("category", "Skill Category"),
        field("items", "Skills (comma-separated)"),
    ],
    required_for_append: &["category", "items"],
    retention: Retention::AllOf(&["category", "items"]),
    append_warning: "Please fill in the current skill entry before adding another.",
};

static EXPERIENCE: SectionSpec = SectionSpec {
    kind: SectionKind::Experience,
    fields: &[
        field("company", "Company Name"),
        field("title", "Job Title"),
        field("location", "Location"),
        field("startDate", "Start Date"),
        field("endDate", "End Date"),
        multiline("description", "Responsibilities & Achievements"),
    ],
    required_for_append: &["company", "title", "startDate"],
    retention: Retention::AnyOf(&["company", "title"]),
    append_warning: "Please complete the current experience entry before adding another.",
};

static EDUCATION: SectionSpec = SectionSpec {
    kind: SectionKind::Education,
    fields: &[
        field("degree", "Degree"),
        field("university", "University/Institution"),
        field("year", "Graduation Year"),
        field("cgpa", "CGPA/GPA"),
    ],
    required_for_append: &["degree", "university", "year"],
    retention: Retention::AnyOf(&["degree", "university"]),
    append_warning: "Please complete the current education entry before adding another.",
};

static PROJECTS: SectionSpec = SectionSpec {
    kind: SectionKind::Projects,
    fields: &[
        field("title", "Project Title"),
        multiline("description", "Project Description"),
        field("techStack", "Tech Stack"),
    ],
    required_for_append: &["title", "description"],
    retention: Retention::AllOf(&["title"]),
    append_warning: "Please complete the current project entry before adding another.",
};

static CERTIFICATIONS: SectionSpec = SectionSpec {
    kind: SectionKind::Certifications,
    fields: &[
        field("name", "Certification Name"),
        field("organization", "Issuing Organization"),
        field("date", "Date"),
        field("link", "Credential Link"),
    ],
    required_for_append: &["name", "organization"],
    retention: Retention::AllOf(&["name"]),
    append_warning: "Please complete the current certification entry before adding another.",
};

/// Everything a front end needs to lay out the form.
#[derive(Debug, Serialize)]
pub struct FormSchema {
    pub personal: &'static [FieldSpec],
    pub summary: FieldSpec,
    pub sections: Vec<&'static SectionSpec>,
}

pub fn form_schema() -> FormSchema {
    FormSchema {
        personal: PERSONAL_FIELDS,
        summary: SUMMARY_FIELD,
        sections: SectionKind::ALL.into_iter().map(SectionKind::spec).collect(),
    }
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Projects,
        SectionKind::Certifications,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
        }
    }

    pub fn spec(self) -> &'static SectionSpec {
        match self {
            SectionKind::Skills => &SKILLS,
            SectionKind::Experience => &EXPERIENCE,
            SectionKind::Education => &EDUCATION,
            SectionKind::Projects => &PROJECTS,
            SectionKind::Certifications => &CERTIFICATIONS,
        }
    }

    pub fn has_field(self, key: &str) -> bool {
        self.spec().fields.iter().any(|f| f.key == key)
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

impl Retention {
    pub fn accepts<'a>(&self, value: impl Fn(&str) -> Option<&'a str>) -> bool {
        let filled = |key: &&str| value(*key).is_some_and(|v| !is_blank(v));
        match self {
            Retention::AllOf(keys) => keys.iter().all(filled),
            Retention::AnyOf(keys) => keys.iter().any(filled),
        }
    }
}

/// An entry type backing one repeatable section.
pub trait SectionEntry: Clone + Default + PartialEq {
    const KIND: SectionKind;

    fn field(&self, key: &str) -> Option<&String>;

    fn field_mut(&mut self, key: &str) -> Option<&mut String>;

    /// Whether collection keeps this instance.
    fn is_retained(&self) -> bool {
        Self::KIND
            .spec()
            .retention
            .accepts(|key| self.field(key).map(String::as_str))
    }

    /// Required-for-append fields that are still blank.
    fn missing_for_append(&self) -> Vec<&'static str> {
        Self::KIND
            .spec()
            .required_for_append
            .iter()
            .copied()
            .filter(|key| self.field(*key).map_or(true, |v| is_blank(v)))
            .collect()
    }
}

macro_rules! section_entry {
    ($ty:ty, $kind:expr, { $($key:literal => $field:ident),+ $(,)? }) => {
        impl SectionEntry for $ty {
            const KIND: SectionKind = $kind;

            fn field(&self, key: &str) -> Option<&String> {
                match key {
                    $($key => Some(&self.$field),)+
                    _ => None,
                }
            }

            fn field_mut(&mut self, key: &str) -> Option<&mut String> {
                match key {
                    $($key => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

section_entry!(SkillEntry, SectionKind::Skills, {
    "category" => category,
    "items" => items,
});

section_entry!(ExperienceEntry, SectionKind::Experience, {
    "company" => company,
    "title" => title,
    "location" => location,
    "startDate" => start_date,
    "endDate" => end_date,
    "description" => description,
});

section_entry!(EducationEntry, SectionKind::Education, {
    "degree" => degree,
    "university" => university,
    "year" => year,
    "cgpa" => cgpa,
});

section_entry!(ProjectEntry, SectionKind::Projects, {
    "title" => title,
    "description" => description,
    "techStack" => tech_stack,
});

section_entry!(CertificationEntry, SectionKind::Certifications, {
    "name" => name,
    "organization" => organization,
    "date" => date,
    "link" => link,
});

pub fn personal_field_mut<'a>(personal: &'a mut Personal, key: &str) -> Option<&'a mut String> {
    match key {
        "fullName" => Some(&mut personal.full_name),
        "email" => Some(&mut personal.email),
        "phone" => Some(&mut personal.phone),
        "location" => Some(&mut personal.location),
        "linkedin" => Some(&mut personal.linkedin),
        "github" => Some(&mut personal.github),
        "portfolio" => Some(&mut personal.portfolio),
        _ => None,
    }
}
