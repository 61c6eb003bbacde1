use serde::{Deserialize, Serialize};

/// Contact block at the top of the resume.
///
/// Every field is a plain string; an empty string means "not provided".
/// `full_name` and `email` are required before anything is exported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Personal {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub category: String,
    /// Comma-separated, kept verbatim.
    pub items: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    /// One bullet per line.
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub degree: String,
    pub university: String,
    pub year: String,
    pub cgpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub tech_stack: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationEntry {
    pub name: String,
    pub organization: String,
    pub date: String,
    pub link: String,
}

/// The normalized resume document.
///
/// This is the only shape that crosses the edit / preview / export /
/// persistence boundaries. Repeatable sections only ever contain entries
/// that passed their section's retention rule during collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub personal: Personal,
    pub summary: String,
    pub skills: Vec<SkillEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
}

impl Personal {
    pub fn is_empty(&self) -> bool {
        [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.location,
            &self.linkedin,
            &self.github,
            &self.portfolio,
        ]
        .iter()
        .all(|v| is_blank(v))
    }
}

impl ResumeDocument {
    /// True when the document carries no user data at all.
    pub fn is_empty(&self) -> bool {
        self.personal.is_empty()
            && is_blank(&self.summary)
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
    }

    /// Name and email must be present before preview generation or export.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.personal.full_name) {
            missing.push("fullName");
        }
        if is_blank(&self.personal.email) {
            missing.push("email");
        }
        missing
    }
}

/// Whitespace-only counts as empty everywhere in the form engine.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
