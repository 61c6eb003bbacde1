//! Demo resume used by the "fill sample data" action.

use crate::models::resume::{
    CertificationEntry, EducationEntry, ExperienceEntry, Personal, ProjectEntry, ResumeDocument,
    SkillEntry,
};

fn skill(category: &str, items: &str) -> SkillEntry {
    SkillEntry {
        category: category.into(),
        items: items.into(),
    }
}

fn certification(name: &str, organization: &str) -> CertificationEntry {
    CertificationEntry {
        name: name.into(),
        organization: organization.into(),
        ..Default::default()
    }
}

/// A complete document with every section filled, so preview and export
/// can be tried without typing anything.
pub fn sample_document() -> ResumeDocument {
    ResumeDocument {
        personal: Personal {
            full_name: "Jordan Example".into(),
            email: "jordan@example.com".into(),
            phone: "+1-555-0100".into(),
            location: "Springfield, USA".into(),
            linkedin: "https://www.linkedin.com/in/jordan-example/".into(),
            github: "https://github.com/jordan-example".into(),
            portfolio: "https://jordan.example.com/".into(),
        },
        summary: "Backend developer with 3+ years of experience building REST APIs, \
                  message-driven services and relational data models. Comfortable across \
                  the stack, from database tuning to front-end integration, and used to \
                  shipping in small agile teams."
            .into(),
        skills: vec![
            skill("Languages", "Rust, Java, Python, SQL"),
            skill("Frameworks", "Axum, Spring Boot, React"),
            skill("Databases", "PostgreSQL, MySQL, Redis"),
            skill("Tools", "Git, Docker, Kubernetes, GitHub Actions"),
        ],
        experience: vec![
            ExperienceEntry {
                company: "Acme Logistics".into(),
                title: "Backend Developer".into(),
                location: "Springfield, USA".into(),
                start_date: "Mar 2022".into(),
                end_date: "Present".into(),
                description: "Designed shipment tracking APIs serving 2M requests a day\n\
                              Cut p95 query latency by 40% through index and schema work\n\
                              Led the migration of nightly batch jobs to an event queue"
                    .into(),
            },
            ExperienceEntry {
                company: "Globex Software".into(),
                title: "Software Engineer Intern".into(),
                location: "Remote".into(),
                start_date: "Jun 2021".into(),
                end_date: "Dec 2021".into(),
                description: "Built an internal reporting dashboard\n\
                              Added integration tests to the billing service"
                    .into(),
            },
        ],
        education: vec![EducationEntry {
            degree: "B.Sc. Computer Science".into(),
            university: "State University".into(),
            year: "2021".into(),
            cgpa: "3.7".into(),
        }],
        projects: vec![
            ProjectEntry {
                title: "Route Planner".into(),
                description: "Delivery route optimizer with live traffic updates".into(),
                tech_stack: "Rust, Axum, PostgreSQL".into(),
            },
            ProjectEntry {
                title: "Budget Tracker".into(),
                description: "Personal finance app with monthly spending reports".into(),
                tech_stack: "React, Spring Boot, MySQL".into(),
            },
        ],
        certifications: vec![
            certification("Cloud Infrastructure Fundamentals", "Coursera"),
            certification("Introduction to Data Science", "edX"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::collector::collect;
    use crate::form::populator::populate;
    use crate::form::schema::SectionKind;
    use crate::form::state::FormState;

    #[test]
    fn test_sample_survives_populate_and_collect() {
        let mut form = FormState::blank();
        populate(&mut form, sample_document());
        assert_eq!(collect(&form), sample_document());
        assert_eq!(form.instance_count(SectionKind::Skills), 4);
        assert_eq!(form.instance_count(SectionKind::Experience), 2);
        assert_eq!(form.instance_count(SectionKind::Education), 1);
    }

    #[test]
    fn test_sample_passes_export_checks() {
        assert!(sample_document().missing_required().is_empty());
    }
}
