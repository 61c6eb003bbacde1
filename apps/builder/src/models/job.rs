//! Job-description analysis results and the cover-letter wire types.

use serde::{Deserialize, Serialize};

use crate::models::resume::{is_blank, ResumeDocument};

/// Structured output of the job-description analysis service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JdAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub recruiter_email: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// The job a cover letter is written for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    pub job_title: String,
    pub company_name: String,
    pub jd_summary: String,
    pub recruiter_email: Option<String>,
}

impl From<&JdAnalysis> for JobContext {
    fn from(analysis: &JdAnalysis) -> Self {
        JobContext {
            job_title: analysis.job_title.clone(),
            company_name: analysis.company_name.clone(),
            jd_summary: analysis.summary.clone(),
            recruiter_email: analysis.recruiter_email.clone().filter(|e| !is_blank(e)),
        }
    }
}

impl JobContext {
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.job_title) {
            missing.push("job_title");
        }
        if is_blank(&self.company_name) {
            missing.push("company_name");
        }
        missing
    }
}

/// Request body for the cover-letter generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverLetterRequest {
    pub job_title: String,
    pub company_name: String,
    pub jd_summary: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_skills: Vec<String>,
    pub user_experience: Vec<String>,
    pub user_summary: String,
}

impl CoverLetterRequest {
    /// Reduces the resume to the subset the cover-letter service reads.
    pub fn build(doc: &ResumeDocument, job: &JobContext) -> Self {
        CoverLetterRequest {
            job_title: job.job_title.clone(),
            company_name: job.company_name.clone(),
            jd_summary: job.jd_summary.clone(),
            user_name: doc.personal.full_name.clone(),
            user_email: doc.personal.email.clone(),
            user_phone: doc.personal.phone.clone(),
            user_skills: doc
                .skills
                .iter()
                .map(|s| format!("{}: {}", s.category.trim(), s.items.trim()))
                .collect(),
            user_experience: doc
                .experience
                .iter()
                .map(|e| match (is_blank(&e.title), is_blank(&e.company)) {
                    (false, false) => format!("{} at {}", e.title.trim(), e.company.trim()),
                    (false, true) => e.title.trim().to_string(),
                    (true, _) => e.company.trim().to_string(),
                })
                .collect(),
            user_summary: doc.summary.clone(),
        }
    }
}

/// Subject and body returned by the cover-letter service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub cover_letter: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceEntry, Personal, SkillEntry};

    fn sample_doc() -> ResumeDocument {
        ResumeDocument {
            personal: Personal {
                full_name: "Ada Lovelace".into(),
                email: "ada@x.com".into(),
                phone: "+44 1".into(),
                ..Default::default()
            },
            summary: "Analyst".into(),
            skills: vec![SkillEntry {
                category: "Languages".into(),
                items: "Rust, Go".into(),
            }],
            experience: vec![
                ExperienceEntry {
                    company: "Analytical Engines".into(),
                    title: "Engineer".into(),
                    ..Default::default()
                },
                ExperienceEntry {
                    company: "Freelance".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_request_flattens_skills_and_experience() {
        let job = JobContext {
            job_title: "Backend Engineer".into(),
            company_name: "Acme".into(),
            jd_summary: "Build APIs".into(),
            recruiter_email: None,
        };
        let req = CoverLetterRequest::build(&sample_doc(), &job);
        assert_eq!(req.user_skills, vec!["Languages: Rust, Go"]);
        assert_eq!(
            req.user_experience,
            vec!["Engineer at Analytical Engines", "Freelance"]
        );
        assert_eq!(req.user_name, "Ada Lovelace");
        assert_eq!(req.company_name, "Acme");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jd_summary"], "Build APIs");
        assert_eq!(json["user_summary"], "Analyst");
    }

    #[test]
    fn test_job_context_from_analysis_drops_blank_recruiter() {
        let analysis: JdAnalysis = serde_json::from_str(
            r#"{"summary":"s","experience":"3y","job_title":"SRE","company_name":"Acme","recruiter_email":" ","skills":["k8s"]}"#,
        )
        .unwrap();
        let job = JobContext::from(&analysis);
        assert_eq!(job.job_title, "SRE");
        assert_eq!(job.jd_summary, "s");
        assert_eq!(job.recruiter_email, None);
        assert!(job.missing_required().is_empty());
    }
}
