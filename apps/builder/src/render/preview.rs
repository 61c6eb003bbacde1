//! Renders a `ResumeDocument` as preview HTML.
//!
//! Pure and deterministic. Every user-supplied value is escaped, including
//! inside attributes. Blank optional values suppress their whole line or
//! section. Section order is fixed: header/contact, summary, skills,
//! experience, education, projects, certifications.

use crate::models::resume::{
    is_blank, CertificationEntry, EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument,
    SkillEntry,
};

/// Escapes the five markup-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_preview(doc: &ResumeDocument) -> String {
    let mut html = String::new();
    render_header(doc, &mut html);

    if !is_blank(&doc.summary) {
        html.push_str(&section_open("summary", "Summary"));
        html.push_str(&format!(
            "<p class=\"summary\">{}</p>",
            escape_html(doc.summary.trim())
        ));
        html.push_str("</section>");
    }

    render_section(&mut html, "skills", "Technical Skills", &doc.skills, render_skill);
    render_section(
        &mut html,
        "experience",
        "Professional Experience",
        &doc.experience,
        render_experience,
    );
    render_section(&mut html, "education", "Education", &doc.education, render_education);
    render_section(&mut html, "projects", "Projects", &doc.projects, render_project);
    render_section(
        &mut html,
        "certifications",
        "Certifications",
        &doc.certifications,
        render_certification,
    );

    html
}

fn render_header(doc: &ResumeDocument, html: &mut String) {
    let p = &doc.personal;
    if !is_blank(&p.full_name) {
        html.push_str(&format!(
            "<header><h1 class=\"name\">{}</h1></header>",
            escape_html(p.full_name.trim())
        ));
    }

    let mut contact = Vec::new();
    if !is_blank(&p.email) {
        let email = escape_html(p.email.trim());
        contact.push(format!("<a href=\"mailto:{email}\">{email}</a>"));
    }
    for plain in [&p.phone, &p.location] {
        if !is_blank(plain) {
            contact.push(escape_html(plain.trim()));
        }
    }
    for (url, label) in [
        (&p.linkedin, "LinkedIn"),
        (&p.github, "GitHub"),
        (&p.portfolio, "Portfolio"),
    ] {
        if !is_blank(url) {
            contact.push(link(url, label));
        }
    }

    if !contact.is_empty() {
        html.push_str(&format!(
            "<div class=\"contact\">{}</div>",
            contact.join(" &bull; ")
        ));
    }
}

fn section_open(class: &str, title: &str) -> String {
    format!("<section class=\"{class}\"><h2>{title}</h2>")
}

fn render_section<T>(
    html: &mut String,
    class: &str,
    title: &str,
    entries: &[T],
    render_entry: fn(&T) -> String,
) {
    if entries.is_empty() {
        return;
    }
    html.push_str(&section_open(class, title));
    for entry in entries {
        html.push_str(&render_entry(entry));
    }
    html.push_str("</section>");
}

fn render_skill(skill: &SkillEntry) -> String {
    format!(
        "<div class=\"skill\"><strong>{}:</strong> {}</div>",
        escape_html(skill.category.trim()),
        escape_html(skill.items.trim())
    )
}

fn render_experience(exp: &ExperienceEntry) -> String {
    let mut out = String::from("<div class=\"entry\">");
    if !is_blank(&exp.title) {
        out.push_str(&format!(
            "<div class=\"title\">{}</div>",
            escape_html(exp.title.trim())
        ));
    }
    if let Some(line) = joined(&[&exp.company, &exp.location], " &mdash; ") {
        out.push_str(&format!("<div class=\"org\">{line}</div>"));
    }
    if let Some(line) = joined(&[&exp.start_date, &exp.end_date], " - ") {
        out.push_str(&format!("<div class=\"dates\">{line}</div>"));
    }

    let bullets: Vec<_> = exp
        .description
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if !bullets.is_empty() {
        out.push_str("<ul>");
        for bullet in bullets {
            out.push_str(&format!("<li>{}</li>", escape_html(bullet)));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
    out
}

fn render_education(edu: &EducationEntry) -> String {
    let mut out = String::from("<div class=\"entry\">");
    if let Some(line) = joined(&[&edu.degree, &edu.university], " &mdash; ") {
        out.push_str(&format!("<div class=\"title\">{line}</div>"));
    }
    let mut details = Vec::new();
    if !is_blank(&edu.year) {
        details.push(escape_html(edu.year.trim()));
    }
    if !is_blank(&edu.cgpa) {
        details.push(format!("CGPA: {}", escape_html(edu.cgpa.trim())));
    }
    if !details.is_empty() {
        out.push_str(&format!(
            "<div class=\"dates\">{}</div>",
            details.join(" | ")
        ));
    }
    out.push_str("</div>");
    out
}

fn render_project(proj: &ProjectEntry) -> String {
    let mut out = String::from("<div class=\"entry\">");
    if let Some(line) = joined(&[&proj.title, &proj.description], " &mdash; ") {
        out.push_str(&format!("<div class=\"title\">{line}</div>"));
    }
    if !is_blank(&proj.tech_stack) {
        out.push_str(&format!(
            "<div class=\"tech\">Tech Stack: {}</div>",
            escape_html(proj.tech_stack.trim())
        ));
    }
    out.push_str("</div>");
    out
}

fn render_certification(cert: &CertificationEntry) -> String {
    let mut line = joined(&[&cert.name, &cert.organization], " &mdash; ").unwrap_or_default();
    if !is_blank(&cert.date) {
        line.push_str(&format!(" ({})", escape_html(cert.date.trim())));
    }
    if !is_blank(&cert.link) {
        line.push_str(&format!(" {}", link(&cert.link, "Credential")));
    }
    format!("<div class=\"entry\">{line}</div>")
}

/// Escapes and joins the non-blank values, or `None` if all are blank.
fn joined(values: &[&String], separator: &str) -> Option<String> {
    let parts: Vec<_> = values
        .iter()
        .filter(|v| !is_blank(v))
        .map(|v| escape_html(v.trim()))
        .collect();
    (!parts.is_empty()).then(|| parts.join(separator))
}

/// Anchor for a user-supplied URL. Script-capable schemes render as plain text.
fn link(url: &str, label: &str) -> String {
    let url = url.trim();
    if is_safe_href(url) {
        format!("<a href=\"{}\">{label}</a>", escape_html(url))
    } else {
        escape_html(url)
    }
}

fn is_safe_href(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let Some((scheme, _)) = lower.split_once(':') else {
        return true;
    };
    // "example.com:8080/x" has no scheme; a real scheme has no dots or slashes.
    if scheme.contains(['.', '/']) {
        return true;
    }
    matches!(scheme, "http" | "https" | "mailto")
}
