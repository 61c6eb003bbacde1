//! Composing a generated cover letter for the user to send themselves.
//! Nothing here sends mail.

use crate::models::job::CoverLetter;

pub const BUSY_LABEL: &str = "⏳ Generating...";
pub const ANALYZE_BUSY_LABEL: &str = "⏳ Analyzing...";

/// `mailto:` URL with percent-encoded subject and body. The recipient may be empty.
pub fn mailto_url(letter: &CoverLetter, recipient: Option<&str>) -> String {
    let recipient = recipient.map(str::trim).unwrap_or_default();
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(recipient).replace("%40", "@"),
        urlencoding::encode(&letter.subject),
        urlencoding::encode(&letter.cover_letter)
    )
}

/// Plain text for the clipboard: subject line, blank line, body.
pub fn clipboard_text(letter: &CoverLetter) -> String {
    if letter.subject.trim().is_empty() {
        return letter.cover_letter.clone();
    }
    format!("Subject: {}\n\n{}", letter.subject, letter.cover_letter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> CoverLetter {
        CoverLetter {
            subject: "Application: Rust Engineer".into(),
            cover_letter: "Dear team,\nI'd love to join & help.".into(),
        }
    }

    #[test]
    fn test_mailto_encodes_subject_and_body() {
        let url = mailto_url(&letter(), Some("hr@acme.com"));
        assert_eq!(
            url,
            "mailto:hr@acme.com?subject=Application%3A%20Rust%20Engineer\
             &body=Dear%20team%2C%0AI%27d%20love%20to%20join%20%26%20help."
        );
    }

    #[test]
    fn test_mailto_allows_empty_recipient() {
        let url = mailto_url(&letter(), None);
        assert!(url.starts_with("mailto:?subject="));
    }

    #[test]
    fn test_clipboard_text_includes_subject() {
        assert_eq!(
            clipboard_text(&letter()),
            "Subject: Application: Rust Engineer\n\nDear team,\nI'd love to join & help."
        );
        let bodyonly = CoverLetter {
            subject: " ".into(),
            cover_letter: "Hi".into(),
        };
        assert_eq!(clipboard_text(&bodyonly), "Hi");
    }
}
