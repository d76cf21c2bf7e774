//! Fixed regular expressions used by the extraction pipeline.
//!
//! Contact patterns run over the whole text blob; header and bullet patterns
//! are applied one line at a time by the section scanners.

use regex::Regex;

const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

/// Intentionally loose: optional country code, optional parentheses around the
/// area code, dot/dash/space separators. Dates and other digit runs match too.
const PHONE_PATTERN: &str = r"\b(?:\+?\d{1,3})?[.\-\s]?\(?\d{2,4}\)?[.\-\s]?\d{3}[.\-\s]?\d{4}\b";

const LINKEDIN_PATTERN: &str = r"\b(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9_-]+/?\b";

const EDUCATION_HEADER_PATTERN: &str =
    r"(?i)EDUCATION|ACADEMIC BACKGROUND|QUALIFICATIONS|DEGREE|COURSEWORK|UNIVERSITY";

const SKILLS_HEADER_PATTERN: &str =
    r"(?i)SKILLS|TECHNOLOGIES|TOOLS|EXPERTISE|TECHNICAL SKILLS|PROFICIENCIES|STRENGTHS";

const BULLET_PATTERN: &str = r"^[•●*▪-]\s*(.*)";

/// Compiled pattern library shared by every extraction.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub email: Regex,
    pub phone: Regex,
    pub linkedin: Regex,
    pub education_header: Regex,
    pub skills_header: Regex,
    pub bullet: Regex,
}

impl PatternSet {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
            linkedin: Regex::new(LINKEDIN_PATTERN)?,
            education_header: Regex::new(EDUCATION_HEADER_PATTERN)?,
            skills_header: Regex::new(SKILLS_HEADER_PATTERN)?,
            bullet: Regex::new(BULLET_PATTERN)?,
        })
    }

    pub fn first_email(&self, text: &str) -> Option<String> {
        first_match(&self.email, text)
    }

    pub fn first_phone(&self, text: &str) -> Option<String> {
        first_match(&self.phone, text)
    }

    pub fn first_linkedin(&self, text: &str) -> Option<String> {
        first_match(&self.linkedin, text)
    }

    /// Returns the content following a bullet glyph, if `line` is a bullet line.
    /// `line` is expected to be trimmed already.
    pub fn bullet_content<'t>(&self, line: &'t str) -> Option<&'t str> {
        self.bullet
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Head of the match sequence in document order; later matches are discarded.
fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> PatternSet {
        PatternSet::new().unwrap()
    }

    #[test]
    fn test_first_email_wins() {
        let text = "Contact: first@example.com or second@example.org";
        assert_eq!(
            patterns().first_email(text).as_deref(),
            Some("first@example.com")
        );
    }

    #[test]
    fn test_email_requires_alpha_tld() {
        assert_eq!(patterns().first_email("user@host.c"), None);
        assert_eq!(
            patterns().first_email("user@mail.Example.IO").as_deref(),
            Some("user@mail.Example.IO")
        );
    }

    #[test]
    fn test_phone_variants() {
        let p = patterns();
        assert_eq!(
            p.first_phone("Phone: 555-123-4567").as_deref(),
            Some("555-123-4567")
        );
        assert_eq!(
            p.first_phone("Phone: 555.123.4567").as_deref(),
            Some("555.123.4567")
        );
        // No word boundary sits before the plus sign, so the match starts at the digit.
        assert_eq!(
            p.first_phone("Mobile: +1 415 555 0134").as_deref(),
            Some("1 415 555 0134")
        );
        assert_eq!(p.first_phone("no digits here"), None);
    }

    #[test]
    fn test_phone_is_permissive_about_digit_runs() {
        // A bare ten-digit run is accepted even when it is not a phone number.
        assert_eq!(
            patterns().first_phone("Order id: 2023041512").as_deref(),
            Some("2023041512")
        );
    }

    #[test]
    fn test_linkedin_with_and_without_scheme() {
        let p = patterns();
        assert_eq!(
            p.first_linkedin("see https://www.linkedin.com/in/jane-doe_42 for more")
                .as_deref(),
            Some("https://www.linkedin.com/in/jane-doe_42")
        );
        assert_eq!(
            p.first_linkedin("linkedin.com/in/jdoe").as_deref(),
            Some("linkedin.com/in/jdoe")
        );
        assert_eq!(p.first_linkedin("linkedin.com/company/acme"), None);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_unanchored() {
        let p = patterns();
        assert!(p.skills_header.is_match("Technical Skills"));
        assert!(p.skills_header.is_match("My toolS and more"));
        assert!(p.education_header.is_match("education"));
        assert!(p.education_header.is_match("Stanford University, 2019"));
        assert!(!p.education_header.is_match("Experience"));
    }

    #[test]
    fn test_bullet_content() {
        let p = patterns();
        assert_eq!(p.bullet_content("• Python, SQL"), Some("Python, SQL"));
        assert_eq!(p.bullet_content("-Rust"), Some("Rust"));
        assert_eq!(p.bullet_content("▪   Go"), Some("Go"));
        assert_eq!(p.bullet_content("*"), Some(""));
        assert_eq!(p.bullet_content("Python, SQL"), None);
    }
}
