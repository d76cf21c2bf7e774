//! Line-oriented section scanners for the Skills and Education blocks.
//!
//! Both sections share one two-state machine. A scanner starts in
//! `NotCapturing`, flips to `Capturing` on a line matching its own header, and
//! hands every following line to a section-specific handler which decides
//! whether capture continues. A blank line or a line matching the competing
//! header is flagged as the end of the section. End of input simply ends the
//! scan. Repeated headers re-open capture and results accumulate.

use std::collections::BTreeSet;

use regex::Regex;

use crate::extraction::patterns::PatternSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NotCapturing,
    Capturing,
}

/// A line seen while capturing.
#[derive(Debug, Clone, Copy)]
pub struct SectionLine<'t> {
    pub trimmed: &'t str,
    /// Blank, or matches the competing section header.
    pub ends_section: bool,
}

pub struct SectionScanner<'p> {
    own_header: &'p Regex,
    competing_header: &'p Regex,
}

impl<'p> SectionScanner<'p> {
    pub fn new(own_header: &'p Regex, competing_header: &'p Regex) -> Self {
        Self {
            own_header,
            competing_header,
        }
    }

    /// Runs the state machine over `text`. `handle` is only called for lines
    /// after an own-header line and returns the state for the next line.
    /// The header line itself is never passed to `handle`.
    pub fn scan<'t, F>(&self, text: &'t str, mut handle: F)
    where
        F: FnMut(&SectionLine<'t>) -> ScanState,
    {
        let mut state = ScanState::NotCapturing;

        for raw in text.split('\n') {
            state = match state {
                ScanState::NotCapturing if self.own_header.is_match(raw) => ScanState::Capturing,
                ScanState::NotCapturing => ScanState::NotCapturing,
                ScanState::Capturing => {
                    let trimmed = raw.trim();
                    let line = SectionLine {
                        trimmed,
                        ends_section: trimmed.is_empty() || self.competing_header.is_match(raw),
                    };
                    handle(&line)
                }
            };
        }
    }
}

/// Collects comma-separated skills from bullet lines under a skills header.
///
/// Bullet lines are taken even if they also look like an education header.
/// Non-bullet lines inside the section are skipped without closing it.
pub fn extract_skills(text: &str, patterns: &PatternSet) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    SectionScanner::new(&patterns.skills_header, &patterns.education_header).scan(text, |line| {
        if let Some(content) = patterns.bullet_content(line.trimmed) {
            skills.extend(
                content
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
            ScanState::Capturing
        } else if line.ends_section {
            ScanState::NotCapturing
        } else {
            ScanState::Capturing
        }
    });

    skills
}

/// Collects every line under an education header until the section ends,
/// joined with `\n` in source order.
pub fn extract_education(text: &str, patterns: &PatternSet) -> String {
    let mut lines: Vec<&str> = Vec::new();

    SectionScanner::new(&patterns.education_header, &patterns.skills_header).scan(text, |line| {
        if line.ends_section {
            ScanState::NotCapturing
        } else {
            lines.push(line.trimmed);
            ScanState::Capturing
        }
    });

    lines.join("\n")
}
