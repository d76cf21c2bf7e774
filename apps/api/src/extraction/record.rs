use std::collections::BTreeSet;

use serde::Serialize;

/// Structured fields pulled out of a single resume.
///
/// Built fresh for every document and dropped once the response is rendered.
/// Scalar fields hold the first match found in document order, never a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    /// Deduplicated, case-sensitive skill tokens. Order carries no meaning.
    pub skills: BTreeSet<String>,
    /// Trimmed lines of the education section(s), newline-joined in source order.
    pub education: String,
}

impl ResumeRecord {
    /// Number of populated fields, used for extraction logging.
    pub fn populated_fields(&self) -> usize {
        [&self.name, &self.phone, &self.email, &self.linkedin]
            .iter()
            .filter(|f| f.is_some())
            .count()
            + usize::from(!self.skills.is_empty())
            + usize::from(!self.education.is_empty())
    }
}
