use std::path::Path;

use tracing::{debug, info};

use crate::extraction::ner::{first_person, EntityRecognizer};
use crate::extraction::patterns::PatternSet;
use crate::extraction::record::ResumeRecord;
use crate::extraction::sections::{extract_education, extract_skills};
use crate::extraction::text::DocumentFormat;
use crate::extraction::ExtractError;

/// The extraction pipeline. Built once at startup and shared by every request
/// through `AppState`; holds no per-document state.
pub struct ResumePipeline {
    patterns: PatternSet,
    recognizer: Box<dyn EntityRecognizer>,
}

impl ResumePipeline {
    pub fn new(patterns: PatternSet, recognizer: Box<dyn EntityRecognizer>) -> Self {
        Self {
            patterns,
            recognizer,
        }
    }

    pub fn ner_backend(&self) -> &'static str {
        self.recognizer.backend()
    }

    /// Reads the document at `path` and extracts a record from its text.
    /// The extension is checked before the file is opened.
    pub fn process_document(&self, path: &Path) -> Result<ResumeRecord, ExtractError> {
        let format = DocumentFormat::from_path(path)?;
        let text = format.extract_text(path)?;
        info!(
            "Extracted {} chars of text from {:?} document",
            text.len(),
            format
        );
        self.extract_info(&text)
    }

    /// Runs the pattern library, both section scanners and the recognizer
    /// independently over `text` and merges the results.
    pub fn extract_info(&self, text: &str) -> Result<ResumeRecord, ExtractError> {
        let entities = self.recognizer.recognize(text)?;

        let record = ResumeRecord {
            name: first_person(&entities),
            phone: self.patterns.first_phone(text),
            email: self.patterns.first_email(text),
            linkedin: self.patterns.first_linkedin(text),
            skills: extract_skills(text, &self.patterns),
            education: extract_education(text, &self.patterns),
        };

        debug!(
            "Record: {} entities seen, {} skills, {} of 6 fields populated",
            entities.len(),
            record.skills.len(),
            record.populated_fields()
        );
        Ok(record)
    }
}
