// Resume field extraction: document text → patterns, section scanners and
// NER → one ResumeRecord. Everything here is synchronous; HTTP handlers run
// it inside tokio::task::spawn_blocking.

pub mod ner;
pub mod patterns;
pub mod pipeline;
pub mod record;
pub mod sections;
pub mod text;

use thiserror::Error;

pub use ner::{EntityRecognizer, HeuristicEntityRecognizer, HttpEntityRecognizer};
pub use pipeline::ResumePipeline;
pub use record::ResumeRecord;
pub use text::DocumentFormat;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Word document extraction failed: {0}")]
    Docx(String),

    #[error("Entity recognition failed: {0}")]
    Ner(#[from] ner::NerError),
}

impl ExtractError {
    /// Callers only distinguish "unsupported format" from "extraction failed".
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, ExtractError::UnsupportedFormat(_))
    }
}
