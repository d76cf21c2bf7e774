//! Format-specific readers that turn a resume file into one text blob.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::panic;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::extraction::ExtractError;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Dispatches on the file name suffix. The check is case-sensitive, so
    /// `resume.PDF` is rejected.
    pub fn from_file_name(name: &str) -> Result<Self, ExtractError> {
        if name.ends_with(".pdf") {
            Ok(DocumentFormat::Pdf)
        } else if name.ends_with(".docx") {
            Ok(DocumentFormat::Docx)
        } else {
            Err(ExtractError::UnsupportedFormat(name.to_string()))
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        Self::from_file_name(&path.to_string_lossy())
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
        }
    }

    pub fn extract_text(self, path: &Path) -> Result<String, ExtractError> {
        match self {
            DocumentFormat::Pdf => extract_pdf_text(path),
            DocumentFormat::Docx => extract_docx_text(path),
        }
    }
}

/// Page texts concatenated in page order. Pages without extractable text
/// contribute nothing.
pub fn extract_pdf_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;

    // pdf-extract panics on some malformed font and encoding tables.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| ExtractError::Pdf("PDF parser aborted on malformed content".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    debug!("Extracted {} PDF pages from {}", pages.len(), path.display());
    Ok(pages.concat())
}

/// Body paragraphs of a `.docx`, joined with `\n`.
pub fn extract_docx_text(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| ExtractError::Docx(format!("not a Word document: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractError::Docx(format!("missing {DOCX_BODY_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    let paragraphs = body_paragraphs(&xml)?;
    debug!(
        "Extracted {} Word paragraphs from {}",
        paragraphs.len(),
        path.display()
    );
    Ok(paragraphs.join("\n"))
}

/// Walks `word/document.xml` and returns the text of each top-level body
/// paragraph. Paragraphs inside tables or nested in text boxes are skipped.
fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut table_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Docx(format!("malformed document XML: {e}")))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 && table_depth == 0 {
                        current = Some(String::new());
                    }
                }
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => {
                let text = current.as_mut().filter(|_| paragraph_depth == 1);
                match (e.name().as_ref(), text) {
                    (b"w:p", _) if paragraph_depth == 0 && table_depth == 0 => {
                        paragraphs.push(String::new())
                    }
                    (b"w:tab", Some(text)) if in_run => text.push('\t'),
                    (b"w:br" | b"w:cr", Some(text)) if in_run => text.push('\n'),
                    _ => {}
                }
            }
            Event::Text(t) if in_text && paragraph_depth == 1 => {
                if let Some(text) = current.as_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| ExtractError::Docx(format!("bad text escape: {e}")))?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:p" => {
                    if paragraph_depth == 1 {
                        if let Some(text) = current.take() {
                            paragraphs.push(text);
                        }
                    }
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Builds a minimal `.docx` on disk for tests.
#[cfg(test)]
pub(crate) fn write_docx(path: &Path, body_xml: &str) {
    use std::io::Write;

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body_xml}</w:body></w:document>"#
    );
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file(DOCX_BODY_PART, zip::write::FileOptions::default())
        .unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Body XML with one single-run paragraph per line.
#[cfg(test)]
pub(crate) fn paragraphs_xml(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| format!(r#"<w:p><w:r><w:t xml:space="preserve">{line}</w:t></w:r></w:p>"#))
        .collect()
}
