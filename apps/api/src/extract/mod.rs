//! Text Extractor: plain text from uploaded resumes.
//!
//! PDF extraction fails soft (empty text, logged); DOCX and plain text either
//! succeed or return an `ExtractError` for that one file.

use std::panic;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{filename} is not valid UTF-8 text")]
    NotUtf8 { filename: String },

    #[error("could not read DOCX {filename}: {message}")]
    Docx { filename: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Detects the kind from the file extension; anything unknown is text.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::PlainText
        }
    }
}

/// Extracts plain text from an uploaded file. Blocking; call from
/// `spawn_blocking` in async contexts.
pub fn extract_text(filename: &str, data: &[u8]) -> Result<String, ExtractError> {
    let text = match DocumentKind::from_filename(filename) {
        DocumentKind::Pdf => pdf_text(filename, data),
        DocumentKind::Docx => docx_text(filename, data)?,
        DocumentKind::PlainText => String::from_utf8(data.to_vec()).map_err(|_| {
            ExtractError::NotUtf8 {
                filename: filename.to_string(),
            }
        })?,
    };

    debug!("Extracted {} characters from {filename}", text.chars().count());
    Ok(text)
}

fn pdf_text(filename: &str, data: &[u8]) -> String {
    // pdf-extract panics on some malformed documents.
    let extracted = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data));
    match extracted {
        Ok(Ok(text)) => normalize_whitespace(&text),
        Ok(Err(e)) => {
            warn!("Could not extract PDF text from {filename}: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF parser panicked on {filename}");
            String::new()
        }
    }
}

fn docx_text(filename: &str, data: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::Docx {
        filename: filename.to_string(),
        message: e.to_string(),
    })?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// Collapses every whitespace run to a single space and trims the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
