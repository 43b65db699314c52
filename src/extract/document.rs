//! Document text-source boundary.
//!
//! Narratives may arrive as typed text or as an uploaded document. Extraction
//! from binary formats (PDF and friends) lives behind [`TextExtractor`]; the
//! crate ships only the plain-text passthrough.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document is not valid UTF-8 text")]
    InvalidEncoding,

    #[error("Document text extraction failed: {0}")]
    Extraction(String),
}

/// Turns uploaded document bytes into narrative text.
pub trait TextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Passthrough for documents that are already plain text.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DocumentError::InvalidEncoding)?;
        Ok(text.to_string())
    }
}
