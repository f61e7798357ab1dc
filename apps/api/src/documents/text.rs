//! Plain-text extraction from uploaded files.
//!
//! Parsing runs on the blocking pool. Any failure, including a parser panic,
//! stores the `EXTRACTION_FAILED` sentinel instead of failing the upload.

use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

use crate::models::document::EXTRACTION_FAILED;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Accepted upload types; parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence {
            MIME_PDF => Some(DocumentKind::Pdf),
            MIME_DOCX => Some(DocumentKind::Docx),
            MIME_TEXT => Some(DocumentKind::Text),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentKind::Pdf => MIME_PDF,
            DocumentKind::Docx => MIME_DOCX,
            DocumentKind::Text => MIME_TEXT,
        }
    }
}

#[derive(Debug, Error)]
enum TextError {
    #[error("PDF: {0}")]
    Pdf(String),

    #[error("DOCX: {0}")]
    Docx(String),
}

fn extract_blocking(data: &[u8], kind: DocumentKind) -> Result<String, TextError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(data).map_err(|e| TextError::Pdf(e.to_string()))
        }
        DocumentKind::Docx => docx_text(data),
        DocumentKind::Text => Ok(String::from_utf8_lossy(data).into_owned()),
    }
}

/// Concatenates paragraph run texts, one paragraph per line.
fn docx_text(data: &[u8]) -> Result<String, TextError> {
    let docx = docx_rs::read_docx(data).map_err(|e| TextError::Docx(e.to_string()))?;
    let mut text = String::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
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

/// Extracts text from `data`, returning the sentinel on any failure.
pub async fn extract_text(data: Bytes, kind: DocumentKind) -> String {
    let outcome = tokio::task::spawn_blocking(move || extract_blocking(&data, kind)).await;
    match outcome {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => {
            warn!("Text extraction failed: {e}");
            EXTRACTION_FAILED.to_string()
        }
        Err(e) => {
            warn!("Text extraction task aborted: {e}");
            EXTRACTION_FAILED.to_string()
        }
    }
}
