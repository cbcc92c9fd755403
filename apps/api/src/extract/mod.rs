//! Uploaded document → plain text.
//!
//! Only PDF and DOCX are accepted. The format is chosen from the declared
//! MIME type first, then from the file name suffix.

mod docx;
mod pdf;

use thiserror::Error;
use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type '{0}'. Please upload a PDF or DOCX.")]
    UnsupportedFormat(String),

    #[error("Failed to extract text: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Option<Self> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());
        let name = file_name.to_lowercase();

        if mime.as_deref() == Some(PDF_MIME) || name.ends_with(".pdf") {
            Some(DocumentFormat::Pdf)
        } else if mime.as_deref() == Some(DOCX_MIME) || name.ends_with(".docx") {
            Some(DocumentFormat::Docx)
        } else {
            None
        }
    }
}

/// Extracts plain text from an uploaded file. CPU-bound; call from a blocking task.
pub fn extract_text(
    bytes: &[u8],
    content_type: Option<&str>,
    file_name: &str,
) -> Result<String, ExtractError> {
    let format = DocumentFormat::detect(content_type, file_name).ok_or_else(|| {
        ExtractError::UnsupportedFormat(content_type.unwrap_or(file_name).to_string())
    })?;

    let text = match format {
        DocumentFormat::Pdf => pdf::extract(bytes)?,
        DocumentFormat::Docx => docx::extract(bytes)?,
    };

    debug!(?format, chars = text.len(), "Extracted text from upload");

    if text.trim().is_empty() {
        return Err(ExtractError::Failed(
            "document contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}
