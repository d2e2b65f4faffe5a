use crate::errors::{AppError, AppResult};

/// Turns an uploaded document into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> AppResult<String>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> AppResult<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::ValidationError(format!("Failed to read PDF: {}", e)))
    }
}
