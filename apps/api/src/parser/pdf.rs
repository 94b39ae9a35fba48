//! PDF text ingestion using the pdf-extract crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to read PDF: {0}")]
    Unreadable(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Extracts the text layer of a PDF held in memory.
pub fn extract_text_from_pdf(pdf_bytes: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .map_err(|e| PdfError::Unreadable(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(PdfError::NoText);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = extract_text_from_pdf(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Unreadable(_)));
    }
}
