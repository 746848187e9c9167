use super::ExtractionError;

/// Text of a digital PDF (embedded text layer), pages joined by newlines.
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;
    tracing::debug!(pages = pages.len(), "PDF text layer extracted");
    Ok(pages.join("\n"))
}
