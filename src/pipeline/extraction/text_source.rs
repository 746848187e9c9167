use std::path::Path;

use serde::Serialize;

use super::format::{detect_format, FileCategory, FormatDetection, MAX_FILE_SIZE};
use super::ocr::OcrEngine;
use super::pdf::extract_pdf_text;
use super::ExtractionError;

/// How text was obtained
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    PlainTextRead,
    PdfDirect,
    Ocr,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
    pub format: FormatDetection,
}

/// Turns uploaded bytes (text, digital PDF, image) into raw report text.
pub struct TextSource {
    ocr: Option<Box<dyn OcrEngine + Send + Sync>>,
}

impl TextSource {
    pub fn new(ocr: Option<Box<dyn OcrEngine + Send + Sync>>) -> Self {
        Self { ocr }
    }

    pub fn with_ocr(engine: impl OcrEngine + Send + Sync + 'static) -> Self {
        Self::new(Some(Box::new(engine)))
    }

    /// Plain text and digital PDFs only; images are rejected.
    pub fn text_only() -> Self {
        Self::new(None)
    }

    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractionError> {
        if bytes.len() > MAX_FILE_SIZE {
            return Err(ExtractionError::TooLarge {
                size: bytes.len(),
                max: MAX_FILE_SIZE,
            });
        }

        let format = detect_format(bytes);
        let (text, method) = match format.category {
            FileCategory::PlainText => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|e| ExtractionError::Encoding(e.to_string()))?;
                (text, ExtractionMethod::PlainTextRead)
            }
            FileCategory::DigitalPdf => (extract_pdf_text(bytes)?, ExtractionMethod::PdfDirect),
            FileCategory::ScannedPdf => return Err(ExtractionError::ScannedPdf),
            FileCategory::Image => {
                let engine = self.ocr.as_ref().ok_or_else(|| {
                    ExtractionError::OcrUnavailable("no OCR engine configured".into())
                })?;
                (engine.ocr_image(bytes)?, ExtractionMethod::Ocr)
            }
            FileCategory::Unsupported => return Err(ExtractionError::UnsupportedFormat),
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }

        tracing::info!(
            mime = format.mime_type,
            method = ?method,
            chars = text.len(),
            "Text extracted"
        );
        Ok(ExtractedText {
            text,
            method,
            format,
        })
    }

    pub fn extract_file(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_FILE_SIZE as u64 {
            return Err(ExtractionError::TooLarge {
                size: usize::try_from(size).unwrap_or(usize::MAX),
                max: MAX_FILE_SIZE,
            });
        }
        let bytes = std::fs::read(path)?;
        self.extract(&bytes)
    }
}
