pub mod format;
pub mod ocr;
pub mod pdf;
pub mod text_source;

pub use format::*;
pub use ocr::*;
pub use pdf::*;
pub use text_source::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,

    #[error("Scanned PDF has no text layer")]
    ScannedPdf,

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("OCR engine not available: {0}")]
    OcrUnavailable(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("No text found in input")]
    NoText,
}
