use serde::{Deserialize, Serialize};

/// Upload cap for reports (20 MB).
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Broad input categories we handle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    DigitalPdf,
    ScannedPdf,
    Image,
    PlainText,
    Unsupported,
}

impl FileCategory {
    pub fn needs_ocr(&self) -> bool {
        matches!(self, Self::ScannedPdf | Self::Image)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatDetection {
    pub mime_type: &'static str,
    pub category: FileCategory,
}

impl FormatDetection {
    fn new(mime_type: &'static str, category: FileCategory) -> Self {
        Self {
            mime_type,
            category,
        }
    }
}

/// Detect input format from magic bytes, falling back to a UTF-8 text
/// check. File names and extensions are never consulted.
pub fn detect_format(bytes: &[u8]) -> FormatDetection {
    match bytes {
        [0x25, 0x50, 0x44, 0x46, ..] => {
            let category = if pdf_has_text_layer(bytes) {
                FileCategory::DigitalPdf
            } else {
                FileCategory::ScannedPdf
            };
            FormatDetection::new("application/pdf", category)
        }
        [0xFF, 0xD8, 0xFF, ..] => FormatDetection::new("image/jpeg", FileCategory::Image),
        [0x89, 0x50, 0x4E, 0x47, ..] => FormatDetection::new("image/png", FileCategory::Image),
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => {
            FormatDetection::new("image/tiff", FileCategory::Image)
        }
        _ if is_likely_text(bytes) => FormatDetection::new("text/plain", FileCategory::PlainText),
        _ => FormatDetection::new("application/octet-stream", FileCategory::Unsupported),
    }
}

/// Digital vs scanned: count text operators in the first 256 KB.
/// BT/ET begin and end text, Tj/TJ show text, Tf sets the font.
fn pdf_has_text_layer(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256 * 1024)];
    let content = String::from_utf8_lossy(head);
    let markers = ["BT", "ET", " Tj", " TJ", " Tf"];
    let count: usize = markers.iter().map(|m| content.matches(m).count()).sum();
    count >= 3
}

/// Valid UTF-8 in the first 4 KB with more than 80% printable characters.
fn is_likely_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    let head = &bytes[..bytes.len().min(4096)];
    let text = match std::str::from_utf8(head) {
        Ok(t) => t,
        // A multi-byte char may straddle the 4 KB cut
        Err(e) if e.error_len().is_none() && e.valid_up_to() > 0 => {
            match std::str::from_utf8(&head[..e.valid_up_to()]) {
                Ok(t) => t,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    let total = text.chars().count();
    let printable = text
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    printable as f64 / total.max(1) as f64 > 0.80
}
