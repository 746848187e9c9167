pub mod normalize;
pub mod extractor;
pub mod classify;
pub mod score;
pub mod explain;
pub mod trend;
pub mod prescription;
pub mod processor; // Normalize → extract → classify → explain → score
pub mod extraction; // Text source: plain text, PDF, OCR

use thiserror::Error;

/// Why an input produced no report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NothingToAnalyze {
    /// Raw text was empty or whitespace only.
    #[error("No text input provided")]
    NoText,
    /// Text was present but no catalog test matched.
    #[error("No valid medical parameters found in the report")]
    NoParameters { cleaned_text: String },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Patient name is required")]
    MissingPatientName,

    #[error(transparent)]
    NothingToAnalyze(#[from] NothingToAnalyze),
}
