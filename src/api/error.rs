//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::{DatabaseError, StoreError};
use crate::pipeline::extraction::{ExtractionError, MAX_FILE_SIZE};
use crate::pipeline::{AnalysisError, NothingToAnalyze};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Patient name is required")]
    MissingPatientName,
    #[error("{0}")]
    NothingToAnalyze(NothingToAnalyze),
    #[error("Could not extract text: {0}")]
    ExtractionFailed(String),
    #[error("Upload too large (max {max} bytes)")]
    PayloadTooLarge { max: usize },
    #[error("Unknown test: {0}")]
    UnknownTest(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::MissingPatientName => (
                StatusCode::BAD_REQUEST,
                "MISSING_PATIENT_NAME",
                self.to_string(),
            ),
            ApiError::NothingToAnalyze(reason) => {
                let code = match reason {
                    NothingToAnalyze::NoText => "NO_TEXT",
                    NothingToAnalyze::NoParameters { .. } => "NO_PARAMETERS",
                };
                (StatusCode::BAD_REQUEST, code, reason.to_string())
            }
            ApiError::ExtractionFailed(detail) => {
                tracing::warn!(detail, "Text extraction failed");
                (
                    StatusCode::BAD_REQUEST,
                    "EXTRACTION_FAILED",
                    "Could not extract text from the provided input".to_string(),
                )
            }
            ApiError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                self.to_string(),
            ),
            ApiError::UnknownTest(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TEST", self.to_string()),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Map a body or multipart rejection. Anything cut off by the body
    /// limit is a 413, the rest is a malformed request.
    pub fn rejected(status: StatusCode, detail: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { max: MAX_FILE_SIZE }
        } else {
            ApiError::BadRequest(detail)
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::MissingPatientName => ApiError::MissingPatientName,
            AnalysisError::NothingToAnalyze(reason) => ApiError::NothingToAnalyze(reason),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::TooLarge { max, .. } => ApiError::PayloadTooLarge { max },
            ExtractionError::NoText => ApiError::ExtractionFailed("no text found".into()),
            other => ApiError::ExtractionFailed(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("analysis task failed: {err}"))
    }
}
