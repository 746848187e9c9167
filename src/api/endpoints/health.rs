//! Liveness and discovery endpoints.

use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::MessageResponse;
use crate::reporting::{catalog_entry, catalog_listing, CatalogEntry, CatalogListing};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// `GET /`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Labsense lab report API is running",
    })
}

/// `GET /health`
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: crate::config::APP_VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `GET /test-patterns`: what the extractor can recognise.
pub async fn test_patterns() -> Json<CatalogListing> {
    Json(catalog_listing())
}

/// `GET /test-patterns/:test_name`
pub async fn test_pattern(Path(test_name): Path<String>) -> Result<Json<CatalogEntry>, ApiError> {
    catalog_entry(&test_name)
        .map(Json)
        .ok_or(ApiError::UnknownTest(test_name))
}
