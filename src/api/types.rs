//! Shared state and wire types for the HTTP API.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::db::ReportStore;
use crate::pipeline::explain::LanguageModel;
use crate::pipeline::extraction::TextSource;
use crate::pipeline::processor::ReportAnalyzer;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    /// Template explanations only.
    pub analyzer: Arc<ReportAnalyzer>,
    /// Uses the configured language model; same as `analyzer` when none is.
    pub llm_analyzer: Arc<ReportAnalyzer>,
    pub store: Arc<dyn ReportStore>,
    pub text_source: Arc<TextSource>,
    pub history_limit: usize,
}

impl ApiContext {
    pub fn new(
        store: Arc<dyn ReportStore>,
        text_source: TextSource,
        model: LanguageModel,
        history_limit: usize,
    ) -> Self {
        let analyzer = Arc::new(ReportAnalyzer::new(LanguageModel::Disabled));
        let llm_analyzer = if model.is_enabled() {
            Arc::new(ReportAnalyzer::new(model))
        } else {
            Arc::clone(&analyzer)
        };
        Self {
            analyzer,
            llm_analyzer,
            store,
            text_source: Arc::new(text_source),
            history_limit,
        }
    }

    pub fn analyzer_for(&self, use_llm: bool) -> Arc<ReportAnalyzer> {
        if use_llm {
            Arc::clone(&self.llm_analyzer)
        } else {
            Arc::clone(&self.analyzer)
        }
    }
}

impl Default for ApiContext {
    /// In-memory store, no OCR, no language model.
    fn default() -> Self {
        Self::new(
            Arc::new(crate::db::MemoryReportStore::new()),
            TextSource::text_only(),
            LanguageModel::Disabled,
            DEFAULT_HISTORY_LIMIT,
        )
    }
}

// ═══════════════════════════════════════════════════════════
// Requests
// ═══════════════════════════════════════════════════════════

/// JSON body of `POST /analyze-report`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeReportRequest {
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub text_input: String,
    #[serde(default)]
    pub use_llm: bool,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PrescriptionRequest {
    #[serde(default)]
    pub text_input: String,
}

// ═══════════════════════════════════════════════════════════
// Responses
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
