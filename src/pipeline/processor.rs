//! Report analysis orchestrator.
//!
//! Drives the pure stages in order:
//! normalize → extract → classify → explain → score.
//!
//! Collaborators (text source, store) stay outside: callers hand in raw
//! text and persist the result themselves.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::classify::classify;
use super::explain::{explain, LanguageModel};
use super::extractor::ParameterExtractor;
use super::normalize::normalize_text;
use super::prescription::detect_report_date;
use super::score::health_score;
use super::{AnalysisError, NothingToAnalyze};
use crate::models::{Report, ReportSummary};

/// Input for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<'a> {
    pub patient_name: &'a str,
    pub raw_text: &'a str,
    /// Overrides any date printed in the report.
    pub report_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedReport {
    pub analysis_id: Uuid,
    pub report: Report,
    pub summary: ReportSummary,
}

pub struct ReportAnalyzer {
    extractor: &'static ParameterExtractor,
    model: LanguageModel,
}

impl ReportAnalyzer {
    /// Analyzer over the built-in catalogs.
    pub fn new(model: LanguageModel) -> Self {
        Self::with_extractor(ParameterExtractor::shared(), model)
    }

    pub fn with_extractor(extractor: &'static ParameterExtractor, model: LanguageModel) -> Self {
        Self { extractor, model }
    }

    pub fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalyzedReport, AnalysisError> {
        let patient_name = request.patient_name.trim();
        if patient_name.is_empty() {
            return Err(AnalysisError::MissingPatientName);
        }
        if request.raw_text.trim().is_empty() {
            return Err(AnalysisError::NothingToAnalyze(NothingToAnalyze::NoText));
        }

        let analysis_id = Uuid::new_v4();
        let cleaned = normalize_text(request.raw_text);
        let measurements = self.extractor.extract(&cleaned);
        if measurements.is_empty() {
            tracing::info!(
                analysis_id = %analysis_id,
                cleaned_len = cleaned.len(),
                "No lab parameters found"
            );
            return Err(AnalysisError::NothingToAnalyze(
                NothingToAnalyze::NoParameters {
                    cleaned_text: cleaned,
                },
            ));
        }

        let mut tests = classify(measurements);
        explain(&mut tests, &self.model);
        let health_score = health_score(&tests);

        let report_date = request
            .report_date
            .or_else(|| detect_report_date(request.raw_text))
            .unwrap_or_else(|| Utc::now().date_naive());

        let report = Report {
            patient_name: patient_name.to_string(),
            report_date,
            health_score,
            tests,
        };
        let summary = report.summary();

        tracing::info!(
            analysis_id = %analysis_id,
            tests = summary.total_tests,
            abnormal = summary.abnormal_tests,
            score = report.health_score.score,
            llm = self.model.is_enabled(),
            "Report analyzed"
        );

        Ok(AnalyzedReport {
            analysis_id,
            report,
            summary,
        })
    }
}
