//! Analysis with history: the flow shared by the HTTP API and the CLI.
//!
//! Analyse, load the patient's prior reports, compare, then save. The
//! store is a collaborator: a failed load means no trends, a failed save
//! is logged, neither fails the analysis.

use serde::Serialize;
use uuid::Uuid;

use crate::db::ReportStore;
use crate::db::StoreError;
use crate::knowledge::{definition, PRIMARY_CATALOG, SECONDARY_CATALOG};
use crate::models::{Category, HistoricalReport, Report, ReportSummary, TestDefinition};
use crate::pipeline::classify::categorize;
use crate::pipeline::processor::{AnalysisRequest, ReportAnalyzer};
use crate::pipeline::trend::{compare_with_history, TestTrend};
use crate::pipeline::AnalysisError;

// ═══════════════════════════════════════════
// Analysis with history
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub report: Report,
    pub summary: ReportSummary,
    pub trends: Vec<TestTrend>,
    /// Prior reports, newest first. Excludes the report just analysed.
    pub historical_data: Vec<HistoricalReport>,
}

pub fn analyze_and_record(
    analyzer: &ReportAnalyzer,
    store: &dyn ReportStore,
    history_limit: usize,
    request: &AnalysisRequest<'_>,
) -> Result<AnalysisOutcome, AnalysisError> {
    let analyzed = analyzer.analyze(request)?;
    let report = analyzed.report;
    let patient = report.patient_name.as_str();

    let history = match store.load_recent(patient, history_limit) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, "History unavailable, reporting without trends");
            Vec::new()
        }
    };
    let trends = compare_with_history(&report, &history);

    if let Err(e) = store.save(patient, report.report_date, &report) {
        tracing::warn!(analysis_id = %analyzed.analysis_id, error = %e, "Report not saved");
    }

    Ok(AnalysisOutcome {
        analysis_id: analyzed.analysis_id,
        report,
        summary: analyzed.summary,
        trends,
        historical_data: history,
    })
}

#[derive(Debug, Serialize)]
pub struct PatientHistory {
    pub patient_name: String,
    pub reports: Vec<HistoricalReport>,
}

/// Most recent reports for a patient. The name is trimmed before the
/// lookup and echoed back trimmed.
pub fn load_patient_history(
    store: &dyn ReportStore,
    patient_name: &str,
    limit: usize,
) -> Result<PatientHistory, StoreError> {
    let patient_name = patient_name.trim();
    let reports = store.load_recent(patient_name, limit)?;
    Ok(PatientHistory {
        patient_name: patient_name.to_string(),
        reports,
    })
}

// ═══════════════════════════════════════════
// Catalog listing
// ═══════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub unit: &'static str,
    pub range_low: f64,
    pub range_high: f64,
    pub category: Category,
}

impl From<&TestDefinition> for CatalogEntry {
    fn from(def: &TestDefinition) -> Self {
        Self {
            name: def.name,
            unit: def.unit,
            range_low: def.range_low,
            range_high: def.range_high,
            category: categorize(def.name),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SecondaryEntry {
    pub pattern: &'static str,
    pub test_name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogListing {
    pub message: &'static str,
    pub supported_tests: Vec<CatalogEntry>,
    pub secondary_patterns: Vec<SecondaryEntry>,
}

/// Every test the extractor recognises, in match order.
pub fn catalog_listing() -> CatalogListing {
    let supported_tests = PRIMARY_CATALOG.iter().map(CatalogEntry::from).collect();

    let secondary_patterns = SECONDARY_CATALOG
        .iter()
        .map(|entry| SecondaryEntry {
            pattern: entry.pattern,
            test_name: entry.definition.name,
        })
        .collect();

    CatalogListing {
        message: "Test patterns available",
        supported_tests,
        secondary_patterns,
    }
}

/// One primary catalog entry, matched case-insensitively.
pub fn catalog_entry(name: &str) -> Option<CatalogEntry> {
    definition(name.trim()).map(CatalogEntry::from)
}
