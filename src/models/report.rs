use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{Category, ScoreTier};
use super::lab::ExtractedParameter;

/// Composite score with its coarse tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub tier: ScoreTier,
    #[serde(default)]
    pub label: String,
}

impl HealthScore {
    pub fn new(score: u8, tier: ScoreTier) -> Self {
        Self {
            score,
            tier,
            label: tier.label().to_string(),
        }
    }
}

/// One analysed lab report. This is also the payload persisted per patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub patient_name: String,
    pub report_date: NaiveDate,
    pub health_score: HealthScore,
    pub tests: Vec<ExtractedParameter>,
}

impl Report {
    pub fn summary(&self) -> ReportSummary {
        ReportSummary::from_tests(&self.tests)
    }

    pub fn find_test(&self, test_name: &str) -> Option<&ExtractedParameter> {
        self.tests.iter().find(|t| t.test_name == test_name)
    }
}

/// Counts shown alongside a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_tests: usize,
    pub normal_tests: usize,
    pub abnormal_tests: usize,
    pub regular_tests: usize,
    pub periodic_tests: usize,
}

impl ReportSummary {
    pub fn from_tests(tests: &[ExtractedParameter]) -> Self {
        let normal_tests = tests.iter().filter(|t| t.is_normal()).count();
        let regular_tests = tests
            .iter()
            .filter(|t| t.category == Category::Regular)
            .count();
        Self {
            total_tests: tests.len(),
            normal_tests,
            abnormal_tests: tests.len() - normal_tests,
            regular_tests,
            periodic_tests: tests.len() - regular_tests,
        }
    }
}

/// A previously stored report for the same patient (read-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReport {
    #[serde(rename = "date")]
    pub report_date: NaiveDate,
    #[serde(rename = "data")]
    pub report: Report,
}
