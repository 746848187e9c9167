use serde::{Deserialize, Serialize};

use super::enums::{Category, Status};

/// Static catalog entry: canonical test name, expected unit and inclusive
/// normal range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestDefinition {
    pub name: &'static str,
    pub unit: &'static str,
    pub range_low: f64,
    pub range_high: f64,
}

impl TestDefinition {
    pub const fn new(name: &'static str, unit: &'static str, range_low: f64, range_high: f64) -> Self {
        Self {
            name,
            unit,
            range_low,
            range_high,
        }
    }

    /// Build the measurement this definition yields for a parsed value.
    pub fn measure(&self, value: f64) -> Measurement {
        Measurement {
            test_name: self.name.to_string(),
            value,
            unit: self.unit.to_string(),
            range_low: self.range_low,
            range_high: self.range_high,
        }
    }
}

/// A test value located in report text, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub test_name: String,
    pub value: f64,
    pub unit: String,
    pub range_low: f64,
    pub range_high: f64,
}

/// A classified lab parameter as it appears in the final report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParameter {
    pub test_name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    pub range_low: f64,
    pub range_high: f64,
    pub category: Category,
    pub status: Status,
    #[serde(default)]
    pub explanation: String,
}

impl ExtractedParameter {
    pub fn is_normal(&self) -> bool {
        self.status == Status::Normal
    }
}
