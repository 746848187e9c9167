use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, HistoricalReport, Report};

/// Direction of a regular test relative to its most recent prior reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "snake_case")]
pub enum Trend {
    Higher { previous: f64 },
    Lower { previous: f64 },
    Stable,
    FirstReading,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestTrend {
    pub test_name: String,
    pub value: f64,
    pub previous_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub trend: Trend,
}

/// Compare each Regular test in `current` with `history` (newest first).
pub fn compare_with_history(current: &Report, history: &[HistoricalReport]) -> Vec<TestTrend> {
    current
        .tests
        .iter()
        .filter(|t| t.category == Category::Regular)
        .map(|test| {
            let previous = history.iter().find_map(|h| {
                h.report
                    .find_test(&test.test_name)
                    .map(|p| (h.report_date, p.value))
            });
            let trend = match previous {
                None => Trend::FirstReading,
                Some((_, prev)) if test.value > prev => Trend::Higher { previous: prev },
                Some((_, prev)) if test.value < prev => Trend::Lower { previous: prev },
                Some(_) => Trend::Stable,
            };
            TestTrend {
                test_name: test.test_name.clone(),
                value: test.value,
                previous_date: previous.map(|(d, _)| d),
                trend,
            }
        })
        .collect()
}
