use crate::models::{Category, ExtractedParameter, Measurement, Status};

/// Tests tracked on every visit rather than on a schedule.
const REGULAR_KEYWORDS: &[&str] = &["glucose", "blood pressure", "heart rate", "oxygen", "bmi"];

pub fn categorize(test_name: &str) -> Category {
    let lower = test_name.to_lowercase();
    if REGULAR_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Category::Regular
    } else {
        Category::Periodic
    }
}

/// Inclusive at both bounds.
pub fn status_for(value: f64, range_low: f64, range_high: f64) -> Status {
    if value < range_low {
        Status::Low
    } else if value > range_high {
        Status::High
    } else {
        Status::Normal
    }
}

/// Attach category and status to each measurement. Explanations are
/// filled in later by the explainer.
pub fn classify(measurements: Vec<Measurement>) -> Vec<ExtractedParameter> {
    measurements
        .into_iter()
        .map(|m| ExtractedParameter {
            category: categorize(&m.test_name),
            status: status_for(m.value, m.range_low, m.range_high),
            test_name: m.test_name,
            value: m.value,
            unit: m.unit,
            range_low: m.range_low,
            range_high: m.range_high,
            explanation: String::new(),
        })
        .collect()
}
