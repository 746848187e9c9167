//! Prescription lines and dose reminders.
//!
//! Works on raw report text, line by line: normalization joins lines and
//! would let one prescription's frequency swallow the next medicine.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `Paracetamol 500mg 3 times a day`
static PRESCRIPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z\s]+)\s+(\d+mg|\d+ml)\s+([\d\s\w]+)")
        .expect("Invalid prescription pattern")
});

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Date[:\s]+(\d{4}-\d{2}-\d{2})").expect("Invalid ISO date pattern")
});

static DAY_FIRST_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Report Date[:\s]+(\d{2}/\d{2}/\d{4})").expect("Invalid day-first date pattern")
});

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid number pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub medicine: String,
    pub dosage: String,
    pub frequency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub medicine: String,
    pub doses_per_day: u32,
    pub next_dose: NaiveDateTime,
}

/// Everything derived from one prescription text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionPlan {
    pub report_date: Option<NaiveDate>,
    pub prescriptions: Vec<Prescription>,
    pub reminders: Vec<Reminder>,
}

/// Report date printed in the text, if any. ISO dates win over
/// day-first ones; impossible calendar dates are ignored.
pub fn detect_report_date(text: &str) -> Option<NaiveDate> {
    let iso = ISO_DATE
        .captures_iter(text)
        .filter_map(|c| NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").ok());
    let day_first = DAY_FIRST_DATE
        .captures_iter(text)
        .filter_map(|c| NaiveDate::parse_from_str(&c[1], "%d/%m/%Y").ok());
    iso.chain(day_first).next()
}

pub fn extract_prescriptions(text: &str) -> Vec<Prescription> {
    text.lines()
        .flat_map(|line| PRESCRIPTION_LINE.captures_iter(line))
        .filter_map(|caps| {
            let medicine = caps[1].trim();
            if medicine.is_empty() {
                return None;
            }
            Some(Prescription {
                medicine: medicine.to_string(),
                dosage: caps[2].trim().to_string(),
                frequency: caps[3].trim().to_string(),
            })
        })
        .collect()
}

/// One reminder per prescription whose frequency starts with a positive
/// doses-per-day count; the next dose is one interval after `from`.
pub fn schedule_reminders(prescriptions: &[Prescription], from: NaiveDateTime) -> Vec<Reminder> {
    prescriptions
        .iter()
        .filter_map(|p| {
            let doses_per_day: u32 = FIRST_NUMBER.find(&p.frequency)?.as_str().parse().ok()?;
            if doses_per_day == 0 {
                return None;
            }
            let interval = Duration::milliseconds(86_400_000 / i64::from(doses_per_day));
            Some(Reminder {
                medicine: p.medicine.clone(),
                doses_per_day,
                next_dose: from + interval,
            })
        })
        .collect()
}

/// Detect date, prescriptions and reminders in one pass. Reminders count
/// from midnight of the detected date, else from `now`.
pub fn plan_prescriptions(text: &str, now: NaiveDateTime) -> PrescriptionPlan {
    let report_date = detect_report_date(text);
    let prescriptions = extract_prescriptions(text);
    let from = report_date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(now);
    let reminders = schedule_reminders(&prescriptions, from);
    tracing::debug!(
        prescriptions = prescriptions.len(),
        reminders = reminders.len(),
        "Prescription plan built"
    );
    PrescriptionPlan {
        report_date,
        prescriptions,
        reminders,
    }
}
