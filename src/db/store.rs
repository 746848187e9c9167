//! Per-patient report history.
//!
//! Payloads are report JSON sealed with AES-256-GCM before they reach
//! SQLite; the database only ever sees the patient name, the report date
//! and an opaque blob.

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::Connection;
use thiserror::Error;

use super::repository::{get_recent_reports, insert_report};
use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;
use crate::crypto::{CryptoError, ReportKey};
use crate::models::{HistoricalReport, Report};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Encryption error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Report store lock poisoned")]
    LockPoisoned,
}

/// Persistence collaborator for analysed reports.
pub trait ReportStore: Send + Sync {
    fn save(&self, patient_name: &str, report_date: NaiveDate, report: &Report) -> Result<(), StoreError>;

    /// Up to `limit` prior reports, newest first.
    fn load_recent(&self, patient_name: &str, limit: usize) -> Result<Vec<HistoricalReport>, StoreError>;
}

/// SQLite-backed store. One connection behind a mutex serializes writes.
pub struct EncryptedReportStore {
    conn: Mutex<Connection>,
    key: ReportKey,
}

impl EncryptedReportStore {
    pub fn open(path: &Path, key: ReportKey) -> Result<Self, StoreError> {
        let conn = open_database(path)?;
        tracing::info!(path = %path.display(), "Report store opened");
        Ok(Self::with_connection(conn, key))
    }

    pub fn in_memory(key: ReportKey) -> Result<Self, StoreError> {
        Ok(Self::with_connection(open_memory_database()?, key))
    }

    fn with_connection(conn: Connection, key: ReportKey) -> Self {
        Self {
            conn: Mutex::new(conn),
            key,
        }
    }

    fn decode(&self, blob: &[u8]) -> Result<Report, StoreError> {
        let plaintext = self.key.open(blob)?;
        Ok(serde_json::from_slice(&plaintext)?)
    }
}

impl ReportStore for EncryptedReportStore {
    fn save(&self, patient_name: &str, report_date: NaiveDate, report: &Report) -> Result<(), StoreError> {
        let json = serde_json::to_vec(report)?;
        let sealed = self.key.seal(&json)?;
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let id = insert_report(&conn, patient_name, report_date, &sealed)?;
        tracing::debug!(id, %report_date, "Report saved");
        Ok(())
    }

    fn load_recent(&self, patient_name: &str, limit: usize) -> Result<Vec<HistoricalReport>, StoreError> {
        let rows = {
            let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            get_recent_reports(&conn, patient_name, limit)?
        };

        let mut history = Vec::with_capacity(rows.len());
        for row in rows {
            match self.decode(&row.report_data) {
                Ok(report) => history.push(HistoricalReport {
                    report_date: row.report_date,
                    report,
                }),
                // Written under another key, or corrupted
                Err(e) => tracing::warn!(id = row.id, error = %e, "Skipping unreadable stored report"),
            }
        }
        Ok(history)
    }
}

/// In-memory store for tests and runs that must not persist anything.
#[derive(Default)]
pub struct MemoryReportStore {
    reports: Mutex<Vec<(String, NaiveDate, Report)>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for MemoryReportStore {
    fn save(&self, patient_name: &str, report_date: NaiveDate, report: &Report) -> Result<(), StoreError> {
        let mut reports = self.reports.lock().map_err(|_| StoreError::LockPoisoned)?;
        reports.push((patient_name.to_string(), report_date, report.clone()));
        Ok(())
    }

    fn load_recent(&self, patient_name: &str, limit: usize) -> Result<Vec<HistoricalReport>, StoreError> {
        let reports = self.reports.lock().map_err(|_| StoreError::LockPoisoned)?;
        // Later inserts first, then a stable sort keeps that order within a date
        let mut matching: Vec<HistoricalReport> = reports
            .iter()
            .rev()
            .filter(|(name, _, _)| name == patient_name)
            .map(|(_, date, report)| HistoricalReport {
                report_date: *date,
                report: report.clone(),
            })
            .collect();
        matching.sort_by(|a, b| b.report_date.cmp(&a.report_date));
        matching.truncate(limit);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::count_reports;
    use crate::models::{HealthScore, ScoreTier};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn report(patient: &str, report_date: NaiveDate, score: u8) -> Report {
        Report {
            patient_name: patient.into(),
            report_date,
            health_score: HealthScore::new(score, ScoreTier::Green),
            tests: vec![],
        }
    }

    fn exercise_ordering(store: &dyn ReportStore) {
        for (m, score) in [(1, 10), (3, 30), (2, 20)] {
            store.save("Jane", date(m, 1), &report("Jane", date(m, 1), score)).unwrap();
        }
        store.save("John", date(9, 9), &report("John", date(9, 9), 99)).unwrap();

        let history = store.load_recent("Jane", 5).unwrap();
        let scores: Vec<u8> = history.iter().map(|h| h.report.health_score.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
        assert_eq!(history[0].report_date, date(3, 1));

        assert_eq!(store.load_recent("Jane", 2).unwrap().len(), 2);
        assert!(store.load_recent("Nobody", 5).unwrap().is_empty());
    }

    #[test]
    fn encrypted_store_orders_newest_first() {
        let store = EncryptedReportStore::in_memory(ReportKey::generate()).unwrap();
        exercise_ordering(&store);
    }

    #[test]
    fn memory_store_orders_newest_first() {
        exercise_ordering(&MemoryReportStore::new());
    }

    #[test]
    fn memory_store_same_day_latest_first() {
        let store = MemoryReportStore::new();
        store.save("Jane", date(1, 1), &report("Jane", date(1, 1), 1)).unwrap();
        store.save("Jane", date(1, 1), &report("Jane", date(1, 1), 2)).unwrap();
        let history = store.load_recent("Jane", 5).unwrap();
        assert_eq!(history[0].report.health_score.score, 2);
    }

    #[test]
    fn payload_is_not_plaintext() {
        let store = EncryptedReportStore::in_memory(ReportKey::generate()).unwrap();
        store.save("Jane", date(1, 1), &report("Jane", date(1, 1), 77)).unwrap();
        let conn = store.conn.lock().unwrap();
        let blob: Vec<u8> = conn
            .query_row("SELECT report_data FROM patient_reports", [], |row| row.get(0))
            .unwrap();
        let text = String::from_utf8_lossy(&blob);
        assert!(!text.contains("health_score"));
        assert_eq!(count_reports(&conn, "Jane").unwrap(), 1);
    }

    #[test]
    fn rows_under_other_key_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");
        {
            let old = EncryptedReportStore::open(&path, ReportKey::generate()).unwrap();
            old.save("Jane", date(1, 1), &report("Jane", date(1, 1), 50)).unwrap();
        }
        let store = EncryptedReportStore::open(&path, ReportKey::generate()).unwrap();
        store.save("Jane", date(2, 1), &report("Jane", date(2, 1), 90)).unwrap();

        let history = store.load_recent("Jane", 5).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].report.health_score.score, 90);
    }

    #[test]
    fn reopen_with_same_key_reads_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.db");
        let key = ReportKey::generate();
        let encoded = key.to_base64();
        {
            let store = EncryptedReportStore::open(&path, key).unwrap();
            store.save("Jane", date(1, 1), &report("Jane", date(1, 1), 66)).unwrap();
        }
        let store =
            EncryptedReportStore::open(&path, ReportKey::from_base64(&encoded).unwrap()).unwrap();
        let history = store.load_recent("Jane", 5).unwrap();
        assert_eq!(history[0].report.health_score.score, 66);
    }
}
