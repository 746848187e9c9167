use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::DatabaseError;

// ═══════════════════════════════════════════
// Patient Report Repository
// ═══════════════════════════════════════════

/// One stored row. `report_data` is still encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub id: i64,
    pub patient_name: String,
    pub report_date: NaiveDate,
    pub report_data: Vec<u8>,
}

pub fn insert_report(
    conn: &Connection,
    patient_name: &str,
    report_date: NaiveDate,
    report_data: &[u8],
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patient_reports (patient_name, report_date, report_data)
         VALUES (?1, ?2, ?3)",
        params![patient_name, report_date, report_data],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Newest first by report date; same-day rows by insertion order, latest first.
pub fn get_recent_reports(
    conn: &Connection,
    patient_name: &str,
    limit: usize,
) -> Result<Vec<StoredReport>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, report_date, report_data
         FROM patient_reports WHERE patient_name = ?1
         ORDER BY report_date DESC, id DESC LIMIT ?2",
    )?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map(params![patient_name, limit], |row| {
        Ok(StoredReport {
            id: row.get(0)?,
            patient_name: row.get(1)?,
            report_date: row.get(2)?,
            report_data: row.get(3)?,
        })
    })?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

pub fn count_reports(conn: &Connection, patient_name: &str) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM patient_reports WHERE patient_name = ?1",
        params![patient_name],
        |row| row.get(0),
    )?;
    Ok(count)
}
