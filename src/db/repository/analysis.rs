use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::assignment::parse_datetime;
use crate::db::DatabaseError;
use crate::models::enums::{ReviewStatus, Role};
use crate::models::AnalysisRecord;

/// Create an analysis record for a patient. Status is always `pending` on
/// creation; the record row and its term rows commit as one transaction.
pub fn create_analysis_record(
    conn: &Connection,
    patient_id: &Uuid,
    terms: &[String],
    summary: &str,
    recommendations: &str,
    created_at: NaiveDateTime,
) -> Result<AnalysisRecord, DatabaseError> {
    match super::account::get_account_role(conn, patient_id)? {
        Some(Role::Patient) => {}
        _ => {
            return Err(DatabaseError::NotFound {
                entity_type: "patient account".into(),
                id: patient_id.to_string(),
            })
        }
    }

    let record = AnalysisRecord {
        id: Uuid::new_v4(),
        patient_id: *patient_id,
        created_at,
        terms: terms.to_vec(),
        summary: summary.to_string(),
        recommendations: recommendations.to_string(),
        status: ReviewStatus::Pending,
        doctor_notes: None,
        last_modified_at: None,
    };

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO analysis_records
         (id, patient_id, created_at, summary, recommendations, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id.to_string(),
            record.patient_id.to_string(),
            record.created_at.to_string(),
            record.summary,
            record.recommendations,
            record.status.as_str(),
        ],
    )?;
    for (position, term) in record.terms.iter().enumerate() {
        tx.execute(
            "INSERT INTO analysis_terms (analysis_id, position, term)
             VALUES (?1, ?2, ?3)",
            params![record.id.to_string(), position as i64, term],
        )?;
    }
    tx.commit()?;

    Ok(record)
}

pub fn get_analysis_record(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<AnalysisRecord>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, created_at, summary, recommendations,
                    status, doctor_notes, last_modified_at
             FROM analysis_records WHERE id = ?1",
            params![id.to_string()],
            analysis_row,
        )
        .optional()?;

    match row {
        Some(row) => {
            let mut record = row_to_record(row)?;
            record.terms = load_terms(conn, &record.id)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// A patient's analysis history, most recent first. The descending
/// `created_at` order is a contract the patient and doctor views rely on.
pub fn get_records_by_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<AnalysisRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, created_at, summary, recommendations,
                status, doctor_notes, last_modified_at
         FROM analysis_records
         WHERE patient_id = ?1
         ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], analysis_row)?;

    let mut records = Vec::new();
    for row in rows {
        let mut record = row_to_record(row?)?;
        record.terms = load_terms(conn, &record.id)?;
        records.push(record);
    }
    Ok(records)
}

/// Apply a review decision: status, notes, and the modification stamp.
///
/// Re-applying the same status and notes is observationally a no-op apart
/// from `last_modified_at`, which always advances to `modified_at`.
/// Concurrent reviewers are last-write-wins; the final UPDATE stands.
pub fn update_review(
    conn: &Connection,
    id: &Uuid,
    status: &ReviewStatus,
    doctor_notes: Option<&str>,
    modified_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE analysis_records
         SET status = ?1, doctor_notes = ?2, last_modified_at = ?3
         WHERE id = ?4",
        params![
            status.as_str(),
            doctor_notes,
            modified_at.to_string(),
            id.to_string(),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "analysis record".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn load_terms(conn: &Connection, analysis_id: &Uuid) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT term FROM analysis_terms WHERE analysis_id = ?1 ORDER BY position",
    )?;
    let rows = stmt.query_map(params![analysis_id.to_string()], |row| {
        row.get::<_, String>(0)
    })?;

    let mut terms = Vec::new();
    for row in rows {
        terms.push(row?);
    }
    Ok(terms)
}

type AnalysisRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
);

fn analysis_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AnalysisRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn row_to_record(row: AnalysisRow) -> Result<AnalysisRecord, DatabaseError> {
    let (id, patient_id, created_at, summary, recommendations, status, doctor_notes, modified) =
        row;
    Ok(AnalysisRecord {
        id: Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
        terms: Vec::new(),
        summary,
        recommendations,
        status: ReviewStatus::from_str(&status)?,
        doctor_notes,
        last_modified_at: modified.map(|m| parse_datetime(&m)).transpose()?,
    })
}
