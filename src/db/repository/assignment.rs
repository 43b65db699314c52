use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Assignment;

pub fn insert_assignment(conn: &Connection, assignment: &Assignment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO assignments (doctor_id, patient_id, assigned_at)
         VALUES (?1, ?2, ?3)",
        params![
            assignment.doctor_id.to_string(),
            assignment.patient_id.to_string(),
            assignment.assigned_at.to_string(),
        ],
    )?;
    Ok(())
}

pub fn assignment_exists(
    conn: &Connection,
    doctor_id: &Uuid,
    patient_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM assignments WHERE doctor_id = ?1 AND patient_id = ?2",
        params![doctor_id.to_string(), patient_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Patients assigned to a doctor as (account id, username) pairs.
///
/// Ordered by username so repeated calls return the same sequence regardless
/// of insertion order.
pub fn get_assigned_patients(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<(Uuid, String)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.username
         FROM accounts a
         JOIN assignments ap ON a.id = ap.patient_id
         WHERE ap.doctor_id = ?1
         ORDER BY a.username",
    )?;

    let rows = stmt.query_map(params![doctor_id.to_string()], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut patients = Vec::new();
    for row in rows {
        let (id, username) = row?;
        patients.push((
            Uuid::parse_str(&id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            username,
        ));
    }
    Ok(patients)
}

pub fn get_assignment(
    conn: &Connection,
    doctor_id: &Uuid,
    patient_id: &Uuid,
) -> Result<Option<Assignment>, DatabaseError> {
    use rusqlite::OptionalExtension;

    let row = conn
        .query_row(
            "SELECT assigned_at FROM assignments WHERE doctor_id = ?1 AND patient_id = ?2",
            params![doctor_id.to_string(), patient_id.to_string()],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    row.map(|assigned_at| {
        Ok(Assignment {
            doctor_id: *doctor_id,
            patient_id: *patient_id,
            assigned_at: parse_datetime(&assigned_at)?,
        })
    })
    .transpose()
}

pub(crate) fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| DatabaseError::ConstraintViolation(format!("bad timestamp {s:?}: {e}")))
}
