use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::DoctorProfile;

pub fn insert_doctor_profile(
    conn: &Connection,
    profile: &DoctorProfile,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctor_profiles (id, account_id, full_name, specialization)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            profile.id.to_string(),
            profile.account_id.to_string(),
            profile.full_name,
            profile.specialization,
        ],
    )?;
    Ok(())
}

pub fn get_doctor_profile_by_account(
    conn: &Connection,
    account_id: &Uuid,
) -> Result<Option<DoctorProfile>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, account_id, full_name, specialization
             FROM doctor_profiles WHERE account_id = ?1",
            params![account_id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, account_id, full_name, specialization)| {
        Ok(DoctorProfile {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            account_id: Uuid::parse_str(&account_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            full_name,
            specialization,
        })
    })
    .transpose()
}
