//! Account store: identities, roles, doctor profiles, and doctor-patient
//! assignments.

pub mod credential;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository;
use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::{Account, Assignment, DoctorProfile};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Clinician details supplied at doctor registration.
#[derive(Debug, Clone)]
pub struct DoctorProfileInput {
    pub full_name: String,
    pub specialization: Option<String>,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    WeakCredential,

    // One message for unknown user and wrong password alike; anything more
    // specific would let callers enumerate usernames.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Doctor profile could not be created: {0}")]
    ProfileCreation(String),

    #[error("No doctor account with id {0}")]
    UnknownDoctor(Uuid),

    #[error("No patient account with id {0}")]
    UnknownPatient(Uuid),

    #[error("Doctor is already assigned to this patient")]
    DuplicateAssignment,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Register a new account; doctor registrations atomically create the
/// clinician profile in the same transaction, so a failed profile insert
/// leaves no orphan doctor account. Profile input is ignored for patients.
pub fn register(
    conn: &Connection,
    username: &str,
    password: &str,
    role: Role,
    profile: Option<DoctorProfileInput>,
) -> Result<Uuid, AccountError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::WeakCredential);
    }
    if repository::username_taken(conn, username)? {
        return Err(AccountError::DuplicateUsername);
    }

    let account = Account {
        id: Uuid::new_v4(),
        username: username.to_string(),
        credential_hash: credential::hash_password(password),
        role: role.clone(),
    };

    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;
    repository::insert_account(&tx, &account)?;
    if role == Role::Doctor {
        let input = profile.ok_or_else(|| {
            AccountError::ProfileCreation("doctor registration requires a profile".into())
        })?;
        if input.full_name.trim().is_empty() {
            return Err(AccountError::ProfileCreation(
                "full name must not be empty".into(),
            ));
        }
        repository::insert_doctor_profile(
            &tx,
            &DoctorProfile {
                id: Uuid::new_v4(),
                account_id: account.id,
                full_name: input.full_name,
                specialization: input.specialization,
            },
        )?;
    }
    tx.commit().map_err(DatabaseError::Sqlite)?;

    tracing::info!(account_id = %account.id, role = role.as_str(), "Account registered");
    Ok(account.id)
}

/// Look up an account by username and check the password.
pub fn authenticate(
    conn: &Connection,
    username: &str,
    password: &str,
) -> Result<Account, AccountError> {
    match repository::get_account_by_username(conn, username)? {
        Some(account) if credential::verify_password(password, &account.credential_hash) => {
            tracing::debug!(account_id = %account.id, "Authentication succeeded");
            Ok(account)
        }
        _ => Err(AccountError::InvalidCredentials),
    }
}

/// Pair a doctor with a patient, granting review rights over the patient's
/// records. The pair is unique; both ids must resolve to accounts of the
/// expected role.
pub fn assign(
    conn: &Connection,
    doctor_id: &Uuid,
    patient_id: &Uuid,
    assigned_at: NaiveDateTime,
) -> Result<(), AccountError> {
    if repository::get_account_role(conn, doctor_id)? != Some(Role::Doctor) {
        return Err(AccountError::UnknownDoctor(*doctor_id));
    }
    if repository::get_account_role(conn, patient_id)? != Some(Role::Patient) {
        return Err(AccountError::UnknownPatient(*patient_id));
    }
    if repository::assignment_exists(conn, doctor_id, patient_id)? {
        return Err(AccountError::DuplicateAssignment);
    }

    repository::insert_assignment(
        conn,
        &Assignment {
            doctor_id: *doctor_id,
            patient_id: *patient_id,
            assigned_at,
        },
    )?;

    tracing::info!(doctor_id = %doctor_id, patient_id = %patient_id, "Patient assigned");
    Ok(())
}

/// Patients assigned to a doctor, as (id, username), sorted by username.
pub fn list_patients(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<(Uuid, String)>, AccountError> {
    if repository::get_account_role(conn, doctor_id)? != Some(Role::Doctor) {
        return Err(AccountError::UnknownDoctor(*doctor_id));
    }
    Ok(repository::get_assigned_patients(conn, doctor_id)?)
}
