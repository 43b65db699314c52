//! Role-scoped review workflow over the account and analysis stores.
//!
//! Every operation takes an explicit [`Session`] built from an authenticated
//! account — there is no ambient logged-in state. Patient operations submit
//! narratives and read their own history; doctor operations are gated on an
//! Assignment between the doctor and the record's owning patient, checked at
//! update time, not just at patient selection.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::accounts::{self, AccountError};
use crate::db::repository;
use crate::db::DatabaseError;
use crate::extract::{compose_summary, extract_terms, LinguisticAnalyzer};
use crate::models::enums::{ReviewStatus, Role};
use crate::models::{Account, AnalysisRecord};
use crate::recommend::{GenerationError, RecommendationGateway};

/// The authenticated identity a request acts as.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: Uuid,
    pub role: Role,
}

impl Session {
    pub fn for_account(account: &Account) -> Self {
        Self {
            account_id: account.id,
            role: account.role.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Operation requires the {0} role")]
    RoleRequired(Role),

    #[error("Doctor account has no profile; contact an administrator")]
    MissingDoctorProfile,

    #[error("Doctor is not assigned to this patient")]
    NotAssigned,

    #[error("Unknown analysis record: {0}")]
    UnknownAnalysis(Uuid),

    #[error("Invalid review status: {0:?}")]
    InvalidStatus(String),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Submit a narrative as the session patient: extract terms, compose the
/// summary, generate recommendations, then persist. The gateway call comes
/// before any write, so a generation failure or cancellation persists
/// nothing and the caller may simply retry.
pub fn submit_analysis(
    conn: &Connection,
    session: &Session,
    analyzer: &dyn LinguisticAnalyzer,
    gateway: &dyn RecommendationGateway,
    text: &str,
    timeout: Duration,
) -> Result<AnalysisRecord, WorkflowError> {
    require_role(session, Role::Patient)?;

    let analysis = analyzer.analyze(text);
    let terms = extract_terms(&analysis);
    let summary = compose_summary(&terms);
    let recommendations = gateway.generate(&summary, timeout)?;

    let record = repository::create_analysis_record(
        conn,
        &session.account_id,
        &terms,
        &summary,
        &recommendations,
        Utc::now().naive_utc(),
    )?;

    tracing::info!(
        analysis_id = %record.id,
        patient_id = %session.account_id,
        terms = record.terms.len(),
        "Analysis submitted"
    );
    Ok(record)
}

/// The session patient's own history, most recent first.
pub fn patient_history(
    conn: &Connection,
    session: &Session,
) -> Result<Vec<AnalysisRecord>, WorkflowError> {
    require_role(session, Role::Patient)?;
    Ok(repository::get_records_by_patient(conn, &session.account_id)?)
}

/// Patients assigned to the session doctor.
pub fn assigned_patients(
    conn: &Connection,
    session: &Session,
) -> Result<Vec<(Uuid, String)>, WorkflowError> {
    require_doctor(conn, session)?;
    Ok(accounts::list_patients(conn, &session.account_id)?)
}

/// One assigned patient's records, for the doctor review screen.
pub fn patient_records(
    conn: &Connection,
    session: &Session,
    patient_id: &Uuid,
) -> Result<Vec<AnalysisRecord>, WorkflowError> {
    require_doctor(conn, session)?;
    if !repository::assignment_exists(conn, &session.account_id, patient_id)? {
        return Err(WorkflowError::NotAssigned);
    }
    Ok(repository::get_records_by_patient(conn, patient_id)?)
}

/// Apply a review decision as the session doctor.
///
/// The status string is validated first, so an unrecognized value leaves the
/// record untouched. The doctor must hold an Assignment to the record's
/// owner — possession of the record id is not enough.
pub fn review_record(
    conn: &Connection,
    session: &Session,
    analysis_id: &Uuid,
    status: &str,
    doctor_notes: Option<&str>,
) -> Result<AnalysisRecord, WorkflowError> {
    require_doctor(conn, session)?;

    let status = ReviewStatus::from_str(status)
        .map_err(|_| WorkflowError::InvalidStatus(status.to_string()))?;

    let record = repository::get_analysis_record(conn, analysis_id)?
        .ok_or(WorkflowError::UnknownAnalysis(*analysis_id))?;
    if !repository::assignment_exists(conn, &session.account_id, &record.patient_id)? {
        return Err(WorkflowError::NotAssigned);
    }

    repository::update_review(conn, analysis_id, &status, doctor_notes, Utc::now().naive_utc())?;

    tracing::info!(
        analysis_id = %analysis_id,
        doctor_id = %session.account_id,
        status = status.as_str(),
        "Review updated"
    );

    repository::get_analysis_record(conn, analysis_id)?
        .ok_or(WorkflowError::UnknownAnalysis(*analysis_id))
}

fn require_role(session: &Session, role: Role) -> Result<(), WorkflowError> {
    if session.role != role {
        return Err(WorkflowError::RoleRequired(role));
    }
    Ok(())
}

/// Doctor operations also need the clinician profile; a doctor account
/// without one is a configuration error, not an authorization failure.
fn require_doctor(conn: &Connection, session: &Session) -> Result<(), WorkflowError> {
    require_role(session, Role::Doctor)?;
    if repository::get_doctor_profile_by_account(conn, &session.account_id)?.is_none() {
        return Err(WorkflowError::MissingDoctorProfile);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::accounts::DoctorProfileInput;
    use crate::db::sqlite::open_memory_database;
    use crate::extract::BasicAnalyzer;
    use crate::recommend::MockGateway;

    const NARRATIVE: &str =
        "Persistent fever for three days. Diagnosed with COPD in 2019. \
         Now reporting severe chest pain and swelling in the left knee.";

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn timeout() -> Duration {
        Duration::from_secs(5)
    }

    fn make_patient(conn: &Connection, username: &str) -> Session {
        let id = accounts::register(conn, username, "secret1", Role::Patient, None).unwrap();
        Session {
            account_id: id,
            role: Role::Patient,
        }
    }

    fn make_doctor(conn: &Connection, username: &str) -> Session {
        let id = accounts::register(
            conn,
            username,
            "rounds1",
            Role::Doctor,
            Some(DoctorProfileInput {
                full_name: "Dr. Test".into(),
                specialization: None,
            }),
        )
        .unwrap();
        Session {
            account_id: id,
            role: Role::Doctor,
        }
    }

    fn assign(conn: &Connection, doctor: &Session, patient: &Session) {
        accounts::assign(
            conn,
            &doctor.account_id,
            &patient.account_id,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
        .unwrap();
    }

    fn record_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM analysis_records", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn patient_submits_and_record_is_pending() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");

        let record = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::replying("Rest and hydrate."),
            NARRATIVE,
            timeout(),
        )
        .unwrap();

        assert_eq!(record.status, ReviewStatus::Pending);
        assert_eq!(record.recommendations, "Rest and hydrate.");
        assert!(record.terms.iter().any(|t| t == "COPD"));
        assert!(record.summary.starts_with("Based on the analysis"));
        assert!(record.doctor_notes.is_none());

        let history = patient_history(&conn, &patient).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, record.id);
        assert_eq!(history[0].terms, record.terms);
    }

    #[test]
    fn submission_without_terms_uses_sentinel_summary() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");

        let record = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::replying("General advice."),
            "feeling generally unwell today",
            timeout(),
        )
        .unwrap();

        assert!(record.terms.is_empty());
        assert_eq!(record.summary, crate::extract::NO_TERMS_SUMMARY);
    }

    #[test]
    fn gateway_failure_persists_nothing() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");

        let result = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::unavailable(),
            NARRATIVE,
            timeout(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::Generation(GenerationError::Connection(_)))
        ));
        assert_eq!(record_count(&conn), 0);
    }

    #[test]
    fn cancellation_behaves_like_failure() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");

        let result = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::cancelled(),
            NARRATIVE,
            timeout(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::Generation(GenerationError::Cancelled))
        ));
        assert_eq!(record_count(&conn), 0);
    }

    #[test]
    fn doctor_cannot_submit() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "dr_grey");

        let result = submit_analysis(
            &conn,
            &doctor,
            &BasicAnalyzer::new(),
            &MockGateway::replying("x"),
            NARRATIVE,
            timeout(),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::RoleRequired(Role::Patient))
        ));
    }

    #[test]
    fn patient_cannot_review() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");
        let result = review_record(&conn, &patient, &Uuid::new_v4(), "approved", None);
        assert!(matches!(
            result,
            Err(WorkflowError::RoleRequired(Role::Doctor))
        ));
    }

    #[test]
    fn assigned_doctor_approves_record() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");
        let doctor = make_doctor(&conn, "dr_grey");
        assign(&conn, &doctor, &patient);

        let record = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::replying("Rest."),
            NARRATIVE,
            timeout(),
        )
        .unwrap();

        let patients = assigned_patients(&conn, &doctor).unwrap();
        assert!(patients.iter().any(|(id, _)| *id == patient.account_id));

        let updated =
            review_record(&conn, &doctor, &record.id, "approved", Some("looks fine")).unwrap();
        assert_eq!(updated.status, ReviewStatus::Approved);
        assert_eq!(updated.doctor_notes.as_deref(), Some("looks fine"));
        assert!(updated.last_modified_at.is_some());
    }

    #[test]
    fn unassigned_doctor_is_rejected() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");
        let doctor = make_doctor(&conn, "dr_grey");
        let stranger = make_doctor(&conn, "dr_house");
        assign(&conn, &doctor, &patient);

        let record = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::replying("Rest."),
            NARRATIVE,
            timeout(),
        )
        .unwrap();

        let result = review_record(&conn, &stranger, &record.id, "approved", None);
        assert!(matches!(result, Err(WorkflowError::NotAssigned)));

        // The record is untouched
        let unchanged = repository::get_analysis_record(&conn, &record.id)
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, ReviewStatus::Pending);

        let listing = patient_records(&conn, &stranger, &patient.account_id);
        assert!(matches!(listing, Err(WorkflowError::NotAssigned)));
    }

    #[test]
    fn doctor_without_profile_is_a_configuration_error() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");

        // Bypass registration to simulate a misconfigured doctor account
        let bare_id = Uuid::new_v4();
        repository::insert_account(
            &conn,
            &Account {
                id: bare_id,
                username: "dr_orphan".into(),
                credential_hash: "x".into(),
                role: Role::Doctor,
            },
        )
        .unwrap();
        let bare_doctor = Session {
            account_id: bare_id,
            role: Role::Doctor,
        };

        let result = patient_records(&conn, &bare_doctor, &patient.account_id);
        assert!(matches!(result, Err(WorkflowError::MissingDoctorProfile)));
    }

    #[test]
    fn invalid_status_string_leaves_record_unchanged() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");
        let doctor = make_doctor(&conn, "dr_grey");
        assign(&conn, &doctor, &patient);

        let record = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::replying("Rest."),
            NARRATIVE,
            timeout(),
        )
        .unwrap();

        let result = review_record(&conn, &doctor, &record.id, "escalated", None);
        assert!(matches!(result, Err(WorkflowError::InvalidStatus(_))));

        let unchanged = repository::get_analysis_record(&conn, &record.id)
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, ReviewStatus::Pending);
        assert!(unchanged.last_modified_at.is_none());
    }

    #[test]
    fn unknown_analysis_id_is_reported() {
        let conn = test_db();
        let doctor = make_doctor(&conn, "dr_grey");
        let missing = Uuid::new_v4();
        let result = review_record(&conn, &doctor, &missing, "approved", None);
        assert!(matches!(
            result,
            Err(WorkflowError::UnknownAnalysis(id)) if id == missing
        ));
    }

    #[test]
    fn all_six_status_transitions_are_permitted() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");
        let doctor = make_doctor(&conn, "dr_grey");
        assign(&conn, &doctor, &patient);

        let record = submit_analysis(
            &conn,
            &patient,
            &BasicAnalyzer::new(),
            &MockGateway::replying("Rest."),
            NARRATIVE,
            timeout(),
        )
        .unwrap();

        // pending → approved → pending → disapproved → pending,
        // then approved → disapproved → approved. No terminal state.
        for (status, expected) in [
            ("approved", ReviewStatus::Approved),
            ("pending", ReviewStatus::Pending),
            ("disapproved", ReviewStatus::Disapproved),
            ("pending", ReviewStatus::Pending),
            ("approved", ReviewStatus::Approved),
            ("disapproved", ReviewStatus::Disapproved),
            ("approved", ReviewStatus::Approved),
        ] {
            let updated = review_record(&conn, &doctor, &record.id, status, None).unwrap();
            assert_eq!(updated.status, expected);
        }
    }

    #[test]
    fn doctor_sees_patient_history_most_recent_first() {
        let conn = test_db();
        let patient = make_patient(&conn, "alice");
        let doctor = make_doctor(&conn, "dr_grey");
        assign(&conn, &doctor, &patient);

        for summary in ["first", "second", "third"] {
            repository::create_analysis_record(
                &conn,
                &patient.account_id,
                &[],
                summary,
                "r",
                Utc::now().naive_utc(),
            )
            .unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }

        let records = patient_records(&conn, &doctor, &patient.account_id).unwrap();
        let summaries: Vec<_> = records.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(summaries, vec!["third", "second", "first"]);
    }

    #[test]
    fn session_built_from_account() {
        let conn = test_db();
        accounts::register(&conn, "alice", "secret1", Role::Patient, None).unwrap();
        let account = accounts::authenticate(&conn, "alice", "secret1").unwrap();
        let session = Session::for_account(&account);
        assert_eq!(session.account_id, account.id);
        assert_eq!(session.role, Role::Patient);
    }
}
