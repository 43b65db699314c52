use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A doctor-patient pairing granting the doctor review rights over that
/// patient's analysis records. The (doctor, patient) pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub assigned_at: NaiveDateTime,
}
