use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Role;

/// A registered user identity. Username and role are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    /// Opaque credential hash (see `accounts::credential`). Never leaves the
    /// store layer in serialized form.
    #[serde(skip)]
    pub credential_hash: String,
    pub role: Role,
}

/// Clinician details for a doctor-role account, one-to-one with the account.
/// A doctor may not review records until this profile exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub specialization: Option<String>,
}
