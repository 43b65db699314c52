use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReviewStatus;

/// One submitted narrative analysis: extracted terms, templated summary,
/// generated recommendations, and the clinician review state.
///
/// Core fields (terms, summary, recommendations, created_at) are immutable
/// after creation; only `status`, `doctor_notes`, and `last_modified_at`
/// change, and only through a review update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub created_at: NaiveDateTime,
    /// Ordered, deduplicated candidate terms. Persisted as rows in
    /// `analysis_terms`, never as a joined string.
    pub terms: Vec<String>,
    pub summary: String,
    pub recommendations: String,
    pub status: ReviewStatus,
    pub doctor_notes: Option<String>,
    /// Set by review updates only; NULL until the first one.
    pub last_modified_at: Option<NaiveDateTime>,
}

impl AnalysisRecord {
    /// Display form of the term list, for UI boundaries only.
    pub fn terms_display(&self) -> String {
        self.terms.join(", ")
    }
}
