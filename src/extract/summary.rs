//! Templated summary over the extracted term list.

/// Sentence returned when extraction found nothing.
pub const NO_TERMS_SUMMARY: &str = "No specific medical terms were identified in the input.";

/// Compose the analysis summary sentence.
///
/// Terms are listed comma-joined in the order given; they are assumed already
/// deduplicated. Total function, no failure modes.
pub fn compose_summary(terms: &[String]) -> String {
    if terms.is_empty() {
        return NO_TERMS_SUMMARY.to_string();
    }
    format!(
        "Based on the analysis, the key medical conditions and symptoms include: {}.",
        terms.join(", ")
    )
}
