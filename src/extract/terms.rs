//! Candidate-term selection over an analyzer pass.

use std::collections::HashSet;

use super::analyzer::{EntityCategory, TextAnalysis};

/// Fixed vocabulary for the noun-phrase pass; a phrase qualifies when any of
/// its tokens, lower-cased, is listed here.
pub const SYMPTOM_KEYWORDS: &[&str] = &[
    "pain",
    "ache",
    "discomfort",
    "swelling",
    "fever",
    "infection",
    "inflammation",
    "disease",
    "syndrome",
    "condition",
    "symptom",
    "treatment",
];

/// Select candidate medical terms from an analyzer pass.
///
/// An entity qualifies when any of:
/// - it is organization/place tagged and carries a fully upper-case token
///   (acronym-like clinical abbreviations),
/// - it is condition tagged,
/// - it spans at most three tokens and starts with an upper-case character.
///
/// A noun phrase qualifies when it contains a [`SYMPTOM_KEYWORDS`] token.
/// Entity matches come first, then phrase matches, each in production order;
/// duplicates keep their first occurrence. Empty input yields an empty list.
pub fn extract_terms(analysis: &TextAnalysis) -> Vec<String> {
    let mut candidates = Vec::new();

    for entity in &analysis.entities {
        let tokens: Vec<&str> = entity.text.split_whitespace().collect();
        let acronym_like = matches!(
            entity.category,
            EntityCategory::Organization | EntityCategory::Place
        ) && tokens.iter().any(|t| is_fully_upper(t));
        let condition_like = entity.category == EntityCategory::Condition;
        let short_proper = tokens.len() <= 3
            && entity
                .text
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase());

        if acronym_like || condition_like || short_proper {
            candidates.push(entity.text.clone());
        }
    }

    for phrase in &analysis.noun_phrases {
        let has_keyword = phrase
            .tokens
            .iter()
            .any(|t| SYMPTOM_KEYWORDS.contains(&t.to_lowercase().as_str()));
        if has_keyword {
            candidates.push(phrase.text());
        }
    }

    dedup_preserving_order(candidates)
}

/// Whether all cased characters of a token are upper-case (and there is at
/// least one). "COPD" qualifies; "Copd" and "x-ray" do not.
fn is_fully_upper(token: &str) -> bool {
    let mut saw_alpha = false;
    for c in token.chars() {
        if c.is_alphabetic() {
            saw_alpha = true;
            if !c.is_uppercase() {
                return false;
            }
        }
    }
    saw_alpha
}

fn dedup_preserving_order(candidates: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
