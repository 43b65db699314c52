//! Narrative analysis: the linguistic-analyzer boundary, the term-extraction
//! heuristic, and the summary composer.
//!
//! `extract_terms` and `compose_summary` are pure and deterministic; the only
//! I/O in this module is whatever a `LinguisticAnalyzer` or `TextExtractor`
//! implementation chooses to do.

pub mod analyzer;
pub mod basic;
pub mod document;
pub mod summary;
pub mod terms;

pub use analyzer::{Entity, EntityCategory, LinguisticAnalyzer, NounPhrase, TextAnalysis};
pub use basic::BasicAnalyzer;
pub use document::{DocumentError, PlainTextExtractor, TextExtractor};
pub use summary::{compose_summary, NO_TERMS_SUMMARY};
pub use terms::{extract_terms, SYMPTOM_KEYWORDS};
