use serde::{Deserialize, Serialize};

/// Category label an analyzer attaches to a tagged span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Organization,
    Place,
    Condition,
    Person,
    Other,
}

/// A tagged span of text with its category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub category: EntityCategory,
}

impl Entity {
    pub fn new(text: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// A contiguous noun-headed span, kept as its tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NounPhrase {
    pub tokens: Vec<String>,
}

impl NounPhrase {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// The phrase as display text.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Output of one analyzer pass over a narrative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub entities: Vec<Entity>,
    pub noun_phrases: Vec<NounPhrase>,
}

/// Sentence segmentation plus entity and noun-phrase tagging.
///
/// Implementations must be deterministic: the same text yields the same
/// entities and phrases in the same order on every call. The term heuristic
/// in [`crate::extract::terms`] depends on that ordering.
pub trait LinguisticAnalyzer {
    fn analyze(&self, text: &str) -> TextAnalysis;
}
