//! Rule-based reference analyzer.
//!
//! A deterministic, dependency-light stand-in for a real linguistic model:
//! sentences split on terminal punctuation, entities approximated as runs of
//! capitalized tokens, noun phrases approximated as stopword-bounded chunks.
//! Good enough to exercise the extraction pipeline end-to-end; it makes no
//! clinical accuracy claims.

use regex::Regex;

use super::analyzer::{Entity, EntityCategory, LinguisticAnalyzer, NounPhrase, TextAnalysis};

/// Function words that terminate a noun chunk. Articles are not listed, so
/// chunks keep their determiners ("a fever", "the knee").
const CHUNK_STOPWORDS: &[&str] = &[
    "and", "or", "but", "if", "then", "because", "since", "after", "before", "while", "when",
    "of", "in", "on", "at", "to", "from", "for", "with", "without", "by", "as", "is", "are",
    "was", "were", "be", "been", "being", "has", "have", "had", "do", "does", "did", "he",
    "she", "it", "they", "them", "his", "her", "their", "i", "we", "you", "my", "your", "our",
    "that", "this", "these", "those", "not", "no", "so", "very", "also",
];

/// Capitalized runs ending in one of these read as named conditions.
const CONDITION_MARKERS: &[&str] = &["disease", "syndrome", "disorder", "infection"];
const CONDITION_SUFFIXES: &[&str] = &["itis", "emia", "osis", "algia"];

pub struct BasicAnalyzer {
    token_re: Regex,
}

impl BasicAnalyzer {
    pub fn new() -> Self {
        Self {
            token_re: Regex::new(r"[A-Za-z][A-Za-z'\-]*").expect("valid token pattern"),
        }
    }
}

impl Default for BasicAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LinguisticAnalyzer for BasicAnalyzer {
    fn analyze(&self, text: &str) -> TextAnalysis {
        let mut analysis = TextAnalysis::default();
        for sentence in text.split(['.', '!', '?', ';', '\n']) {
            let tokens: Vec<String> = self
                .token_re
                .find_iter(sentence)
                .map(|m| m.as_str().to_string())
                .collect();
            if tokens.is_empty() {
                continue;
            }
            collect_entities(&tokens, &mut analysis.entities);
            collect_noun_phrases(&tokens, &mut analysis.noun_phrases);
        }
        analysis
    }
}

fn collect_entities(tokens: &[String], out: &mut Vec<Entity>) {
    let mut i = 0;
    while i < tokens.len() {
        if !starts_upper(&tokens[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < tokens.len() && starts_upper(&tokens[i]) {
            i += 1;
        }
        let run = &tokens[start..i];
        // A lone sentence-initial capital is sentence case, not a name.
        if start == 0 && run.len() == 1 && !is_acronym(&run[0]) {
            continue;
        }
        out.push(Entity {
            text: run.join(" "),
            category: categorize(run),
        });
    }
}

fn collect_noun_phrases(tokens: &[String], out: &mut Vec<NounPhrase>) {
    let mut chunk: Vec<String> = Vec::new();
    for token in tokens {
        if CHUNK_STOPWORDS.contains(&token.to_lowercase().as_str()) {
            if !chunk.is_empty() {
                out.push(NounPhrase::new(std::mem::take(&mut chunk)));
            }
        } else {
            chunk.push(token.clone());
        }
    }
    if !chunk.is_empty() {
        out.push(NounPhrase::new(chunk));
    }
}

fn categorize(run: &[String]) -> EntityCategory {
    if run.iter().any(|t| is_acronym(t)) {
        return EntityCategory::Organization;
    }
    if let Some(last) = run.last() {
        let lower = last.to_lowercase();
        if CONDITION_MARKERS.contains(&lower.as_str())
            || CONDITION_SUFFIXES.iter().any(|s| lower.ends_with(s))
        {
            return EntityCategory::Condition;
        }
    }
    EntityCategory::Other
}

fn starts_upper(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_acronym(token: &str) -> bool {
    token.len() > 1 && token.chars().all(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(text: &str) -> TextAnalysis {
        BasicAnalyzer::new().analyze(text)
    }

    #[test]
    fn empty_text_yields_empty_analysis() {
        let analysis = analyze("");
        assert!(analysis.entities.is_empty());
        assert!(analysis.noun_phrases.is_empty());
    }

    #[test]
    fn analysis_is_deterministic() {
        let text = "Persistent fever and joint swelling. Suspected Lyme Disease, referred to Mercy Hospital.";
        let first = serde_json::to_string(&analyze(text)).unwrap();
        let second = serde_json::to_string(&analyze(text)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn acronym_is_tagged_organization() {
        let analysis = analyze("Patient was diagnosed with COPD last year");
        let copd = analysis
            .entities
            .iter()
            .find(|e| e.text == "COPD")
            .expect("COPD entity");
        assert_eq!(copd.category, EntityCategory::Organization);
    }

    #[test]
    fn condition_suffix_is_tagged_condition() {
        let analysis = analyze("History of Rheumatoid Arthritis and of Crohn's Disease");
        let categories: Vec<_> = analysis
            .entities
            .iter()
            .map(|e| (e.text.as_str(), e.category))
            .collect();
        assert!(categories.contains(&("Rheumatoid Arthritis", EntityCategory::Condition)));
        assert!(categories.contains(&("Crohn's Disease", EntityCategory::Condition)));
    }

    #[test]
    fn capitalized_run_is_a_single_entity() {
        let analysis = analyze("Seen previously at Mercy General Hospital for observation");
        assert_eq!(analysis.entities.len(), 1);
        assert_eq!(analysis.entities[0].text, "Mercy General Hospital");
    }

    #[test]
    fn sentence_initial_capital_is_not_an_entity() {
        let analysis = analyze("She reported mild discomfort");
        assert!(analysis.entities.is_empty());
    }

    #[test]
    fn noun_chunks_break_at_stopwords_and_keep_articles() {
        let analysis = analyze("severe pain and swelling in the knee");
        let phrases: Vec<String> = analysis.noun_phrases.iter().map(|p| p.text()).collect();
        assert_eq!(phrases, vec!["severe pain", "swelling", "the knee"]);
    }
}
