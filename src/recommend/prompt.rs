//! Recommendation prompt template.
//!
//! The template is configuration data injected into the gateway, not logic:
//! deployments may swap it wholesale as long as the `{summary}` slot remains.

use super::GenerationError;

/// Slot the analysis summary is rendered into.
const SUMMARY_PLACEHOLDER: &str = "{summary}";

/// Default template, structured as four recommendation categories with a
/// leading disclaimer instruction.
pub const DEFAULT_RECOMMENDATION_TEMPLATE: &str = "\
Based on the following medical summary, provide detailed recommendations in these categories:

1. Specific Medications:
- List common over-the-counter medications with their generic and brand names
- Mention typical dosage forms (tablets, capsules, etc.)
- Include common medication classes that doctors might prescribe

2. Alternative Treatments:
- List specific supplements and natural remedies with dosages
- Mention specific herbal medicines commonly used

3. Home Remedies:
- Provide detailed recipes or preparation methods
- Include specific ingredients and their quantities
- Mention how often to apply/use each remedy

4. Lifestyle Modifications:
- Specific dietary changes with food examples
- Exact exercise recommendations with duration and frequency
- Precise sleep and stress management techniques

Format each section clearly with bullet points and include specific examples.
Important: Begin your response with a clear medical disclaimer.

Medical Summary: {summary}

Response:
";

/// A validated prompt template with a `{summary}` slot.
#[derive(Debug, Clone)]
pub struct RecommendationPrompt {
    template: String,
}

impl RecommendationPrompt {
    /// Wrap a template, rejecting ones without the summary slot.
    pub fn new(template: impl Into<String>) -> Result<Self, GenerationError> {
        let template = template.into();
        if !template.contains(SUMMARY_PLACEHOLDER) {
            return Err(GenerationError::InvalidTemplate);
        }
        Ok(Self { template })
    }

    /// Render the prompt for one summary.
    pub fn render(&self, summary: &str) -> String {
        self.template.replace(SUMMARY_PLACEHOLDER, summary)
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for RecommendationPrompt {
    fn default() -> Self {
        Self {
            template: DEFAULT_RECOMMENDATION_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_has_summary_slot() {
        assert!(DEFAULT_RECOMMENDATION_TEMPLATE.contains(SUMMARY_PLACEHOLDER));
        // The default must always pass its own validation.
        RecommendationPrompt::new(DEFAULT_RECOMMENDATION_TEMPLATE).unwrap();
    }

    #[test]
    fn render_substitutes_summary() {
        let prompt = RecommendationPrompt::default();
        let rendered = prompt.render("key symptoms include: fever.");
        assert!(rendered.contains("Medical Summary: key symptoms include: fever."));
        assert!(!rendered.contains(SUMMARY_PLACEHOLDER));
    }

    #[test]
    fn template_without_slot_is_rejected() {
        let result = RecommendationPrompt::new("give recommendations");
        assert!(matches!(result, Err(GenerationError::InvalidTemplate)));
    }

    #[test]
    fn custom_template_renders() {
        let prompt = RecommendationPrompt::new("Advise on: {summary}").unwrap();
        assert_eq!(prompt.render("fever"), "Advise on: fever");
    }
}
