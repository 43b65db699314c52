//! Recommendation generation boundary.
//!
//! The workflow only sees [`RecommendationGateway`]; the Ollama-backed
//! implementation lives in [`ollama`], the prompt template (configuration
//! data, not logic) in [`prompt`]. A gateway failure is never fatal: the
//! caller persists nothing and retries.

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaGateway;
pub use prompt::{RecommendationPrompt, DEFAULT_RECOMMENDATION_TEMPLATE};

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Cannot reach the recommendation model at {0}")]
    Connection(String),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    #[error("Model returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Prompt template is missing the {{summary}} placeholder")]
    InvalidTemplate,

    #[error("Generation was cancelled")]
    Cancelled,
}

/// Produces recommendation text for an analysis summary.
///
/// May block up to `timeout`; expiry and caller-side cancellation are
/// equivalent failures. Implementations must not persist anything — on any
/// error the workflow creates no record and the caller is told to retry.
pub trait RecommendationGateway {
    fn generate(&self, summary: &str, timeout: Duration) -> Result<String, GenerationError>;
}

/// Scripted gateway for tests.
pub struct MockGateway {
    behavior: MockBehavior,
}

enum MockBehavior {
    Reply(String),
    Unavailable,
    Cancelled,
}

impl MockGateway {
    /// Always succeeds with the given text.
    pub fn replying(text: &str) -> Self {
        Self {
            behavior: MockBehavior::Reply(text.to_string()),
        }
    }

    /// Always fails as if the upstream were unreachable.
    pub fn unavailable() -> Self {
        Self {
            behavior: MockBehavior::Unavailable,
        }
    }

    /// Always fails as a caller-side cancellation.
    pub fn cancelled() -> Self {
        Self {
            behavior: MockBehavior::Cancelled,
        }
    }
}

impl RecommendationGateway for MockGateway {
    fn generate(&self, _summary: &str, _timeout: Duration) -> Result<String, GenerationError> {
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Unavailable => {
                Err(GenerationError::Connection("mock upstream".to_string()))
            }
            MockBehavior::Cancelled => Err(GenerationError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_gateway_replies() {
        let gateway = MockGateway::replying("Drink fluids.");
        let out = gateway
            .generate("summary", Duration::from_secs(1))
            .unwrap();
        assert_eq!(out, "Drink fluids.");
    }

    #[test]
    fn mock_gateway_failure_modes() {
        let unavailable = MockGateway::unavailable().generate("s", Duration::from_secs(1));
        assert!(matches!(unavailable, Err(GenerationError::Connection(_))));

        let cancelled = MockGateway::cancelled().generate("s", Duration::from_secs(1));
        assert!(matches!(cancelled, Err(GenerationError::Cancelled)));
    }

    #[test]
    fn error_messages_are_actionable() {
        let err = GenerationError::Timeout(120);
        assert_eq!(err.to_string(), "Generation timed out after 120s");

        let err = GenerationError::Upstream {
            status: 503,
            body: "loading model".into(),
        };
        assert!(err.to_string().contains("503"));
    }
}
