//! Ollama-backed recommendation gateway.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::RecommendationPrompt;
use super::{GenerationError, RecommendationGateway};
use crate::config;

/// HTTP client for a local Ollama instance.
///
/// The client carries no global request timeout; each generate call is
/// bounded by the caller-supplied budget instead.
pub struct OllamaGateway {
    base_url: String,
    model: String,
    prompt: RecommendationPrompt,
    client: reqwest::blocking::Client,
}

impl OllamaGateway {
    pub fn new(base_url: &str, model: &str, prompt: RecommendationPrompt) -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            prompt,
            client,
        }
    }

    /// Gateway configured from the environment, with the default template.
    pub fn from_env() -> Self {
        Self::new(
            &config::ollama_base_url(),
            &config::recommendation_model(),
            RecommendationPrompt::default(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Models the Ollama instance currently serves.
    pub fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                GenerationError::Connection(self.base_url.clone())
            } else {
                GenerationError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().map_err(|e| GenerationError::Http(e.to_string()))?;
        let parsed: TagsResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    pub fn is_model_available(&self) -> Result<bool, GenerationError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagsModel>,
}

#[derive(Deserialize)]
struct TagsModel {
    name: String,
}

impl RecommendationGateway for OllamaGateway {
    fn generate(&self, summary: &str, timeout: Duration) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let rendered = self.prompt.render(summary);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &rendered,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(timeout.as_secs())
                } else if e.is_connect() {
                    GenerationError::Connection(self.base_url.clone())
                } else {
                    GenerationError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().map_err(|e| GenerationError::Http(e.to_string()))?;
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let gateway = OllamaGateway::new(
            "http://localhost:11434/",
            "llama2",
            RecommendationPrompt::default(),
        );
        assert_eq!(gateway.base_url(), "http://localhost:11434");
        assert_eq!(gateway.model(), "llama2");
    }

    #[test]
    fn from_env_uses_local_default() {
        let gateway = OllamaGateway::from_env();
        assert!(
            gateway.base_url().contains("localhost") || gateway.base_url().contains("127.0.0.1"),
        );
    }

    #[test]
    fn generate_response_parses() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"response":"Stay hydrated.","done":true}"#).unwrap();
        assert_eq!(parsed.response, "Stay hydrated.");
    }

    #[test]
    fn tags_response_parses() {
        let parsed: TagsResponse =
            serde_json::from_str(r#"{"models":[{"name":"llama2:latest"},{"name":"mistral"}]}"#)
                .unwrap();
        let names: Vec<_> = parsed.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["llama2:latest", "mistral"]);
    }
}
