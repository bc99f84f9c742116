//! Ollama HTTP backend (`ollama` feature).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::OllamaConfig;
use crate::generator::{clean_completion, CompletionError, CompletionResult, TextGenerator};

/// Blocking client for `/api/generate` on a local Ollama instance.
pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaGenerator {
    /// Generator for the answer model.
    pub fn new(config: &OllamaConfig) -> CompletionResult<Self> {
        Self::with_model(config, &config.model)
    }

    /// Generator for the plain-English rewrite model.
    pub fn for_translation(config: &OllamaConfig) -> CompletionResult<Self> {
        Self::with_model(config, &config.translation_model)
    }

    fn with_model(config: &OllamaConfig, model: &str) -> CompletionResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CompletionError::Connection(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for OllamaGenerator {
    fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "ollama generate");

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                CompletionError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                CompletionError::Inference(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                CompletionError::Inference(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| CompletionError::InvalidFormat(e.to_string()))?;

        clean_completion(&parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = OllamaConfig {
            base_url: "http://localhost:11434/".into(),
            ..OllamaConfig::default()
        };
        let generator = OllamaGenerator::for_translation(&config).unwrap();
        assert_eq!(generator.base_url, "http://localhost:11434");
        assert_eq!(generator.model(), "llama3.2");
    }

    #[test]
    fn test_unreachable_backend_is_connection_error() {
        let config = OllamaConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..OllamaConfig::default()
        };
        let generator = OllamaGenerator::new(&config).unwrap();
        let err = generator.complete("hello").unwrap_err();
        assert!(matches!(
            err,
            CompletionError::Connection(_) | CompletionError::Inference(_)
        ));
    }
}
