//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Settings for a local Ollama instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub base_url: String,
    /// Model used for answer generation.
    pub model: String,
    /// Model used for plain-English rewrites.
    pub translation_model: String,
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3.1".into(),
            translation_model: "llama3.2".into(),
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    /// Defaults overridden by `MEDEXPLAIN_OLLAMA_URL`, `MEDEXPLAIN_MODEL`,
    /// `MEDEXPLAIN_TRANSLATION_MODEL` and `MEDEXPLAIN_LLM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("MEDEXPLAIN_OLLAMA_URL") {
            config.base_url = url;
        }
        if let Some(model) = lookup("MEDEXPLAIN_MODEL") {
            config.model = model;
        }
        if let Some(model) = lookup("MEDEXPLAIN_TRANSLATION_MODEL") {
            config.translation_model = model;
        }
        if let Some(secs) = lookup("MEDEXPLAIN_LLM_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.timeout_secs = secs;
        }
        config
    }
}
