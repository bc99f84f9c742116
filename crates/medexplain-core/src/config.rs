//! Pipeline tuning knobs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::{DEFAULT_CONTEXT_CAPACITY, DEFAULT_CONTEXT_TIMEOUT_SECS};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Retrieval and routing settings. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Documents requested per search.
    pub search_results: usize,
    /// Largest distance accepted when the question names a drug.
    pub known_drug_max_distance: f64,
    /// Largest distance accepted when no drug was recognised.
    pub unknown_drug_max_distance: f64,
    /// Document characters kept per source in the prompt context.
    pub max_document_chars: usize,
    /// Drugs answered from one multi-drug question.
    pub max_multi_drug: usize,
    /// Drugs listed in a "not found" answer.
    pub known_drugs_listed: usize,
    pub suggestion_limit: usize,
    pub context_timeout_secs: u64,
    pub context_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_results: 3,
            known_drug_max_distance: 1.5,
            unknown_drug_max_distance: 1.2,
            max_document_chars: 800,
            max_multi_drug: 10,
            known_drugs_listed: 10,
            suggestion_limit: 3,
            context_timeout_secs: DEFAULT_CONTEXT_TIMEOUT_SECS,
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Apply `MEDEXPLAIN_SEARCH_RESULTS`, `MEDEXPLAIN_MAX_DOCUMENT_CHARS`,
    /// `MEDEXPLAIN_MAX_MULTI_DRUG` and `MEDEXPLAIN_CONTEXT_TIMEOUT_SECS`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = parse_var(&lookup, "MEDEXPLAIN_SEARCH_RESULTS")? {
            self.search_results = v;
        }
        if let Some(v) = parse_var(&lookup, "MEDEXPLAIN_MAX_DOCUMENT_CHARS")? {
            self.max_document_chars = v;
        }
        if let Some(v) = parse_var(&lookup, "MEDEXPLAIN_MAX_MULTI_DRUG")? {
            self.max_multi_drug = v;
        }
        if let Some(v) = parse_var(&lookup, "MEDEXPLAIN_CONTEXT_TIMEOUT_SECS")? {
            self.context_timeout_secs = v;
        }
        Ok(self)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.search_results, 3);
        assert_eq!(config.known_drug_max_distance, 1.5);
        assert_eq!(config.unknown_drug_max_distance, 1.2);
        assert_eq!(config.context_timeout_secs, 300);
        assert_eq!(config.context_capacity, 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(r#"{"search_results": 5}"#).unwrap();
        assert_eq!(config.search_results, 5);
        assert_eq!(config.max_document_chars, 800);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_multi_drug": 4}}"#).unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_multi_drug, 4);
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::from_json_file("/nonexistent/medexplain.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::default()
            .with_overrides(|k| (k == "MEDEXPLAIN_SEARCH_RESULTS").then(|| "7".to_string()))
            .unwrap();
        assert_eq!(config.search_results, 7);

        let err = PipelineConfig::default()
            .with_overrides(|k| (k == "MEDEXPLAIN_MAX_MULTI_DRUG").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
