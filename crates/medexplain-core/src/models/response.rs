//! Response models returned to callers.

use serde::{Deserialize, Serialize};

/// How much the answer is backed by retrieved sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Confidence {
    /// Ordering used when several answers are merged (High wins).
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::NotApplicable => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::NotApplicable => "N/A",
        }
    }
}

/// Where a piece of an answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub drug: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Source {
    pub fn new(drug: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            drug: drug.into(),
            section: section.into(),
            url: None,
            last_updated: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Answer to one user question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    pub safety_warning: bool,
    pub confidence: Confidence,
    pub sources: Vec<Source>,
    pub disclaimer: String,
    pub query: String,
    /// Number of drugs answered when a question named several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_drug_count: Option<usize>,
    /// Collaborator failure text, set only on error responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn new(
        response: impl Into<String>,
        confidence: Confidence,
        disclaimer: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            response: response.into(),
            safety_warning: false,
            confidence,
            sources: Vec::new(),
            disclaimer: disclaimer.into(),
            query: query.into(),
            multi_drug_count: None,
            error: None,
        }
    }

    pub fn with_warning(mut self, safety_warning: bool) -> Self {
        self.safety_warning = safety_warning;
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }
}
