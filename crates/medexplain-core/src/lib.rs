//! MedExplain Core Library
//!
//! Plain-English medication answers over FDA label sections, with safety
//! gating in front of every question.
//!
//! # Architecture
//!
//! ```text
//! Question ──▶ Safety Filter ──blocked──▶ referral + emergency disclaimer
//!                   │
//!                   ▼
//!        Smart Interaction Detector ◀──▶ ConversationContext (per session)
//!                   │
//!        ┌──────────┼──────────────┬───────────────────┐
//!        ▼          ▼              ▼                   ▼
//!   Interaction  Multi-Drug     Dosage            Retrieval
//!    Analyzer      Parser       Advisor      VectorStore ─▶ TextGenerator
//!        │          │              │                   │
//!        └──────────┴──────┬───────┴───────────────────┘
//!                          ▼
//!               Plain-English Translator
//!                          │
//!                          ▼
//!                    QueryResponse
//! ```
//!
//! # Core Principle
//!
//! **No dosing instructions and no crisis content.** Unsafe questions never
//! reach retrieval or generation, and every answer carries a disclaimer.
//!
//! # Modules
//!
//! - [`safety`]: Unsafe-query gate and topic disclaimers
//! - [`resolver`]: Brand/misspelling normalization and fuzzy matching
//! - [`interaction`]: Class-based drug interaction rules
//! - [`conversation`]: Per-session context, follow-up detection, sessions
//! - [`dosage`]: Reference dosing table and dosage question handling
//! - [`translator`]: Medical jargon to everyday English
//! - [`multi_drug`]: Splitting and recombining multi-drug questions
//! - [`store`]: Collaborator traits and the SQLite FTS5 drug store
//! - [`pipeline`]: The query orchestrator
//! - [`config`]: Pipeline settings

pub mod config;
pub mod conversation;
pub mod dosage;
pub mod interaction;
pub mod models;
pub mod multi_drug;
pub mod pipeline;
pub mod resolver;
pub mod safety;
pub mod store;
pub mod translator;

// Re-export commonly used types
pub use config::{ConfigError, PipelineConfig};
pub use conversation::{ConversationContext, SessionRegistry, SmartInteractionDetector};
pub use dosage::DosageAdvisor;
pub use interaction::{InteractionAnalyzer, InteractionResult, InteractionSeverity};
pub use models::{
    Confidence, DrugOverview, DrugRecord, DrugSection, QueryKind, QueryResponse, SearchHit,
    Source, StoredDocument,
};
pub use multi_drug::MultiDrugParser;
pub use pipeline::{MedExplainRag, PipelineError, PipelineResult};
pub use resolver::DrugNameNormalizer;
pub use safety::{SafetyDisclaimer, SafetyFilter};
pub use store::{DrugFetcher, FetchError, SqliteDrugStore, StoreError, VectorStore};
pub use translator::PlainEnglishTranslator;

pub use medexplain_llm::{CompletionError, MockGenerator, TextGenerator};

/// Error type for callers that drive the library end to end.
#[derive(Debug, thiserror::Error)]
pub enum MedExplainError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),
}

pub type Result<T> = std::result::Result<T, MedExplainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: MedExplainError = StoreError::InvalidSection("dosing".into()).into();
        assert!(err.to_string().starts_with("Store error:"));

        let err: MedExplainError = PipelineError::from(CompletionError::Connection("refused".into())).into();
        assert!(err.to_string().contains("refused"));
    }
}
