//! Drug document storage and the collaborator seams the pipeline calls.

mod schema;
mod sqlite;

pub use schema::*;
pub use sqlite::*;

use thiserror::Error;

use crate::models::{DrugRecord, SearchHit, StoredDocument};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown section in stored document: {0}")]
    InvalidSection(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fetch errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Fetching {drug} failed: {reason}")]
    Failed { drug: String, reason: String },

    #[error("Drug data service unavailable: {0}")]
    Unavailable(String),
}

/// Searchable collection of per-section drug documents.
pub trait VectorStore {
    /// Up to `k` documents closest to `query`, closest first.
    fn search(&self, query: &str, k: usize) -> StoreResult<Vec<SearchHit>>;

    /// Every stored section for one drug.
    fn get_by_drug_name(&self, name: &str) -> StoreResult<Vec<StoredDocument>>;

    /// Distinct drug names, sorted.
    fn list_all_drugs(&self) -> StoreResult<Vec<String>>;

    /// Index a record. Returns `false` when it has no content to index.
    fn add(&self, record: &DrugRecord) -> StoreResult<bool>;
}

/// Source of label data for drugs missing from the store.
pub trait DrugFetcher {
    fn fetch_drug_info(&self, name: &str) -> Result<Option<DrugRecord>, FetchError>;
}
