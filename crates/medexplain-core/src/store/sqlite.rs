//! SQLite-backed drug store with FTS5 (BM25) search.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::{StoreError, StoreResult, VectorStore, SCHEMA};
use crate::models::{DocumentMetadata, DrugRecord, DrugSection, SearchHit, StoredDocument};

/// Document id for one (drug, section) pair.
pub fn document_id(drug_name: &str, section: DrugSection) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", drug_name.to_lowercase(), section.as_str()).as_bytes());
    hex::encode(hasher.finalize())
}

/// Split a record into one searchable document per non-empty section.
pub fn prepare_documents(record: &DrugRecord) -> Vec<StoredDocument> {
    let generic = if record.generic_name.is_empty() {
        "N/A"
    } else {
        record.generic_name.as_str()
    };

    record
        .present_sections()
        .into_iter()
        .map(|(section, content)| StoredDocument {
            id: document_id(&record.name, section),
            text: format!(
                "Drug Name: {}\nGeneric Name: {}\nBrand Names: {}\nSection: {}\n\n{}",
                record.name,
                generic,
                record.brand_names.join(", "),
                section.title(),
                content
            ),
            content: content.to_string(),
            metadata: DocumentMetadata {
                drug_name: record.name.clone(),
                generic_name: record.generic_name.clone(),
                brand_names: record.brand_names.clone(),
                section,
                source_url: record.source_url.clone(),
                last_updated: record.last_updated.clone(),
                ndc_codes: record.ndc_codes.clone(),
            },
        })
        .collect()
}

/// Question words that say nothing about which label section fits.
const STOP_TERMS: &[&str] = &[
    "about", "after", "all", "also", "and", "any", "are", "been", "but", "can", "could", "did",
    "does", "doing", "for", "from", "get", "had", "has", "have", "her", "him", "his", "how",
    "into", "its", "just", "know", "much", "not", "our", "please", "she", "should", "some",
    "take", "taking", "tell", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "those", "too", "very", "was", "were", "what", "when", "where", "which",
    "while", "who", "why", "will", "with", "would", "you", "your",
];

/// Distances run from 0 (every question term in the document) to 2 (none).
const MAX_DISTANCE: f64 = 2.0;

/// Lowercased, de-duplicated content terms of a question.
fn search_terms(query: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in words(query) {
        if word.chars().count() >= 3 && !STOP_TERMS.contains(&word.as_str()) && !terms.contains(&word) {
            terms.push(word);
        }
    }
    terms
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Quote every term and OR them as prefix queries.
fn fts_query(terms: &[String]) -> String {
    terms
        .iter()
        .map(|term| format!("\"{}\"*", term))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Share of the question's terms a document lacks, scaled to `0..=2`.
/// BM25 only orders the hits.
fn lexical_distance(terms: &[String], text: &str) -> f64 {
    if terms.is_empty() {
        return MAX_DISTANCE;
    }
    let doc_words: Vec<String> = words(text).collect();
    let matched = terms
        .iter()
        .filter(|term| doc_words.iter().any(|w| w.starts_with(term.as_str())))
        .count();
    MAX_DISTANCE * (1.0 - matched as f64 / terms.len() as f64)
}

/// Document and drug counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_documents: usize,
    pub total_drugs: usize,
}

/// Drug store over a single SQLite connection.
pub struct SqliteDrugStore {
    conn: Connection,
}

impl SqliteDrugStore {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> StoreResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn stats(&self) -> StoreResult<StoreStats> {
        let (documents, drugs): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT drug_name) FROM drug_documents",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(StoreStats {
            total_documents: documents.max(0) as usize,
            total_drugs: drugs.max(0) as usize,
        })
    }

    fn upsert_document(&self, doc: &StoredDocument) -> StoreResult<()> {
        let meta = &doc.metadata;
        let brand_names_json = serde_json::to_string(&meta.brand_names)?;
        let ndc_json = serde_json::to_string(&meta.ndc_codes)?;

        self.conn.execute(
            r#"
            INSERT INTO drug_documents (
                id, drug_name, generic_name, brand_names, section, text, content,
                source_url, last_updated, ndc_codes, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, datetime('now'))
            ON CONFLICT(id) DO UPDATE SET
                drug_name = excluded.drug_name,
                generic_name = excluded.generic_name,
                brand_names = excluded.brand_names,
                text = excluded.text,
                content = excluded.content,
                source_url = excluded.source_url,
                last_updated = excluded.last_updated,
                ndc_codes = excluded.ndc_codes,
                updated_at = datetime('now')
            "#,
            params![
                doc.id,
                meta.drug_name,
                meta.generic_name,
                brand_names_json,
                meta.section.as_str(),
                doc.text,
                doc.content,
                meta.source_url,
                meta.last_updated,
                ndc_json,
            ],
        )?;
        Ok(())
    }
}

impl VectorStore for SqliteDrugStore {
    fn search(&self, query: &str, k: usize) -> StoreResult<Vec<SearchHit>> {
        let terms = search_terms(query);
        if terms.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.id, d.drug_name, d.generic_name, d.brand_names, d.section, d.text,
                   d.content, d.source_url, d.last_updated, d.ndc_codes
            FROM drug_documents d
            JOIN drug_documents_fts fts ON d.rowid = fts.rowid
            WHERE drug_documents_fts MATCH ?
            ORDER BY bm25(drug_documents_fts)
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![fts_query(&terms), k as i64], DocumentRow::from_row)?;

        let mut hits = Vec::new();
        for row in rows {
            let document: StoredDocument = row?.try_into()?;
            let distance = lexical_distance(&terms, &document.text);
            hits.push(SearchHit {
                document,
                distance: Some(distance),
            });
        }
        tracing::debug!(query, hits = hits.len(), "store search");
        Ok(hits)
    }

    fn get_by_drug_name(&self, name: &str) -> StoreResult<Vec<StoredDocument>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, drug_name, generic_name, brand_names, section, text,
                   content, source_url, last_updated, ndc_codes
            FROM drug_documents
            WHERE drug_name = ?1 COLLATE NOCASE
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([name.trim()], DocumentRow::from_row)?;

        let mut docs = Vec::new();
        for row in rows {
            docs.push(row?.try_into()?);
        }
        Ok(docs)
    }

    fn list_all_drugs(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT drug_name FROM drug_documents ORDER BY drug_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn add(&self, record: &DrugRecord) -> StoreResult<bool> {
        let documents = prepare_documents(record);
        if documents.is_empty() {
            tracing::warn!(drug = %record.name, "no content to add");
            return Ok(false);
        }

        let tx = self.conn.unchecked_transaction()?;
        for doc in &documents {
            self.upsert_document(doc)?;
        }
        tx.commit()?;

        tracing::info!(drug = %record.name, documents = documents.len(), "drug indexed");
        Ok(true)
    }
}

/// Intermediate row struct for database mapping.
struct DocumentRow {
    id: String,
    drug_name: String,
    generic_name: String,
    brand_names: String,
    section: String,
    text: String,
    content: String,
    source_url: Option<String>,
    last_updated: Option<String>,
    ndc_codes: String,
}

impl DocumentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            drug_name: row.get(1)?,
            generic_name: row.get(2)?,
            brand_names: row.get(3)?,
            section: row.get(4)?,
            text: row.get(5)?,
            content: row.get(6)?,
            source_url: row.get(7)?,
            last_updated: row.get(8)?,
            ndc_codes: row.get(9)?,
        })
    }
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let section = row
            .section
            .parse::<DrugSection>()
            .map_err(|_| StoreError::InvalidSection(row.section.clone()))?;

        Ok(StoredDocument {
            id: row.id,
            text: row.text,
            content: row.content,
            metadata: DocumentMetadata {
                drug_name: row.drug_name,
                generic_name: row.generic_name,
                brand_names: serde_json::from_str(&row.brand_names)?,
                section,
                source_url: row.source_url,
                last_updated: row.last_updated,
                ndc_codes: serde_json::from_str(&row.ndc_codes)?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ibuprofen() -> DrugRecord {
        DrugRecord {
            name: "Ibuprofen".into(),
            generic_name: "ibuprofen".into(),
            brand_names: vec!["Advil".into(), "Motrin".into()],
            description: "Ibuprofen is a nonsteroidal anti-inflammatory drug.".into(),
            adverse_reactions: "Stomach pain, heartburn, nausea and dizziness.".into(),
            dosage: "Take with food.".into(),
            source_url: Some("https://open.fda.gov/ibuprofen".into()),
            ..DrugRecord::default()
        }
    }

    fn setup_store() -> SqliteDrugStore {
        SqliteDrugStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_document_id_is_stable_and_case_insensitive() {
        let a = document_id("Ibuprofen", DrugSection::Warnings);
        let b = document_id("IBUPROFEN", DrugSection::Warnings);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, document_id("Ibuprofen", DrugSection::Dosage));
    }

    #[test]
    fn test_prepare_documents_skips_empty_sections() {
        let docs = prepare_documents(&ibuprofen());
        let sections: Vec<_> = docs.iter().map(|d| d.metadata.section).collect();
        assert_eq!(
            sections,
            vec![
                DrugSection::Description,
                DrugSection::AdverseReactions,
                DrugSection::Dosage
            ]
        );
        assert!(docs[1].text.contains("Section: Adverse Reactions"));
        assert!(docs[1].text.contains("Brand Names: Advil, Motrin"));
    }

    #[test]
    fn test_add_and_get_by_name() {
        let store = setup_store();
        assert!(store.add(&ibuprofen()).unwrap());

        let docs = store.get_by_drug_name("ibuprofen").unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].metadata.brand_names, vec!["Advil", "Motrin"]);
        assert_eq!(
            docs[0].metadata.source_url.as_deref(),
            Some("https://open.fda.gov/ibuprofen")
        );
    }

    #[test]
    fn test_add_is_upsert() {
        let store = setup_store();
        store.add(&ibuprofen()).unwrap();

        let mut updated = ibuprofen();
        updated.dosage = "Take with a full glass of water.".into();
        store.add(&updated).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.total_drugs, 1);

        let dosage = store
            .get_by_drug_name("Ibuprofen")
            .unwrap()
            .into_iter()
            .find(|d| d.metadata.section == DrugSection::Dosage)
            .unwrap();
        assert_eq!(dosage.content, "Take with a full glass of water.");
    }

    #[test]
    fn test_add_rejects_empty_record() {
        let store = setup_store();
        assert!(!store.add(&DrugRecord::new("Nothing")).unwrap());
        assert!(store.list_all_drugs().unwrap().is_empty());
    }

    #[test]
    fn test_search_ranks_matching_drug_first() {
        let store = setup_store();
        store.add(&ibuprofen()).unwrap();
        store
            .add(&DrugRecord {
                name: "Warfarin".into(),
                description: "Warfarin is an anticoagulant used to prevent blood clots.".into(),
                ..DrugRecord::default()
            })
            .unwrap();

        let hits = store.search("What are the side effects of warfarin?", 3).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document.metadata.drug_name, "Warfarin");
        // "warfarin" matches, "side" and "effects" do not
        let distance = hits[0].distance.unwrap();
        assert!((distance - 4.0 / 3.0).abs() < 1e-9, "distance {}", distance);
    }

    #[test]
    fn test_small_talk_has_no_search_terms() {
        let store = setup_store();
        store.add(&ibuprofen()).unwrap();
        assert!(search_terms("How are you?").is_empty());
        assert!(store.search("How are you?", 3).unwrap().is_empty());
        assert!(store.search("What can you tell me?", 3).unwrap().is_empty());
    }

    #[test]
    fn test_search_terms_drop_fillers_and_duplicates() {
        assert_eq!(
            search_terms("Does ibuprofen cause nausea, and does IBUPROFEN cause heartburn?"),
            vec!["ibuprofen", "cause", "nausea", "heartburn"]
        );
    }

    #[test]
    fn test_lexical_distance_scale() {
        let terms = search_terms("ibuprofen nausea heartburn dizziness");
        let text = "Stomach pain, heartburn, nausea and dizziness from Ibuprofen.";
        assert_eq!(lexical_distance(&terms, text), 0.0);
        assert_eq!(lexical_distance(&terms, "Ibuprofen relieves pain."), 1.5);
        assert_eq!(lexical_distance(&terms, "Nothing relevant."), 2.0);
        assert_eq!(lexical_distance(&[], text), 2.0);
    }

    #[test]
    fn test_search_with_no_terms() {
        let store = setup_store();
        store.add(&ibuprofen()).unwrap();
        assert!(store.search("?!", 3).unwrap().is_empty());
        assert!(store.search("zzzqqq", 3).unwrap().is_empty());
    }

    #[test]
    fn test_list_all_drugs_sorted_unique() {
        let store = setup_store();
        store.add(&ibuprofen()).unwrap();
        store
            .add(&DrugRecord {
                name: "Aspirin".into(),
                warnings: "Bleeding risk.".into(),
                ..DrugRecord::default()
            })
            .unwrap();
        assert_eq!(store.list_all_drugs().unwrap(), vec!["Aspirin", "Ibuprofen"]);
    }

    #[test]
    fn test_fts_query() {
        assert_eq!(
            fts_query(&search_terms("Is it OK with warfarin and aspirin?")),
            "\"warfarin\"* OR \"aspirin\"*"
        );
        assert_eq!(fts_query(&search_terms("a b")), "");
    }
}
