//! SQLite schema definition.

/// Drug document schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Drug Documents (one row per drug label section)
-- ============================================================================

CREATE TABLE IF NOT EXISTS drug_documents (
    id TEXT PRIMARY KEY,                          -- sha256 of lower(drug) || '_' || section
    drug_name TEXT NOT NULL,
    generic_name TEXT NOT NULL DEFAULT '',
    brand_names TEXT NOT NULL DEFAULT '[]',       -- JSON array of strings
    section TEXT NOT NULL,
    text TEXT NOT NULL,                           -- header + content, the searchable form
    content TEXT NOT NULL,
    source_url TEXT,
    last_updated TEXT,
    ndc_codes TEXT NOT NULL DEFAULT '[]',         -- JSON array of strings
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_documents_drug ON drug_documents(drug_name COLLATE NOCASE);

-- FTS5 virtual table for full-text search
CREATE VIRTUAL TABLE IF NOT EXISTS drug_documents_fts USING fts5(
    drug_name,
    text,
    content='drug_documents',
    content_rowid='rowid'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS drug_documents_ai AFTER INSERT ON drug_documents BEGIN
    INSERT INTO drug_documents_fts(rowid, drug_name, text)
    VALUES (new.rowid, new.drug_name, new.text);
END;

CREATE TRIGGER IF NOT EXISTS drug_documents_ad AFTER DELETE ON drug_documents BEGIN
    INSERT INTO drug_documents_fts(drug_documents_fts, rowid, drug_name, text)
    VALUES ('delete', old.rowid, old.drug_name, old.text);
END;

CREATE TRIGGER IF NOT EXISTS drug_documents_au AFTER UPDATE ON drug_documents BEGIN
    INSERT INTO drug_documents_fts(drug_documents_fts, rowid, drug_name, text)
    VALUES ('delete', old.rowid, old.drug_name, old.text);
    INSERT INTO drug_documents_fts(rowid, drug_name, text)
    VALUES (new.rowid, new.drug_name, new.text);
END;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_fts_trigger() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO drug_documents (id, drug_name, section, text, content) VALUES (?, ?, ?, ?, ?)",
            [
                "doc1",
                "Ibuprofen",
                "warnings",
                "Drug Name: Ibuprofen\nSection: Warnings\n\nStomach bleeding may occur.",
                "Stomach bleeding may occur.",
            ],
        )
        .unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM drug_documents_fts WHERE drug_documents_fts MATCH 'bleeding'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);

        // Updates replace the indexed text
        conn.execute(
            "UPDATE drug_documents SET text = 'Drug Name: Ibuprofen\nSection: Warnings\n\nRash.' WHERE id = 'doc1'",
            [],
        )
        .unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM drug_documents_fts WHERE drug_documents_fts MATCH 'bleeding'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }
}
