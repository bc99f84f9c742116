//! On-disk drug store tests.

use medexplain_core::models::DrugSection;
use medexplain_core::store::document_id;
use medexplain_core::{DrugRecord, SqliteDrugStore, VectorStore};
use tempfile::TempDir;

fn naproxen() -> DrugRecord {
    DrugRecord {
        name: "Naproxen".into(),
        generic_name: "naproxen".into(),
        brand_names: vec!["Aleve".into()],
        description: "Naproxen relieves pain from arthritis and menstrual cramps.".into(),
        warnings: "Naproxen can raise the chance of stomach bleeding.".into(),
        dosage: "Take naproxen with a full glass of water.".into(),
        source_url: Some("https://open.fda.gov/naproxen".into()),
        last_updated: Some("2024-05-01".into()),
        ndc_codes: vec!["0280-6000".into()],
        ..DrugRecord::default()
    }
}

#[test]
fn test_documents_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drugs.db");

    {
        let store = SqliteDrugStore::open(&path).unwrap();
        assert!(store.add(&naproxen()).unwrap());
    }

    let store = SqliteDrugStore::open(&path).unwrap();
    let stats = store.stats().unwrap();
    assert_eq!(stats.total_documents, 3);
    assert_eq!(stats.total_drugs, 1);

    let docs = store.get_by_drug_name("NAPROXEN").unwrap();
    assert_eq!(docs.len(), 3);
    let warnings = docs
        .iter()
        .find(|d| d.metadata.section == DrugSection::Warnings)
        .unwrap();
    assert_eq!(warnings.id, document_id("Naproxen", DrugSection::Warnings));
    assert_eq!(warnings.metadata.brand_names, vec!["Aleve"]);
    assert_eq!(warnings.metadata.ndc_codes, vec!["0280-6000"]);
    assert_eq!(warnings.metadata.last_updated.as_deref(), Some("2024-05-01"));
    assert!(warnings.text.starts_with("Drug Name: Naproxen\nGeneric Name: naproxen\nBrand Names: Aleve\nSection: Warnings"));
}

#[test]
fn test_search_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drugs.db");

    SqliteDrugStore::open(&path).unwrap().add(&naproxen()).unwrap();

    let store = SqliteDrugStore::open(&path).unwrap();
    let hits = store.search("does naproxen cause bleeding?", 3).unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].document.metadata.section, DrugSection::Warnings);

    // Warnings holds "naproxen" and "bleeding"; the other sections only the name
    let best = hits[0].distance.unwrap();
    assert!((best - 2.0 / 3.0).abs() < 1e-9, "distance {}", best);
    for hit in &hits[1..] {
        let distance = hit.distance.unwrap();
        assert!(distance > best && distance <= 2.0, "distance {}", distance);
    }
}

#[test]
fn test_readding_replaces_content() {
    let dir = TempDir::new().unwrap();
    let store = SqliteDrugStore::open(dir.path().join("drugs.db")).unwrap();

    store.add(&naproxen()).unwrap();
    let mut updated = naproxen();
    updated.warnings = "Naproxen may cause kidney problems.".into();
    store.add(&updated).unwrap();

    assert_eq!(store.stats().unwrap().total_documents, 3);
    assert!(store.search("bleeding", 5).unwrap().is_empty());
    assert_eq!(store.search("kidney", 5).unwrap().len(), 1);
}
