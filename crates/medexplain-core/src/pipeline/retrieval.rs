//! Relevance filtering, prompt context assembly and confidence scoring.

use crate::config::PipelineConfig;
use crate::models::{Confidence, SearchHit, Source};

/// Distance assumed for hits the store returned without one.
const MISSING_DISTANCE: f64 = 1.0;

/// Keep hits close enough to the question.
///
/// When a drug was recognised, a hit must also be about that drug (either
/// name containing the other).
pub fn filter_relevant(hits: Vec<SearchHit>, drug: &str, config: &PipelineConfig) -> Vec<SearchHit> {
    let wanted = drug.trim().to_lowercase();

    hits.into_iter()
        .filter(|hit| {
            let distance = hit.distance.unwrap_or(MISSING_DISTANCE);
            if wanted.is_empty() {
                return distance < config.unknown_drug_max_distance;
            }
            let found = hit.document.metadata.drug_name.to_lowercase();
            let same_drug =
                !found.is_empty() && (found.contains(&wanted) || wanted.contains(&found));
            distance < config.known_drug_max_distance && same_drug
        })
        .collect()
}

/// Numbered source blocks for the answer prompt.
pub fn build_context(hits: &[SearchHit], max_chars: usize) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let doc = &hit.document;
            format!(
                "SOURCE {}:\nDrug: {}\nSection: {}\n\nContent:\n{}\n---",
                i + 1,
                doc.metadata.drug_name,
                doc.metadata.section.title(),
                truncate(&doc.text, max_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...(truncated)", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn sources_from_hits(hits: &[SearchHit]) -> Vec<Source> {
    hits.iter()
        .map(|hit| {
            let meta = &hit.document.metadata;
            Source {
                drug: meta.drug_name.clone(),
                section: meta.section.title().to_string(),
                url: meta.source_url.clone(),
                last_updated: meta.last_updated.clone(),
            }
        })
        .collect()
}

/// More sources and more context text earn more confidence.
pub fn confidence_for(source_count: usize, context_chars: usize) -> Confidence {
    match (source_count, context_chars) {
        (n, len) if n >= 3 && len > 500 => Confidence::High,
        (n, len) if n >= 2 && len > 200 => Confidence::Medium,
        _ => Confidence::Low,
    }
}
