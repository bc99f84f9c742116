//! Questions that name several drugs at once.
//!
//! The parser splits such a question into one sub-question per drug and
//! merges the per-drug answers back into a single response.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Confidence, QueryResponse};
use crate::resolver::DrugNameNormalizer;

const EMPTY_RESPONSE: &str = "I couldn't find information about the requested medications.";
const EMPTY_DISCLAIMER: &str = "Please consult your healthcare provider for medication information.";
const FALLBACK_DISCLAIMER: &str = "Always consult your healthcare provider for medication information.";

/// Capitalised words of four or more letters, with any lowercase words
/// that trail them.
static CAPITALISED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]{3,}(?:\s+[a-z]+)*\b").expect("valid regex"));

/// List-like formatting: newline, comma before a capital, numbered item,
/// bullet, dash.
static LIST_FORMATTING: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"\n", r",\s*[A-Z]", r"\d+\.\s*[A-Z]", r"•\s*[A-Z]", r"-\s*[A-Z]"]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

static LEADING_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:what does?|tell me about|information about)\s+").expect("valid regex")
});
static TRAILING_DO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+do\??$").expect("valid regex"));

static NUMBERING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s*").expect("valid regex"));
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-]\s*").expect("valid regex"));
static EMOJI_CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[❤️🧪🧬]\s*.*?:").expect("valid regex"));

/// One drug's answer inside a multi-drug response.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugAnswer {
    pub drug_name: String,
    pub response: QueryResponse,
}

#[derive(Debug, Clone, Default)]
pub struct MultiDrugParser {
    normalizer: DrugNameNormalizer,
}

impl MultiDrugParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: DrugNameNormalizer) -> Self {
        Self { normalizer }
    }

    /// Three or more capitalised words, or two with list formatting.
    pub fn is_multi_drug(&self, query: &str) -> bool {
        let candidates = CAPITALISED.find_iter(query).count();
        let has_formatting = LIST_FORMATTING.iter().any(|p| p.is_match(query));
        candidates >= 3 || (candidates >= 2 && has_formatting)
    }

    /// Canonical drug names in the order they appear, without duplicates.
    pub fn extract_drug_list(&self, query: &str) -> Vec<String> {
        let cleaned = LEADING_QUESTION.replace(query, "");
        let cleaned = TRAILING_DO.replace(&cleaned, "");

        let segments: Vec<&str> = if cleaned.contains('\n') {
            split_nonempty(&cleaned, '\n')
        } else {
            [',', '•', '-']
                .into_iter()
                .find(|d| cleaned.contains(*d))
                .map(|d| split_nonempty(&cleaned, d))
                .unwrap_or_else(|| vec![cleaned.trim()])
        };

        let mut seen = HashSet::new();
        let mut drugs = Vec::new();
        for segment in segments {
            let line = NUMBERING.replace(segment, "");
            let line = BULLET.replace(&line, "");
            let line = EMOJI_CATEGORY.replace(&line, "");

            let drug = self.normalizer.extract_and_normalize(&line);
            if drug.name.chars().count() <= 2 {
                continue;
            }
            if seen.insert(drug.name.to_lowercase()) {
                drugs.push(drug.name);
            }
        }
        drugs
    }

    /// One sub-question per drug, shaped after what the original asked.
    pub fn create_individual_queries(&self, drugs: &[String], original: &str) -> Vec<String> {
        let lower = original.to_lowercase();
        let template: fn(&str) -> String = if lower.contains("side effects") {
            |d| format!("What are the side effects of {}?", d)
        } else if lower.contains("contraindications") {
            |d| format!("What are the contraindications for {}?", d)
        } else if lower.contains("uses") || lower.contains("used for") {
            |d| format!("What is {} used for?", d)
        } else if lower.contains("dosage") || lower.contains("dose") {
            |d| format!("What is the dosage for {}?", d)
        } else if lower.contains("interactions") {
            |d| format!("What are the drug interactions for {}?", d)
        } else {
            |d| format!("What does {} do?", d)
        };

        drugs.iter().map(|d| template(d)).collect()
    }

    /// Merge per-drug answers under numbered headings.
    pub fn format_combined_response(&self, answers: &[DrugAnswer], original: &str) -> QueryResponse {
        if answers.is_empty() {
            return QueryResponse::new(EMPTY_RESPONSE, Confidence::Low, EMPTY_DISCLAIMER, original);
        }

        let sections: Vec<String> = answers
            .iter()
            .enumerate()
            .map(|(i, a)| format!("## {}. {}\n\n{}", i + 1, a.drug_name, a.response.response))
            .collect();
        let body = format!(
            "Here's information about the medications you asked about:\n\n{}",
            sections.join("\n\n---\n\n")
        );

        let confidence = answers
            .iter()
            .map(|a| a.response.confidence)
            .max_by_key(Confidence::rank)
            .filter(|c| *c != Confidence::NotApplicable)
            .unwrap_or(Confidence::Low);

        let disclaimer = answers
            .iter()
            .map(|a| a.response.disclaimer.as_str())
            .find(|d| !d.is_empty())
            .unwrap_or(FALLBACK_DISCLAIMER);

        let mut combined = QueryResponse::new(body.trim(), confidence, disclaimer, original)
            .with_warning(answers.iter().any(|a| a.response.safety_warning))
            .with_sources(
                answers
                    .iter()
                    .flat_map(|a| a.response.sources.iter().cloned())
                    .collect(),
            );
        combined.multi_drug_count = Some(answers.len());
        combined
    }
}

fn split_nonempty(text: &str, delimiter: char) -> Vec<&str> {
    text.split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Source;

    fn answer(drug: &str, confidence: Confidence, warning: bool) -> DrugAnswer {
        DrugAnswer {
            drug_name: drug.to_string(),
            response: QueryResponse::new(format!("About {}.", drug), confidence, "", drug)
                .with_warning(warning)
                .with_sources(vec![Source::new(drug, "indications")]),
        }
    }

    #[test]
    fn test_newline_list_is_multi_drug() {
        let parser = MultiDrugParser::new();
        let query = "Aripiprazole\nQuetiapine\nRisperidone\nDuloxetine";
        assert!(parser.is_multi_drug(query));
        assert_eq!(
            parser.extract_drug_list(query),
            vec!["Aripiprazole", "Quetiapine", "Risperidone", "Duloxetine"]
        );
    }

    #[test]
    fn test_question_wrapped_list() {
        let parser = MultiDrugParser::new();
        let query = "what does Aripiprazole\nQuetiapine fumarate\nRisperidone\nDuloxetine hydrochloride\ndo?";
        assert!(parser.is_multi_drug(query));
        assert_eq!(
            parser.extract_drug_list(query),
            vec!["Aripiprazole", "Quetiapine", "Risperidone", "Duloxetine"]
        );
    }

    #[test]
    fn test_comma_list_normalizes_and_dedupes() {
        let parser = MultiDrugParser::new();
        let query = "Tylenol, Advil, Panadol";
        assert!(parser.is_multi_drug(query));
        assert_eq!(parser.extract_drug_list(query), vec!["Acetaminophen", "Ibuprofen"]);
    }

    #[test]
    fn test_single_drug_question_is_not_multi() {
        let parser = MultiDrugParser::new();
        assert!(!parser.is_multi_drug("What are the side effects of Ibuprofen?"));
        assert!(!parser.is_multi_drug("what is warfarin"));
    }

    #[test]
    fn test_individual_query_templates() {
        let parser = MultiDrugParser::new();
        let drugs = vec!["Aspirin".to_string(), "Warfarin".to_string()];

        assert_eq!(
            parser.create_individual_queries(&drugs, "side effects of these?"),
            vec![
                "What are the side effects of Aspirin?",
                "What are the side effects of Warfarin?"
            ]
        );
        assert_eq!(
            parser.create_individual_queries(&drugs, "what is the dose")[0],
            "What is the dosage for Aspirin?"
        );
        assert_eq!(
            parser.create_individual_queries(&drugs, "Aspirin\nWarfarin")[1],
            "What does Warfarin do?"
        );
    }

    #[test]
    fn test_combined_response() {
        let parser = MultiDrugParser::new();
        let answers = vec![
            answer("Aspirin", Confidence::Low, false),
            answer("Warfarin", Confidence::Medium, true),
        ];
        let combined = parser.format_combined_response(&answers, "Aspirin\nWarfarin");

        assert!(combined.response.starts_with("Here's information"));
        assert!(combined.response.contains("## 1. Aspirin\n\nAbout Aspirin."));
        assert!(combined.response.contains("---\n\n## 2. Warfarin"));
        assert!(!combined.response.ends_with("---"));
        assert_eq!(combined.confidence, Confidence::Medium);
        assert!(combined.safety_warning);
        assert_eq!(combined.sources.len(), 2);
        assert_eq!(combined.disclaimer, FALLBACK_DISCLAIMER);
        assert_eq!(combined.multi_drug_count, Some(2));
        assert_eq!(combined.query, "Aspirin\nWarfarin");
    }

    #[test]
    fn test_empty_combined_response() {
        let parser = MultiDrugParser::new();
        let combined = parser.format_combined_response(&[], "a, b, c");
        assert_eq!(combined.response, EMPTY_RESPONSE);
        assert_eq!(combined.confidence, Confidence::Low);
        assert!(!combined.safety_warning);
        assert_eq!(combined.multi_drug_count, None);
    }
}
