//! Two-drug interaction question detection.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::context::{ConversationContext, NON_DRUG_WORDS};
use crate::resolver::{title_case, DrugNameNormalizer};

/// Standalone "X with Y" shapes, tried in order against the lowercased
/// question with trailing punctuation removed.
const PAIR_PATTERNS: &[&str] = &[
    r"can i take (.+?) with (.+)$",
    r"(.+?) and (.+?) together",
    r"(.+?) with (.+?) interaction",
    r"combining (.+?) and (.+)$",
    r"take (.+?) and (.+)$",
    r"(.+?) and (.+?) safe",
    r"mix (.+?) with (.+)$",
    r"use (.+?) with (.+)$",
    r"is it (?:safe|okay) to (?:take|use) (.+?) (?:with|and) (.+)$",
    r"(?:can|should) i (?:combine|mix) (.+?) (?:with|and) (.+)$",
    r"what about (.+?) (?:with|and) (.+)$",
];

const NOISE_WORDS: &[&str] = &["the", "a", "an", "my", "some", "any"];

static PAIRS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PAIR_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

/// Finds the two drugs an interaction question is about, using the
/// conversation context for follow-ups like "what about with aspirin?".
#[derive(Debug, Clone, Default)]
pub struct SmartInteractionDetector {
    normalizer: DrugNameNormalizer,
}

impl SmartInteractionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detect(
        &self,
        query: &str,
        context: &mut ConversationContext,
        add_to_context: bool,
    ) -> Option<(String, String)> {
        self.detect_at(query, context, add_to_context, Utc::now())
    }

    /// Follow-up resolution first, then standalone pair patterns.
    ///
    /// A resolved pair is recorded in the context when `add_to_context` is set:
    /// only the new drug for a follow-up, both drugs for a standalone pair.
    pub fn detect_at(
        &self,
        query: &str,
        context: &mut ConversationContext,
        add_to_context: bool,
        now: DateTime<Utc>,
    ) -> Option<(String, String)> {
        if let Some((primary, secondary)) = context.extract_followup_interaction_at(query, now) {
            let secondary = self.normalizer.normalize(&secondary);
            if add_to_context {
                context.add_mention_at(&secondary, now);
            }
            tracing::debug!(%primary, %secondary, "follow-up interaction resolved");
            return Some((primary, secondary));
        }

        let lowered = query.trim().to_lowercase();
        let cleaned = lowered.trim_end_matches(|c: char| c == '?' || c == '!' || c == '.' || c.is_whitespace());

        for pattern in PAIRS.iter() {
            let Some(caps) = pattern.captures(cleaned) else {
                continue;
            };
            let (Some(first), Some(second)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            let (Some(drug1), Some(drug2)) = (
                self.resolve(first.as_str()),
                self.resolve(second.as_str()),
            ) else {
                continue;
            };

            if add_to_context {
                context.add_mention_at(&drug1, now);
                context.add_mention_at(&drug2, now);
            }
            return Some((drug1, drug2));
        }

        None
    }

    /// Clarification prompt when a follow-up could not be resolved.
    pub fn context_suggestion(&self, query: &str, context: &ConversationContext) -> Option<String> {
        let now = Utc::now();
        context
            .is_followup_at(query, now)
            .then(|| context.suggest_clarification_at(now))
    }

    /// Turn a captured phrase into a canonical drug name, or `None` when it
    /// does not look like a drug ("a cold", "drive").
    fn resolve(&self, phrase: &str) -> Option<String> {
        let cleaned = phrase
            .split_whitespace()
            .filter(|w| !NOISE_WORDS.contains(w))
            .collect::<Vec<_>>()
            .join(" ");

        if cleaned.chars().count() <= 2 || NON_DRUG_WORDS.contains(&cleaned.as_str()) {
            return None;
        }

        let drug = self.normalizer.extract_and_normalize(&cleaned);
        if drug.is_found() {
            Some(drug.name)
        } else if self.normalizer.is_valid_drug_name(&cleaned) {
            Some(title_case(&cleaned))
        } else {
            None
        }
    }
}
