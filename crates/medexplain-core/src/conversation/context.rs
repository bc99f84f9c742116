//! Recent-drug memory for elliptical follow-up questions.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolver::title_case;

pub const DEFAULT_CONTEXT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_CONTEXT_CAPACITY: usize = 3;

/// Phrases that refer back to an earlier drug ("can i take it with ...").
const FOLLOWUP_PATTERNS: &[&str] = &[
    r"can i take it with",
    r"take it together with",
    r"combine it with",
    r"mix it with",
    r"use it with",
    r"can i take this with",
    r"take this together with",
    r"combine this with",
    r"mix this with",
    r"can i take that with",
    r"take that together with",
    r"combine that with",
    r"^with ",
    r"together with",
    r"along with",
    r"what about with",
    r"what about",
    r"how about with",
    r"how about",
    r"and with",
];

/// Second-drug extractors for follow-ups, tried in order.
const SECONDARY_DRUG_PATTERNS: &[&str] = &[
    r"(?:with|and|together with|along with)\s+([a-zA-Z]+)",
    r"(?:take it|take this|take that)\s+(?:with|and)\s+([a-zA-Z]+)",
    r"(?:combine it|combine this|combine that)\s+(?:with|and)\s+([a-zA-Z]+)",
    r"(?:what about|how about)\s+(?:with|and)\s+([a-zA-Z]+)",
    r"(?:what about|how about)\s+([a-zA-Z]+)",
];

/// Words that follow "with"/"and" but are not drugs.
pub const NON_DRUG_WORDS: &[&str] = &[
    "food", "water", "milk", "alcohol", "coffee", "tea", "other", "another", "something",
    "anything", "nothing", "me", "you", "it", "this", "that", "them", "they", "the", "a", "an",
    "my", "your", "some", "any", "with", "and",
];

static FOLLOWUPS: Lazy<Vec<Regex>> = Lazy::new(|| compile(FOLLOWUP_PATTERNS));
static SECONDARY: Lazy<Vec<Regex>> = Lazy::new(|| compile(SECONDARY_DRUG_PATTERNS));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// Drugs mentioned recently in one conversation, most recent first.
///
/// Expiry is lazy: entries are kept until [`clear`](Self::clear) but every
/// read treats the context as empty once the last mention is older than the
/// timeout.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    recent_drugs: Vec<String>,
    last_mention: Option<DateTime<Utc>>,
    timeout_secs: u64,
    capacity: usize,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CONTEXT_TIMEOUT_SECS, DEFAULT_CONTEXT_CAPACITY)
    }

    pub fn with_limits(timeout_secs: u64, capacity: usize) -> Self {
        Self {
            recent_drugs: Vec::new(),
            last_mention: None,
            timeout_secs,
            capacity: capacity.max(1),
        }
    }

    pub fn add_mention(&mut self, drug: &str) {
        self.add_mention_at(drug, Utc::now());
    }

    /// Record a drug as the most recent mention. Names of two characters or
    /// fewer are ignored.
    pub fn add_mention_at(&mut self, drug: &str, now: DateTime<Utc>) {
        let trimmed = drug.trim();
        if trimmed.chars().count() <= 2 {
            return;
        }

        let cleaned = title_case(trimmed);
        self.recent_drugs
            .retain(|d| !d.eq_ignore_ascii_case(&cleaned));
        self.recent_drugs.insert(0, cleaned);
        self.recent_drugs.truncate(self.capacity);
        self.last_mention = Some(now);
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.last_mention {
            Some(last) if !self.recent_drugs.is_empty() => {
                let elapsed_ms = (now - last).num_milliseconds();
                elapsed_ms < (self.timeout_secs as i64).saturating_mul(1000)
            }
            _ => false,
        }
    }

    pub fn recent_drugs(&self) -> Vec<String> {
        self.recent_drugs_at(Utc::now())
    }

    pub fn recent_drugs_at(&self, now: DateTime<Utc>) -> Vec<String> {
        if self.is_active_at(now) {
            self.recent_drugs.clone()
        } else {
            Vec::new()
        }
    }

    pub fn last_mention(&self) -> Option<DateTime<Utc>> {
        self.last_mention
    }

    pub fn clear(&mut self) {
        self.recent_drugs.clear();
        self.last_mention = None;
    }

    pub fn is_followup(&self, query: &str) -> bool {
        self.is_followup_at(query, Utc::now())
    }

    /// Whether `query` refers back to an earlier drug in a live context.
    pub fn is_followup_at(&self, query: &str, now: DateTime<Utc>) -> bool {
        if !self.is_active_at(now) {
            return false;
        }
        let lower = query.trim().to_lowercase();
        FOLLOWUPS.iter().any(|p| p.is_match(&lower))
    }

    pub fn extract_followup_interaction(&self, query: &str) -> Option<(String, String)> {
        self.extract_followup_interaction_at(query, Utc::now())
    }

    /// Pair the most recent drug with the new one named in a follow-up.
    pub fn extract_followup_interaction_at(
        &self,
        query: &str,
        now: DateTime<Utc>,
    ) -> Option<(String, String)> {
        if !self.is_followup_at(query, now) {
            return None;
        }
        let primary = self.recent_drugs.first()?.clone();
        let secondary = secondary_drug(&query.trim().to_lowercase())?;
        Some((primary, secondary))
    }

    pub fn suggest_clarification(&self) -> String {
        self.suggest_clarification_at(Utc::now())
    }

    /// Prompt for an ambiguous follow-up, listing what was discussed.
    pub fn suggest_clarification_at(&self, now: DateTime<Utc>) -> String {
        let recent = self.recent_drugs_at(now);
        match recent.as_slice() {
            [] => "I'd be happy to help with drug interactions! Could you specify which medications you'd like to ask about?".to_string(),
            [only] => format!(
                "Did you mean: Can I take {} with the medication you asked about?",
                only
            ),
            [init @ .., last] => format!(
                "Which medication did you mean? Recently we discussed: {}, or {}",
                init.join(", "),
                last
            ),
        }
    }
}

fn secondary_drug(query: &str) -> Option<String> {
    SECONDARY.iter().find_map(|pattern| {
        let candidate = pattern.captures(query)?.get(1)?.as_str().trim();
        let lower = candidate.to_lowercase();
        if NON_DRUG_WORDS.contains(&lower.as_str()) || candidate.len() < 3 {
            return None;
        }
        Some(title_case(candidate))
    })
}
