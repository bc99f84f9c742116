//! Safety gate for incoming questions.
//!
//! Questions are classified against ordered `(pattern, kind)` tables; the
//! first matching rule wins. Unsafe kinds (dangerous, emergency, diagnosis)
//! are checked before the safe sub-types, in that priority order.

mod disclaimer;

pub use disclaimer::*;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{QueryKind, SafetyVerdict};

/// Rules that stop a question before retrieval, highest priority first.
const UNSAFE_RULES: &[(&str, QueryKind)] = &[
    (r"how much .* to (die|kill|overdose)", QueryKind::Dangerous),
    (r"lethal dose", QueryKind::Dangerous),
    (r"suicide", QueryKind::Dangerous),
    (r"self harm", QueryKind::Dangerous),
    (r"how to get high", QueryKind::Dangerous),
    (r"recreational use", QueryKind::Dangerous),
    (r"abuse", QueryKind::Dangerous),
    (r"illegal", QueryKind::Dangerous),
    (r"overdose", QueryKind::Emergency),
    (r"poisoning", QueryKind::Emergency),
    (r"emergency", QueryKind::Emergency),
    (r"urgent", QueryKind::Emergency),
    (r"severe reaction", QueryKind::Emergency),
    (r"allergic reaction", QueryKind::Emergency),
    (r"cant breathe", QueryKind::Emergency),
    (r"chest pain", QueryKind::Emergency),
    (r"heart attack", QueryKind::Emergency),
    (r"stroke", QueryKind::Emergency),
    (r"do i have", QueryKind::Diagnosis),
    (r"am i sick", QueryKind::Diagnosis),
    (r"what's wrong with me", QueryKind::Diagnosis),
    (r"diagnose", QueryKind::Diagnosis),
    (r"what disease", QueryKind::Diagnosis),
    (r"what condition", QueryKind::Diagnosis),
];

/// Sub-type rules for questions that passed the gate.
const SAFE_RULES: &[(&str, QueryKind)] = &[
    (r"how much .* should i take", QueryKind::Dosage),
    (r"what dose", QueryKind::Dosage),
    (r"dosage for", QueryKind::Dosage),
    (r"how many pills", QueryKind::Dosage),
    (r"mg per day", QueryKind::Dosage),
    (r"frequency", QueryKind::Dosage),
    (r"how often", QueryKind::Dosage),
    (r"side effect", QueryKind::SideEffects),
    (r"adverse", QueryKind::SideEffects),
    (r"reaction", QueryKind::SideEffects),
    (r"interaction", QueryKind::Interactions),
    (r"combine", QueryKind::Interactions),
    (r"together", QueryKind::Interactions),
    (r"contraindication", QueryKind::Contraindications),
    (r"should not", QueryKind::Contraindications),
    (r"avoid", QueryKind::Contraindications),
];

static COMPILED_UNSAFE: Lazy<Vec<(Regex, QueryKind)>> = Lazy::new(|| compile(UNSAFE_RULES));
static COMPILED_SAFE: Lazy<Vec<(Regex, QueryKind)>> = Lazy::new(|| compile(SAFE_RULES));

fn compile(rules: &[(&str, QueryKind)]) -> Vec<(Regex, QueryKind)> {
    rules
        .iter()
        .map(|(pattern, kind)| {
            let regex = Regex::new(&format!("(?i){}", pattern)).expect("valid regex");
            (regex, *kind)
        })
        .collect()
}

const DANGEROUS_MESSAGE: &str = "I cannot and will not provide information that could be used for self-harm or illegal purposes.

If you're having thoughts of self-harm, please reach out for help:
• National Suicide Prevention Lifeline: 988
• Crisis Text Line: Text HOME to 741741
• Emergency Services: 911

For legitimate medical questions, please consult with a healthcare professional or rephrase your question to focus on general drug information.";

const EMERGENCY_MESSAGE: &str = "⚠️ MEDICAL EMERGENCY WARNING ⚠️

If this is a medical emergency:
• Call 911 immediately
• Contact Poison Control: 1-800-222-1222
• Go to your nearest emergency room

I cannot provide emergency medical advice. This appears to be an urgent situation that requires immediate professional medical attention.

For non-emergency questions about medications, I'm here to help with general drug information from FDA sources.";

const DIAGNOSIS_MESSAGE: &str = "I cannot provide medical diagnoses or determine what medical conditions you may have. Only qualified healthcare professionals can diagnose medical conditions through proper examination and testing.

If you have health concerns:
• Consult your doctor or healthcare provider
• Call a nurse hotline if available through your insurance
• Visit an urgent care center for non-emergency concerns
• Go to the emergency room for serious symptoms

I can help you understand general information about medications and their FDA-approved uses, but this should not be used for self-diagnosis.";

const SAFE_MESSAGE: &str = "Query is safe to process";

/// Classifies questions and blocks the ones that must not be answered.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyFilter;

impl SafetyFilter {
    pub fn new() -> Self {
        Self
    }

    /// Classify a question. Never fails; unmatched safe questions are `GeneralInfo`.
    pub fn check(&self, query: &str) -> SafetyVerdict {
        if let Some(kind) = first_match(&COMPILED_UNSAFE, query) {
            let (message, confidence) = match kind {
                QueryKind::Dangerous => (DANGEROUS_MESSAGE, 0.95),
                QueryKind::Emergency => (EMERGENCY_MESSAGE, 0.90),
                _ => (DIAGNOSIS_MESSAGE, 0.85),
            };
            tracing::warn!(kind = kind.as_str(), "question blocked by safety filter");
            return SafetyVerdict {
                is_safe: false,
                kind,
                message: message.to_string(),
                confidence,
            };
        }

        SafetyVerdict {
            is_safe: true,
            kind: self.classify_safe(query),
            message: SAFE_MESSAGE.to_string(),
            confidence: 0.80,
        }
    }

    /// Kind of a question without logging or building a verdict.
    pub fn classify(&self, query: &str) -> QueryKind {
        first_match(&COMPILED_UNSAFE, query).unwrap_or_else(|| self.classify_safe(query))
    }

    /// Sub-type of a question already known to be safe.
    pub fn classify_safe(&self, query: &str) -> QueryKind {
        first_match(&COMPILED_SAFE, query).unwrap_or(QueryKind::GeneralInfo)
    }
}

fn first_match(rules: &[(Regex, QueryKind)], query: &str) -> Option<QueryKind> {
    rules
        .iter()
        .find(|(regex, _)| regex.is_match(query))
        .map(|(_, kind)| *kind)
}
