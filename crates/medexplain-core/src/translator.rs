//! Plain-English rewriting of medical answers.
//!
//! A jargon dictionary handles the common terms. When enough specialist
//! vocabulary survives the dictionary pass, an optional [`TextGenerator`]
//! is asked for a full rewrite.

use std::collections::{BTreeMap, HashMap};

use medexplain_llm::{build_translation_prompt, clean_completion, TextGenerator};
use once_cell::sync::Lazy;
use regex::Regex;

/// Jargon → plain wording. Keys are lowercase; no value contains a key.
pub const JARGON: &[(&str, &str)] = &[
    // common terms
    ("contraindication", "reason not to use"),
    ("contraindications", "reasons not to use"),
    ("adverse effects", "side effects"),
    ("adverse reactions", "bad reactions"),
    ("hypersensitivity", "allergic reaction"),
    ("anaphylaxis", "severe allergic reaction"),
    ("hepatotoxicity", "liver damage"),
    ("nephrotoxicity", "kidney damage"),
    ("cardiotoxicity", "heart damage"),
    ("myocardial infarction", "heart attack"),
    ("cerebrovascular accident", "stroke"),
    ("hypertension", "high blood pressure"),
    ("hypotension", "low blood pressure"),
    ("bradycardia", "slow heart rate"),
    ("tachycardia", "fast heart rate"),
    ("arrhythmia", "irregular heartbeat"),
    ("dyspnea", "difficulty breathing"),
    ("nausea", "feeling sick to your stomach"),
    ("emesis", "vomiting"),
    ("diarrhea", "loose stools"),
    ("constipation", "difficulty having bowel movements"),
    ("somnolence", "drowsiness"),
    ("insomnia", "trouble sleeping"),
    ("vertigo", "dizziness"),
    ("syncope", "fainting"),
    ("tremor", "shaking"),
    ("seizure", "convulsion"),
    ("edema", "swelling"),
    ("pruritus", "itching"),
    ("rash", "skin irritation"),
    ("urticaria", "hives"),
    ("photosensitivity", "increased sensitivity to sunlight"),
    ("xerostomia", "dry mouth"),
    // dosing
    ("orally", "by mouth"),
    ("sublingually", "under the tongue"),
    ("topically", "on the skin"),
    ("intramuscularly", "injected into muscle"),
    ("intravenously", "injected into vein"),
    ("subcutaneously", "injected under skin"),
    ("bid", "twice daily"),
    ("tid", "three times daily"),
    ("qid", "four times daily"),
    ("qd", "once daily"),
    ("prn", "as needed"),
    ("po", "by mouth"),
    ("mg", "milligrams"),
    ("mcg", "micrograms"),
    ("ml", "milliliters"),
    ("capsule", "pill"),
    ("tablet", "pill"),
    // conditions
    ("diabetes mellitus", "diabetes"),
    ("gastroesophageal reflux", "acid reflux"),
    ("rhinitis", "runny nose"),
    ("conjunctivitis", "pink eye"),
    ("dermatitis", "skin inflammation"),
    ("arthritis", "joint inflammation"),
    ("bronchitis", "chest infection"),
    ("pneumonia", "lung infection"),
    ("gastritis", "stomach inflammation"),
    ("hepatitis", "liver inflammation"),
    ("nephritis", "kidney inflammation"),
    // pharmacology
    ("bioavailability", "how much gets into your body"),
    ("half-life", "how long it stays in your body"),
    ("metabolism", "how your body processes it"),
    ("excretion", "how your body gets rid of it"),
    ("absorption", "how it gets into your body"),
    ("distribution", "how it spreads through your body"),
    ("therapeutic", "helpful for treatment"),
    ("prophylactic", "preventive"),
    ("analgesic", "pain reliever"),
    ("antipyretic", "fever reducer"),
    ("anti-inflammatory", "reduces swelling"),
    ("antihistamine", "allergy medicine"),
    ("antibiotic", "infection fighter"),
    ("antiviral", "virus fighter"),
    ("antifungal", "fungus fighter"),
    ("diuretic", "water pill"),
    ("laxative", "helps with bowel movements"),
    ("antiemetic", "anti-sickness medicine"),
    ("sedative", "calming medicine"),
    ("stimulant", "energizing medicine"),
    // body systems
    ("cardiovascular", "heart and blood vessels"),
    ("respiratory", "breathing system"),
    ("gastrointestinal", "stomach and intestines"),
    ("genitourinary", "urinary and reproductive systems"),
    ("musculoskeletal", "muscles and bones"),
    ("neurological", "nervous system"),
    ("dermatological", "skin-related"),
    ("ophthalmological", "eye-related"),
    ("otic", "ear-related"),
    // phrases
    ("monitor hepatic function", "check liver health"),
    ("renal impairment", "kidney problems"),
    ("cardiac function", "heart health"),
    ("laboratory values", "blood test results"),
    ("clinical trials", "medical research studies"),
    ("placebo-controlled", "compared to fake medicine"),
    ("double-blind", "neither patient nor doctor knew which treatment"),
    ("randomized", "patients randomly assigned to treatments"),
];

/// Patterns that suggest specialist language the dictionary did not cover.
const COMPLEX_PATTERNS: &[&str] = &[
    r"\b\w+ology\b",
    r"\b\w+itis\b",
    r"\b\w+osis\b",
    r"\b\w+pathy\b",
    r"\b\w+trophy\b",
    r"\b\w+genic\b",
    r"\b\w+static\b",
    r"\bmcg/kg\b",
    r"\bμg/ml\b",
    r"\bCYP\d+\b",
];

/// More complex terms than this and the generator is asked for a rewrite.
pub const COMPLEX_TERM_THRESHOLD: usize = 2;

static JARGON_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| JARGON.iter().copied().collect());

/// One alternation, longest terms first, so every position is rewritten at
/// most once.
static JARGON_RE: Lazy<Regex> = Lazy::new(|| {
    let mut terms: Vec<&str> = JARGON.iter().map(|(term, _)| *term).collect();
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("valid regex")
});

static COMPLEX: Lazy<Vec<Regex>> = Lazy::new(|| {
    COMPLEX_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("valid regex"))
        .collect()
});

/// Number of specialist-looking terms in `text`.
pub fn complex_term_count(text: &str) -> usize {
    COMPLEX.iter().map(|re| re.find_iter(text).count()).sum()
}

#[derive(Clone, Copy, Default)]
pub struct PlainEnglishTranslator<'a> {
    generator: Option<&'a dyn TextGenerator>,
}

impl<'a> PlainEnglishTranslator<'a> {
    /// Dictionary-only translator.
    pub fn new() -> Self {
        Self { generator: None }
    }

    pub fn with_generator(generator: &'a dyn TextGenerator) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Rewrite `text` for a lay reader.
    ///
    /// Never fails: a generator error falls back to the dictionary result.
    pub fn translate(&self, text: &str) -> String {
        let simplified = self.dictionary_translate(text);

        let Some(generator) = self.generator else {
            return simplified;
        };

        let complex = complex_term_count(&simplified);
        if complex <= COMPLEX_TERM_THRESHOLD {
            return simplified;
        }

        tracing::debug!(complex, "requesting plain-English rewrite");
        let prompt = build_translation_prompt(&simplified);
        match generator
            .complete(&prompt)
            .and_then(|raw| clean_completion(&raw))
        {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::warn!(error = %e, "plain-English rewrite failed, keeping dictionary translation");
                simplified
            }
        }
    }

    /// Whole-word, case-insensitive jargon substitution.
    pub fn dictionary_translate(&self, text: &str) -> String {
        JARGON_RE
            .replace_all(text, |caps: &regex::Captures| {
                let matched = caps[0].to_lowercase();
                JARGON_MAP
                    .get(matched.as_str())
                    .map(|plain| plain.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Jargon terms present in `text` and what they would become.
    pub fn translation_preview(&self, text: &str) -> BTreeMap<&'static str, &'static str> {
        JARGON_RE
            .find_iter(text)
            .filter_map(|m| {
                let lowered = m.as_str().to_lowercase();
                JARGON_MAP.get_key_value(lowered.as_str()).map(|(k, v)| (*k, *v))
            })
            .collect()
    }
}
