//! Drug name normalizer.
//!
//! Handles:
//! - Brand expansion (advil→ibuprofen, zoloft→sertraline)
//! - Common misspellings (ibuprofin→ibuprofen, asprin→aspirin)
//! - Picking the drug out of a free-text question
//!
//! Canonical names are title-cased generics ("Ibuprofen").

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use super::fuzzy::close_matches;

/// Brand (or common international) name → generic.
pub const BRAND_TO_GENERIC: &[(&str, &str)] = &[
    // Pain relievers
    ("advil", "ibuprofen"),
    ("motrin", "ibuprofen"),
    ("tylenol", "acetaminophen"),
    ("panadol", "acetaminophen"),
    ("excedrin", "acetaminophen"),
    ("feverall", "acetaminophen"),
    ("paracetamol", "acetaminophen"),
    ("paracetomol", "acetaminophen"),
    ("aspirin", "aspirin"),
    ("aleve", "naproxen"),
    // Blood pressure
    ("prinivil", "lisinopril"),
    ("zestril", "lisinopril"),
    ("norvasc", "amlodipine"),
    ("lopressor", "metoprolol"),
    ("toprol", "metoprolol"),
    ("cozaar", "losartan"),
    // Diabetes
    ("glucophage", "metformin"),
    ("fortamet", "metformin"),
    ("ozempic", "semaglutide"),
    ("wegovy", "semaglutide"),
    ("rybelsus", "semaglutide"),
    // Mental health
    ("zoloft", "sertraline"),
    ("lexapro", "escitalopram"),
    ("prozac", "fluoxetine"),
    ("cymbalta", "duloxetine"),
    ("wellbutrin", "bupropion"),
    ("xanax", "alprazolam"),
    ("ativan", "lorazepam"),
    ("klonopin", "clonazepam"),
    ("valium", "diazepam"),
    // Respiratory
    ("proventil", "albuterol"),
    ("ventolin", "albuterol"),
    ("singulair", "montelukast"),
    ("flovent", "fluticasone"),
    // Stomach
    ("prilosec", "omeprazole"),
    ("prevacid", "lansoprazole"),
    ("nexium", "esomeprazole"),
    ("protonix", "pantoprazole"),
    ("pepcid", "famotidine"),
    ("zantac", "ranitidine"),
    // Cholesterol
    ("lipitor", "atorvastatin"),
    ("crestor", "rosuvastatin"),
    ("zocor", "simvastatin"),
    ("pravachol", "pravastatin"),
    // Antibiotics
    ("amoxil", "amoxicillin"),
    ("augmentin", "amoxicillin"),
    ("zpack", "azithromycin"),
    ("zithromax", "azithromycin"),
    ("cipro", "ciprofloxacin"),
    ("levaquin", "levofloxacin"),
    ("keflex", "cephalexin"),
    ("bactrim", "sulfamethoxazole"),
    // Sleep
    ("ambien", "zolpidem"),
    ("lunesta", "eszopiclone"),
    ("sonata", "zaleplon"),
    // Allergy
    ("claritin", "loratadine"),
    ("zyrtec", "cetirizine"),
    ("allegra", "fexofenadine"),
    ("benadryl", "diphenhydramine"),
    // Blood thinners
    ("coumadin", "warfarin"),
    ("eliquis", "apixaban"),
    ("xarelto", "rivaroxaban"),
    ("plavix", "clopidogrel"),
    // Other
    ("synthroid", "levothyroxine"),
    ("levoxyl", "levothyroxine"),
    ("neurontin", "gabapentin"),
    ("lyrica", "pregabalin"),
    ("tramadol", "tramadol"),
    ("percocet", "oxycodone"),
    ("vicodin", "hydrocodone"),
];

/// Misspelling → generic. Identity rows mark generics as known.
pub const COMMON_MISSPELLINGS: &[(&str, &str)] = &[
    ("ibuprofin", "ibuprofen"),
    ("ibuprophen", "ibuprofen"),
    ("acetominophen", "acetaminophen"),
    ("acetaminaphen", "acetaminophen"),
    ("paracetomol", "acetaminophen"),
    ("paracetamol", "acetaminophen"),
    ("parcetamol", "acetaminophen"),
    ("lisinpril", "lisinopril"),
    ("metphormin", "metformin"),
    ("amlodapine", "amlodipine"),
    ("amlodipene", "amlodipine"),
    ("omeprazol", "omeprazole"),
    ("omeprozole", "omeprazole"),
    ("sertralin", "sertraline"),
    ("gabapenten", "gabapentin"),
    ("asprin", "aspirin"),
    ("asiprin", "aspirin"),
    ("diclofenac", "diclofenac"),
    ("naproxen", "naproxen"),
    ("ibuprofen", "ibuprofen"),
    ("lisinopril", "lisinopril"),
    ("metformin", "metformin"),
    ("sertraline", "sertraline"),
    ("gabapentin", "gabapentin"),
];

/// Words that are never taken as a drug name during pattern extraction.
const STOP_WORDS: &[&str] = &[
    "what", "does", "the", "side", "effects", "uses", "about", "is", "are", "tell", "me", "how",
    "can", "will", "should", "would", "could", "have", "that", "this", "they", "them", "with",
    "from", "take", "taking", "medication", "medicine", "drug", "pill", "tablet", "used", "help",
    "love", "like", "hate", "need", "want", "times", "day", "daily", "much", "many", "often",
    "long", "safe", "dangerous", "good", "bad",
];

const COMMAND_PREFIXES: &[&str] = &[
    "/explain",
    "/compare",
    "/interactions",
    "/dosage",
    "explain",
    "compare",
];

const DRUG_SUFFIXES: &[&str] = &["ine", "ol", "an", "il", "one", "ate", "ide"];

/// Cutoff for accepting a fuzzy match as the drug in a question.
const EXTRACTION_CUTOFF: f64 = 0.8;

/// Cutoff for "did you mean" suggestions.
const SUGGESTION_CUTOFF: f64 = 0.6;

const DEFAULT_SUGGESTION_LIMIT: usize = 3;

static WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]{3,}\b").expect("valid regex"));

/// Fallback extraction patterns, tried in order against the raw question.
static EXTRACTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:about|of|is|tell me about|what is)\s+([a-zA-Z]+)",
        r"(?i)([a-zA-Z]+)\s+(?:side effects|uses|dosage|contraindications)",
        r"(?i)(?:what does|what is)\s+([a-zA-Z]+)",
        r"(?i)(?:does|do)\s+([a-zA-Z]+)\s+(?:do|does|work)",
        r"(?i)\b([a-zA-Z]{5,})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Title-case every alphabetic run: "duloxetine HCL" → "Duloxetine Hcl".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Drug picked out of a question, plus "did you mean" alternatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDrug {
    /// Canonical name, empty when nothing drug-like was found.
    pub name: String,
    pub suggestions: Vec<String>,
}

impl NormalizedDrug {
    pub fn is_found(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Normalizer for drug names.
#[derive(Debug, Clone)]
pub struct DrugNameNormalizer {
    brand_to_generic: HashMap<String, String>,
    misspellings: HashMap<String, String>,
    /// Every brand, generic and misspelling in the tables.
    known: BTreeSet<String>,
    suggestion_limit: usize,
}

impl Default for DrugNameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrugNameNormalizer {
    /// Create a new normalizer with the default tables.
    pub fn new() -> Self {
        let brand_to_generic = to_map(BRAND_TO_GENERIC);
        let misspellings = to_map(COMMON_MISSPELLINGS);

        let known = brand_to_generic
            .iter()
            .chain(misspellings.iter())
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect();

        Self {
            brand_to_generic,
            misspellings,
            known,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Add a custom brand mapping.
    pub fn add_alias(&mut self, brand: &str, generic: &str) {
        let brand = brand.to_lowercase();
        let generic = generic.to_lowercase();
        self.known.insert(brand.clone());
        self.known.insert(generic.clone());
        self.brand_to_generic.insert(brand, generic);
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.known.contains(&word.to_lowercase())
    }

    pub fn known_drugs(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(String::as_str)
    }

    /// Convert any drug name to its canonical generic form.
    ///
    /// Unknown names pass through title-cased.
    pub fn normalize(&self, name: &str) -> String {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let cleaned: String = trimmed
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();

        if let Some(generic) = self.brand_to_generic.get(&cleaned) {
            return title_case(generic);
        }
        if let Some(generic) = self.misspellings.get(&cleaned) {
            return title_case(generic);
        }

        title_case(trimmed)
    }

    /// Close known names for a possibly misspelled one, normalized and de-duplicated.
    pub fn suggest_corrections(&self, name: &str, limit: usize) -> Vec<String> {
        let cleaned = name.trim().to_lowercase();
        if cleaned.is_empty() {
            return Vec::new();
        }

        let mut suggestions: Vec<String> = Vec::new();
        for candidate in close_matches(&cleaned, self.known_drugs(), limit, SUGGESTION_CUTOFF) {
            let normalized = self.normalize(candidate);
            if !suggestions.contains(&normalized) {
                suggestions.push(normalized);
            }
        }
        suggestions.truncate(limit);
        suggestions
    }

    /// Pick the drug a free-text question is about.
    ///
    /// Tries, in order: an exact known word, a fuzzy match of a word of four
    /// or more letters, then the fallback extraction patterns.
    pub fn extract_and_normalize(&self, text: &str) -> NormalizedDrug {
        let lowered = text.trim().to_lowercase();
        let cleaned = COMMAND_PREFIXES
            .iter()
            .find_map(|prefix| lowered.strip_prefix(prefix))
            .map(str::trim)
            .unwrap_or(lowered.as_str());

        let words: Vec<&str> = WORDS.find_iter(cleaned).map(|m| m.as_str()).collect();

        if let Some(word) = words.iter().find(|w| self.known.contains(**w)) {
            return self.found(word, word);
        }

        for word in words.iter().filter(|w| w.len() >= 4) {
            if let Some(best) = close_matches(word, self.known_drugs(), 1, EXTRACTION_CUTOFF)
                .first()
            {
                return self.found(best, word);
            }
        }

        for pattern in EXTRACTION_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                let candidate = m.as_str().trim();
                let lower = candidate.to_lowercase();
                if STOP_WORDS.contains(&lower.as_str()) || lower.len() < 4 {
                    continue;
                }
                if self.is_valid_drug_name(&lower) {
                    return self.found(candidate, candidate);
                }
            }
        }

        NormalizedDrug::default()
    }

    /// Whether a word looks like a drug name.
    pub fn is_valid_drug_name(&self, name: &str) -> bool {
        let cleaned = name.trim().to_lowercase();
        if cleaned.len() < 3 {
            return false;
        }
        if self.known.contains(&cleaned) {
            return true;
        }
        if DRUG_SUFFIXES.iter().any(|s| cleaned.ends_with(s)) {
            return true;
        }
        cleaned.len() >= 6 && cleaned.chars().all(|c| c.is_alphabetic())
    }

    fn found(&self, name: &str, typed: &str) -> NormalizedDrug {
        NormalizedDrug {
            name: self.normalize(name),
            suggestions: self.suggest_corrections(typed, self.suggestion_limit),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
