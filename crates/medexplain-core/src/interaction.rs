//! Drug pair interaction lookup.
//!
//! Three static tables are consulted in order: known-safe pairs,
//! known-problematic pairs, then pharmacological class pairs. Every pair
//! table is stored under both orderings, so lookups are order independent.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::Confidence;

/// How worried the caller should be about a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionSeverity {
    Safe,
    Caution,
    Monitor,
    Unknown,
}

impl InteractionSeverity {
    pub fn needs_warning(&self) -> bool {
        matches!(self, Self::Caution | Self::Monitor)
    }

    fn advice(&self) -> &'static str {
        match self {
            Self::Safe => "You can take these medications as directed by your doctor or the package instructions.",
            Self::Caution => "Consult your doctor or pharmacist before combining these medications, especially if you have other health conditions.",
            Self::Monitor => "Regular monitoring may be needed when taking these together. Keep track of any new symptoms.",
            Self::Unknown => "Always consult with your doctor or pharmacist before combining medications, even if no interactions are known. They can review your complete medication list and health history.",
        }
    }
}

/// The specific interaction recorded for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Safe,
    SafeWithCaution,
    SafeAlternating,
    BleedingRisk,
    IncreasedSideEffects,
    IncreasedBleedingGiRisk,
    ExcessiveSedation,
    ReducedEffectiveness,
    KidneyFunctionConcern,
    LowBloodPressureRisk,
}

impl InteractionKind {
    pub fn describe(&self, a: &str, b: &str) -> String {
        match self {
            Self::Safe => format!("Yes, {a} and {b} are generally safe to take together. There are no known significant interactions between these medications."),
            Self::SafeWithCaution => format!("Yes, {a} and {b} can typically be taken together, but monitor for increased side effects. Take the anti-inflammatory with food to reduce stomach irritation."),
            Self::SafeAlternating => format!("Yes, {a} and {b} can be taken together and are sometimes recommended in alternating doses for better pain control. Space them out by 2-3 hours when possible."),
            Self::BleedingRisk => format!("⚠️ **Caution needed.** {a} and {b} can increase bleeding risk when taken together. Your doctor may need to monitor you more closely or adjust dosages."),
            Self::IncreasedSideEffects => format!("⚠️ **Not recommended.** Taking {a} and {b} together can increase the risk of side effects like stomach problems and kidney issues. Choose one or consult your doctor."),
            Self::IncreasedBleedingGiRisk => format!("⚠️ **Caution needed.** {a} and {b} together increase the risk of stomach bleeding and ulcers. Take with food and watch for stomach pain."),
            Self::ExcessiveSedation => format!("⚠️ **Not recommended without medical supervision.** {a} and {b} can cause dangerous levels of sedation and breathing problems when combined."),
            Self::ReducedEffectiveness => format!("⚠️ **Monitor closely.** {a} may reduce the effectiveness of {b}. Your doctor might need to adjust dosages or monitor your response."),
            Self::KidneyFunctionConcern => "⚠️ **Monitor kidney function.** This combination can affect kidney function, especially if you're dehydrated or elderly. Drink plenty of water.".to_string(),
            Self::LowBloodPressureRisk => "⚠️ **Monitor blood pressure.** This combination can cause blood pressure to drop too low. Watch for dizziness or lightheadedness.".to_string(),
        }
    }

    fn confidence(&self) -> Confidence {
        match self {
            Self::Safe | Self::BleedingRisk => Confidence::High,
            _ => Confidence::Medium,
        }
    }
}

const SAFE_COMBINATIONS: &[(&str, &str, InteractionKind)] = &[
    ("acetaminophen", "amoxicillin", InteractionKind::Safe),
    ("acetaminophen", "azithromycin", InteractionKind::Safe),
    ("acetaminophen", "cephalexin", InteractionKind::Safe),
    ("ibuprofen", "amoxicillin", InteractionKind::SafeWithCaution),
    ("acetaminophen", "ibuprofen", InteractionKind::SafeAlternating),
    ("lisinopril", "amoxicillin", InteractionKind::Safe),
    ("amlodipine", "amoxicillin", InteractionKind::Safe),
    ("metoprolol", "amoxicillin", InteractionKind::Safe),
    ("metformin", "amoxicillin", InteractionKind::Safe),
    ("metformin", "azithromycin", InteractionKind::Safe),
];

const PROBLEMATIC_COMBINATIONS: &[(&str, &str, InteractionKind)] = &[
    ("warfarin", "ibuprofen", InteractionKind::BleedingRisk),
    ("warfarin", "aspirin", InteractionKind::BleedingRisk),
    ("warfarin", "naproxen", InteractionKind::BleedingRisk),
    ("ibuprofen", "naproxen", InteractionKind::IncreasedSideEffects),
    ("ibuprofen", "aspirin", InteractionKind::IncreasedBleedingGiRisk),
    ("zolpidem", "lorazepam", InteractionKind::ExcessiveSedation),
    ("alprazolam", "zolpidem", InteractionKind::ExcessiveSedation),
];

const CLASS_INTERACTIONS: &[(&str, &str, InteractionKind)] = &[
    ("nsaid", "ace_inhibitor", InteractionKind::ReducedEffectiveness),
    ("nsaid", "diuretic", InteractionKind::KidneyFunctionConcern),
    ("beta_blocker", "calcium_channel_blocker", InteractionKind::LowBloodPressureRisk),
    ("ssri", "nsaid", InteractionKind::BleedingRisk),
];

/// Canonical drug → pharmacological class.
pub const DRUG_CLASSES: &[(&str, &str)] = &[
    ("acetaminophen", "analgesic"),
    ("ibuprofen", "nsaid"),
    ("naproxen", "nsaid"),
    ("aspirin", "nsaid"),
    ("lisinopril", "ace_inhibitor"),
    ("amlodipine", "calcium_channel_blocker"),
    ("metoprolol", "beta_blocker"),
    ("hydrochlorothiazide", "diuretic"),
    ("sertraline", "ssri"),
    ("fluoxetine", "ssri"),
    ("warfarin", "anticoagulant"),
    ("amoxicillin", "antibiotic"),
    ("azithromycin", "antibiotic"),
    ("cephalexin", "antibiotic"),
];

const VARIANTS: &[(&str, &str)] = &[
    ("tylenol", "acetaminophen"),
    ("advil", "ibuprofen"),
    ("motrin", "ibuprofen"),
    ("aleve", "naproxen"),
    ("zpack", "azithromycin"),
    ("amoxil", "amoxicillin"),
];

type PairTable = HashMap<(String, String), InteractionKind>;

fn symmetric(rows: &[(&str, &str, InteractionKind)]) -> PairTable {
    let mut table = HashMap::with_capacity(rows.len() * 2);
    for (a, b, kind) in rows {
        table.insert((a.to_string(), b.to_string()), *kind);
        table.insert((b.to_string(), a.to_string()), *kind);
    }
    table
}

static SAFE_TABLE: Lazy<PairTable> = Lazy::new(|| symmetric(SAFE_COMBINATIONS));
static PROBLEM_TABLE: Lazy<PairTable> = Lazy::new(|| symmetric(PROBLEMATIC_COMBINATIONS));
static CLASS_TABLE: Lazy<PairTable> = Lazy::new(|| symmetric(CLASS_INTERACTIONS));
static CLASS_OF: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| DRUG_CLASSES.iter().copied().collect());
static VARIANT_OF: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| VARIANTS.iter().copied().collect());

/// Result of analysing one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResult {
    pub found: bool,
    pub severity: InteractionSeverity,
    pub kind: Option<InteractionKind>,
    pub description: String,
    pub advice: String,
    pub confidence: Confidence,
}

/// Looks up how two drugs interact.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionAnalyzer;

impl InteractionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyse a pair. Total: unknown pairs get an explicit "consult" result.
    pub fn analyze(&self, drug1: &str, drug2: &str) -> InteractionResult {
        let pair = (canonical(drug1), canonical(drug2));

        if let Some(kind) = SAFE_TABLE.get(&pair) {
            return self.found(drug1, drug2, *kind, InteractionSeverity::Safe);
        }
        if let Some(kind) = PROBLEM_TABLE.get(&pair) {
            return self.found(drug1, drug2, *kind, InteractionSeverity::Caution);
        }

        let classes = (CLASS_OF.get(pair.0.as_str()), CLASS_OF.get(pair.1.as_str()));
        if let (Some(class1), Some(class2)) = classes {
            if let Some(kind) = CLASS_TABLE.get(&(class1.to_string(), class2.to_string())) {
                return self.found(drug1, drug2, *kind, InteractionSeverity::Monitor);
            }
        }

        tracing::debug!(drug1, drug2, "no interaction data for pair");
        InteractionResult {
            found: false,
            severity: InteractionSeverity::Unknown,
            kind: None,
            description: format!(
                "No specific interaction information is available for {} and {} in my current database. However, this doesn't mean they're automatically safe together.",
                drug1, drug2
            ),
            advice: InteractionSeverity::Unknown.advice().to_string(),
            confidence: Confidence::Low,
        }
    }

    /// Pharmacological class of a drug, if tabled.
    pub fn drug_class(&self, drug: &str) -> Option<&'static str> {
        CLASS_OF.get(canonical(drug).as_str()).copied()
    }

    fn found(
        &self,
        drug1: &str,
        drug2: &str,
        kind: InteractionKind,
        severity: InteractionSeverity,
    ) -> InteractionResult {
        InteractionResult {
            found: true,
            severity,
            kind: Some(kind),
            description: kind.describe(drug1, drug2),
            advice: severity.advice().to_string(),
            confidence: kind.confidence(),
        }
    }
}

fn canonical(drug: &str) -> String {
    let lower = drug.trim().to_lowercase();
    match VARIANT_OF.get(lower.as_str()) {
        Some(generic) => generic.to_string(),
        None => lower,
    }
}
