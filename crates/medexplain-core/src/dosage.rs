//! Dosage questions: detection and safety-first canned guidance.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Confidence, QueryResponse, Source};
use crate::resolver::DrugNameNormalizer;
use crate::translator::PlainEnglishTranslator;

pub const DOSAGE_DISCLAIMER: &str = "🚨 DOSAGE DISCLAIMER: Medication dosages must be determined by licensed healthcare providers based on your individual medical history, current health status, other medications, age, weight, and specific condition. This information is for educational purposes only and does not constitute medical advice. Always follow your doctor's instructions and prescription labels.";

const DOSAGE_PATTERNS: &[&str] = &[
    r"can i take .* daily",
    r"how often .* take",
    r"how much .* per day",
    r"daily dose",
    r"safe to take .* every day",
    r"long term use",
    r"chronic use",
    r"daily usage",
    r"take .* regularly",
    r"take .* \d+ times",
    r"\d+ times .* day",
    r"take .* multiple times",
    r"overdose",
    r"too much",
    r"maximum dose",
];

static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    DOSAGE_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
});

/// General label information for one over-the-counter or common drug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosageInfo {
    pub drug: &'static str,
    pub max_daily: &'static str,
    pub frequency: &'static str,
    pub warnings: &'static [&'static str],
    pub daily_use_note: &'static str,
}

pub const DOSAGE_TABLE: &[DosageInfo] = &[
    DosageInfo {
        drug: "acetaminophen",
        max_daily: "3000-4000mg for adults",
        frequency: "Every 4-6 hours as needed",
        warnings: &[
            "Do not exceed 4000mg (4g) in 24 hours",
            "Taking more than recommended can cause serious liver damage",
            "Avoid alcohol while taking acetaminophen",
            "Check other medications for acetaminophen content",
        ],
        daily_use_note: "Not recommended for daily long-term use without medical supervision",
    },
    DosageInfo {
        drug: "ibuprofen",
        max_daily: "1200-3200mg for adults (with food)",
        frequency: "Every 6-8 hours as needed",
        warnings: &[
            "Take with food to reduce stomach irritation",
            "Do not exceed 3200mg in 24 hours without medical supervision",
            "Can increase risk of heart attack, stroke, and stomach bleeding",
            "Not recommended during pregnancy (especially third trimester)",
        ],
        daily_use_note: "Long-term daily use requires medical monitoring for cardiovascular and GI risks",
    },
    DosageInfo {
        drug: "aspirin",
        max_daily: "650-1000mg every 4 hours (max 4000mg/day)",
        frequency: "Every 4-6 hours as needed",
        warnings: &[
            "Can cause stomach bleeding",
            "Not for children/teens with viral infections (Reye's syndrome risk)",
            "Increases bleeding risk",
            "Can interact with blood thinners",
        ],
        daily_use_note: "Low-dose daily aspirin for heart protection requires medical supervision",
    },
    DosageInfo {
        drug: "semaglutide",
        max_daily: "ONCE WEEKLY injection only - NOT daily",
        frequency: "Once per week subcutaneous injection",
        warnings: &[
            "PRESCRIPTION ONLY - requires doctor supervision",
            "Can cause severe nausea, vomiting, and diarrhea",
            "Risk of thyroid tumors and pancreatitis",
            "Can cause hypoglycemia when combined with other diabetes medications",
            "NEVER take multiple doses in one day",
            "DANGEROUS if used for weight loss without medical supervision",
        ],
        daily_use_note: "CRITICAL: This is a WEEKLY medication. Taking daily or multiple times per day is EXTREMELY DANGEROUS and can cause severe hypoglycemia, hospitalization, or death.",
    },
];

const UNKNOWN_DRUG_GUIDANCE: &str = "**🏥 You Must Consult:**
• Your prescribing doctor
• A licensed pharmacist
• Call your pharmacy's consultation line
• Use official prescribing information

**❌ Never:**
• Guess dosages based on internet information
• Take medications without proper guidance
• Exceed recommended doses
• Share medications with others

**🔍 For accurate dosage information:**
1. Check the medication label/package insert
2. Call your pharmacy
3. Consult your healthcare provider
4. Use official medical resources like FDA.gov";

const GENERAL_GUIDANCE: &str = "**⚠️ MEDICATION DOSAGE SAFETY**

For any medication dosage questions, you should **always consult:**

**🏥 Primary Sources:**
• Your prescribing doctor
• Licensed pharmacist
• Official medication packaging/insert
• FDA-approved prescribing information

**📱 Quick Help:**
• Call your pharmacy's consultation line
• Use your insurance's nurse hotline
• Contact your doctor's office

**❌ Important Reminders:**
• Never guess dosages
• Don't rely on internet forums
• Avoid sharing medications
• Don't exceed package directions without medical supervision

**🚨 For emergencies or overdose concerns, call Poison Control: 1-800-222-1222**";

const CONSULT_IF: &str = "**🏥 You Should Consult Your Doctor If:**
• You need pain relief for more than 10 days
• You have chronic conditions (heart, liver, kidney disease)
• You take other medications
• You experience side effects
• You're pregnant or breastfeeding

**🚨 REMEMBER:** Self-medication can be dangerous. This information is for educational purposes only and does not replace professional medical advice.";

pub fn dosage_info(drug: &str) -> Option<&'static DosageInfo> {
    let lower = drug.trim().to_lowercase();
    DOSAGE_TABLE.iter().find(|info| info.drug == lower)
}

/// Answers "how much / how often" questions without ever giving a
/// personal dose.
#[derive(Debug, Clone, Default)]
pub struct DosageAdvisor {
    normalizer: DrugNameNormalizer,
}

impl DosageAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_normalizer(normalizer: DrugNameNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn is_dosage_query(&self, question: &str) -> bool {
        let lower = question.to_lowercase();
        PATTERNS.iter().any(|p| p.is_match(&lower))
    }

    /// Build the dosage answer for `question`.
    ///
    /// Every branch carries the dosage disclaimer and a safety warning.
    pub fn handle_dosage_query(
        &self,
        question: &str,
        translator: Option<&PlainEnglishTranslator<'_>>,
    ) -> QueryResponse {
        let extracted = self.normalizer.extract_and_normalize(question);
        if !extracted.is_found() {
            tracing::info!("dosage question without a recognised drug");
            return self.general_response(translator);
        }

        let info = dosage_info(&extracted.name)
            .or_else(|| dosage_info(&self.normalizer.normalize(&extracted.name)));

        match info {
            Some(info) => {
                tracing::info!(drug = %extracted.name, "dosage table hit");
                self.specific_response(&extracted.name, info, question, translator)
            }
            None => {
                tracing::info!(drug = %extracted.name, "no dosage table entry");
                self.unknown_drug_response(&extracted.name, &extracted.suggestions, translator)
            }
        }
    }

    fn specific_response(
        &self,
        drug: &str,
        info: &DosageInfo,
        question: &str,
        translator: Option<&PlainEnglishTranslator<'_>>,
    ) -> QueryResponse {
        let warnings: String = info
            .warnings
            .iter()
            .map(|w| format!("• {}\n", w))
            .collect();

        let body = format!(
            "**⚠️ IMPORTANT: This is general information only. Always consult your healthcare provider before starting any medication regimen.**

**General FDA-approved dosage information for {drug}:**

🔹 **Typical Adult Dose**: {max}
🔹 **Frequency**: {frequency}

**⚠️ Important Warnings:**
{warnings}
**📋 Regarding Daily Use:**
{note}

{consult}",
            drug = drug,
            max = info.max_daily,
            frequency = info.frequency,
            warnings = warnings,
            note = info.daily_use_note,
            consult = CONSULT_IF,
        );

        QueryResponse::new(
            translate(body, translator),
            Confidence::Medium,
            DOSAGE_DISCLAIMER,
            question,
        )
        .with_warning(true)
        .with_sources(vec![
            Source::new(drug, "General Dosage Information").with_url("FDA Guidelines")
        ])
    }

    fn unknown_drug_response(
        &self,
        drug: &str,
        suggestions: &[String],
        translator: Option<&PlainEnglishTranslator<'_>>,
    ) -> QueryResponse {
        let mut body = format!(
            "**⚠️ DOSAGE SAFETY WARNING**

I cannot provide specific dosage information for {} as this requires personalized medical assessment.

{}",
            drug, UNKNOWN_DRUG_GUIDANCE
        );
        if !suggestions.is_empty() {
            body.push_str(&format!(
                "\n\n🤔 **Did you mean:** {}?",
                suggestions.join(", ")
            ));
        }

        QueryResponse::new(
            translate(body, translator),
            Confidence::High,
            DOSAGE_DISCLAIMER,
            format!("Dosage query for {}", drug),
        )
        .with_warning(true)
    }

    fn general_response(&self, translator: Option<&PlainEnglishTranslator<'_>>) -> QueryResponse {
        QueryResponse::new(
            translate(GENERAL_GUIDANCE.to_string(), translator),
            Confidence::High,
            DOSAGE_DISCLAIMER,
            "General dosage inquiry",
        )
        .with_warning(true)
    }
}

fn translate(body: String, translator: Option<&PlainEnglishTranslator<'_>>) -> String {
    match translator {
        Some(t) => t.translate(&body),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_dosage_query() {
        let advisor = DosageAdvisor::new();
        assert!(advisor.is_dosage_query("How much ibuprofen per day?"));
        assert!(advisor.is_dosage_query("can i take panadol daily"));
        assert!(advisor.is_dosage_query("What is the maximum dose of aspirin"));
        assert!(advisor.is_dosage_query("I take it 3 times a day"));
        assert!(!advisor.is_dosage_query("What are the side effects of ibuprofen?"));
    }

    #[test]
    fn test_ibuprofen_dosage_response() {
        let advisor = DosageAdvisor::new();
        let translator = PlainEnglishTranslator::new();
        let resp = advisor.handle_dosage_query("How much ibuprofen per day?", Some(&translator));

        assert!(resp.response.contains("1200-3200mg for adults (with food)"));
        assert!(resp.response.contains("Always consult your healthcare provider"));
        assert_eq!(resp.disclaimer, DOSAGE_DISCLAIMER);
        assert!(resp.safety_warning);
        assert_eq!(resp.confidence, Confidence::Medium);
        assert_eq!(resp.sources.len(), 1);
        assert_eq!(resp.sources[0].drug, "Ibuprofen");
        assert_eq!(resp.sources[0].section, "General Dosage Information");
        assert_eq!(resp.sources[0].url.as_deref(), Some("FDA Guidelines"));
        assert_eq!(resp.query, "How much ibuprofen per day?");
    }

    #[test]
    fn test_brand_name_uses_generic_entry() {
        let advisor = DosageAdvisor::new();
        let resp = advisor.handle_dosage_query("can i take panadol daily", None);
        assert!(resp.response.contains("3000-4000mg for adults"));
        assert!(resp.response.contains("Acetaminophen"));
    }

    #[test]
    fn test_semaglutide_is_weekly() {
        let advisor = DosageAdvisor::new();
        let resp = advisor.handle_dosage_query("Can I take ozempic daily?", None);
        assert!(resp.response.contains("ONCE WEEKLY"));
        assert!(resp.response.contains("EXTREMELY DANGEROUS"));
    }

    #[test]
    fn test_unknown_drug_fallback() {
        let advisor = DosageAdvisor::new();
        let resp = advisor.handle_dosage_query("What is the maximum dose of metformin?", None);

        assert!(resp.response.contains("cannot provide specific dosage information for Metformin"));
        assert_eq!(resp.confidence, Confidence::High);
        assert!(resp.sources.is_empty());
        assert!(resp.safety_warning);
        assert_eq!(resp.query, "Dosage query for Metformin");
        assert_eq!(resp.disclaimer, DOSAGE_DISCLAIMER);
    }

    #[test]
    fn test_no_drug_general_fallback() {
        let advisor = DosageAdvisor::new();
        let resp = advisor.handle_dosage_query("how much is too much?", None);

        assert!(resp.response.contains("Poison Control: 1-800-222-1222"));
        assert_eq!(resp.confidence, Confidence::High);
        assert_eq!(resp.query, "General dosage inquiry");
        assert_eq!(resp.disclaimer, DOSAGE_DISCLAIMER);
    }

    #[test]
    fn test_dosage_table_lookup_is_case_insensitive() {
        assert_eq!(dosage_info("Aspirin").map(|i| i.drug), Some("aspirin"));
        assert!(dosage_info("warfarin").is_none());
    }
}
