//! Query classification models.

use serde::{Deserialize, Serialize};

/// What a question is asking for, as judged by the safety filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    GeneralInfo,
    Dosage,
    SideEffects,
    Interactions,
    Contraindications,
    Emergency,
    Diagnosis,
    Dangerous,
}

impl QueryKind {
    /// Kinds that are answered with a fixed message instead of retrieval.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Emergency | Self::Diagnosis | Self::Dangerous)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralInfo => "general_info",
            Self::Dosage => "dosage",
            Self::SideEffects => "side_effects",
            Self::Interactions => "interactions",
            Self::Contraindications => "contraindications",
            Self::Emergency => "emergency",
            Self::Diagnosis => "diagnosis",
            Self::Dangerous => "dangerous",
        }
    }
}

/// Outcome of a safety check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub is_safe: bool,
    pub kind: QueryKind,
    /// User-facing message; a crisis or referral text when unsafe.
    pub message: String,
    pub confidence: f64,
}
