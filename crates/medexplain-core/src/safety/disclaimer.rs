//! Disclaimers attached to every answer.

use crate::models::QueryKind;

pub const GENERAL_DISCLAIMER: &str = "⚠️ IMPORTANT DISCLAIMER: This information is for educational purposes only and is not medical advice. Always consult your healthcare provider before starting, stopping, or changing any medication. This information comes from FDA sources but should not replace professional medical consultation.";

pub const DOSAGE_WARNING: &str = "⚠️ DOSAGE WARNING: I cannot provide specific dosing recommendations. Medication dosages must be determined by a licensed healthcare provider based on your individual medical history, current health status, other medications, and specific condition. Taking incorrect doses can be dangerous. Always follow your doctor's instructions and prescription labels.";

pub const SAFETY_INFORMATION: &str = "⚠️ SAFETY INFORMATION: This information about side effects, interactions, and contraindications is from FDA sources for educational purposes. Your individual risk factors may differ. Always inform your healthcare provider about all medications, supplements, and health conditions. Seek immediate medical attention if you experience serious adverse reactions.";

pub const EMERGENCY_DISCLAIMER: &str = "🚨 EMERGENCY DISCLAIMER: If you are experiencing a medical emergency, call 911 immediately. Do not rely on this chatbot for emergency medical advice. Contact emergency services or poison control (1-800-222-1222) for urgent situations.";

/// Picks the disclaimer for a classified question.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyDisclaimer;

impl SafetyDisclaimer {
    /// Disclaimer for an answered question. Blocked kinds fall back to the
    /// general text; blocked answers carry [`Self::emergency`] instead.
    pub fn disclaimer_for(&self, kind: QueryKind) -> &'static str {
        match kind {
            QueryKind::Dosage => DOSAGE_WARNING,
            QueryKind::SideEffects | QueryKind::Interactions | QueryKind::Contraindications => {
                SAFETY_INFORMATION
            }
            QueryKind::GeneralInfo
            | QueryKind::Emergency
            | QueryKind::Dangerous
            | QueryKind::Diagnosis => GENERAL_DISCLAIMER,
        }
    }

    pub fn general(&self) -> &'static str {
        GENERAL_DISCLAIMER
    }

    pub fn emergency(&self) -> &'static str {
        EMERGENCY_DISCLAIMER
    }
}
