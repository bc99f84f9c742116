//! Drug label records and the documents they are indexed as.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A label section that is indexed as its own document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrugSection {
    Description,
    Indications,
    Contraindications,
    Warnings,
    AdverseReactions,
    Dosage,
}

impl DrugSection {
    pub const ALL: [DrugSection; 6] = [
        Self::Description,
        Self::Indications,
        Self::Contraindications,
        Self::Warnings,
        Self::AdverseReactions,
        Self::Dosage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Indications => "indications",
            Self::Contraindications => "contraindications",
            Self::Warnings => "warnings",
            Self::AdverseReactions => "adverse_reactions",
            Self::Dosage => "dosage",
        }
    }

    /// Heading form, e.g. "Adverse Reactions".
    pub fn title(&self) -> &'static str {
        match self {
            Self::Description => "Description",
            Self::Indications => "Indications",
            Self::Contraindications => "Contraindications",
            Self::Warnings => "Warnings",
            Self::AdverseReactions => "Adverse Reactions",
            Self::Dosage => "Dosage",
        }
    }
}

impl fmt::Display for DrugSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrugSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown drug section: {}", s))
    }
}

/// Label data for one drug as delivered by a fetcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrugRecord {
    pub name: String,
    pub generic_name: String,
    pub brand_names: Vec<String>,
    pub description: String,
    pub indications: String,
    pub contraindications: String,
    pub warnings: String,
    pub adverse_reactions: String,
    pub dosage: String,
    pub source_url: Option<String>,
    pub last_updated: Option<String>,
    pub ndc_codes: Vec<String>,
}

impl DrugRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn section(&self, section: DrugSection) -> &str {
        match section {
            DrugSection::Description => &self.description,
            DrugSection::Indications => &self.indications,
            DrugSection::Contraindications => &self.contraindications,
            DrugSection::Warnings => &self.warnings,
            DrugSection::AdverseReactions => &self.adverse_reactions,
            DrugSection::Dosage => &self.dosage,
        }
    }

    /// Sections with non-blank text, in index order.
    pub fn present_sections(&self) -> Vec<(DrugSection, &str)> {
        DrugSection::ALL
            .into_iter()
            .map(|s| (s, self.section(s).trim()))
            .filter(|(_, text)| !text.is_empty())
            .collect()
    }
}

/// Metadata stored next to every indexed section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub drug_name: String,
    pub generic_name: String,
    pub brand_names: Vec<String>,
    pub section: DrugSection,
    pub source_url: Option<String>,
    pub last_updated: Option<String>,
    pub ndc_codes: Vec<String>,
}

/// One indexed (drug, section) document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    /// Searchable text: a short header followed by the section content.
    pub text: String,
    /// Raw section content.
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// A search result; `distance` is smaller for closer matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: StoredDocument,
    pub distance: Option<f64>,
}

/// Everything known about one drug, section by section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugOverview {
    pub drug_name: String,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    #[serde(default)]
    pub brand_names: Vec<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DrugOverview {
    pub fn not_found(drug_name: &str) -> Self {
        Self {
            drug_name: drug_name.to_string(),
            found: false,
            generic_name: None,
            brand_names: Vec::new(),
            sections: BTreeMap::new(),
            source_url: None,
            last_updated: None,
            disclaimer: None,
            message: Some(format!(
                "No FDA information found for '{}'. Please check the spelling or try a different name.",
                drug_name
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_round_trips_through_str() {
        for section in DrugSection::ALL {
            assert_eq!(section.as_str().parse::<DrugSection>().unwrap(), section);
        }
        assert!("boxed_warning".parse::<DrugSection>().is_err());
        assert_eq!(DrugSection::AdverseReactions.title(), "Adverse Reactions");
    }

    #[test]
    fn test_present_sections_skips_blank() {
        let mut record = DrugRecord::new("Ibuprofen");
        record.description = "NSAID pain reliever".into();
        record.warnings = "   ".into();
        record.dosage = "200-400 mg every 4-6 hours".into();

        let sections: Vec<_> = record.present_sections().into_iter().map(|(s, _)| s).collect();
        assert_eq!(sections, vec![DrugSection::Description, DrugSection::Dosage]);
    }
}
