//! Golden tests for drug name resolution.
//!
//! These tests verify extraction and normalization against known questions.

use medexplain_core::resolver::{title_case, DrugNameNormalizer, BRAND_TO_GENERIC};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    question: &'static str,
    expected_drug: &'static str,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "generic-in-question",
            question: "What are the side effects of ibuprofen?",
            expected_drug: "Ibuprofen",
        },
        GoldenCase {
            id: "brand-in-question",
            question: "Can I take Tylenol every day?",
            expected_drug: "Acetaminophen",
        },
        GoldenCase {
            id: "international-name",
            question: "is paracetamol safe for kids",
            expected_drug: "Acetaminophen",
        },
        GoldenCase {
            id: "glp1-brand",
            question: "How does Ozempic work?",
            expected_drug: "Semaglutide",
        },
        GoldenCase {
            id: "misspelled-generic",
            question: "what is ibuprofin for",
            expected_drug: "Ibuprofen",
        },
        GoldenCase {
            id: "command-prefix",
            question: "/explain metformin",
            expected_drug: "Metformin",
        },
        GoldenCase {
            id: "unlisted-drug-by-pattern",
            question: "What does Aripiprazole do?",
            expected_drug: "Aripiprazole",
        },
        GoldenCase {
            id: "symptom-word",
            question: "what can I take for a fever",
            expected_drug: "",
        },
        GoldenCase {
            id: "symptom-word-short",
            question: "is fever bad for me",
            expected_drug: "",
        },
        GoldenCase {
            id: "near-miss-kept-as-typed",
            question: "is aspire bad for me",
            expected_drug: "Aspire",
        },
        GoldenCase {
            id: "no-drug",
            question: "how much is too much?",
            expected_drug: "",
        },
    ]
}

#[test]
fn test_golden_cases() {
    let normalizer = DrugNameNormalizer::new();

    for case in get_golden_cases() {
        let extracted = normalizer.extract_and_normalize(case.question);
        assert_eq!(
            extracted.name, case.expected_drug,
            "Case {}: drug mismatch", case.id
        );
        assert_eq!(
            extracted.is_found(),
            !case.expected_drug.is_empty(),
            "Case {}: found flag mismatch", case.id
        );
    }
}

#[test]
fn test_all_common_aliases() {
    let normalizer = DrugNameNormalizer::new();

    let alias_tests = vec![
        ("advil", "Ibuprofen"),
        ("Motrin", "Ibuprofen"),
        ("TYLENOL", "Acetaminophen"),
        ("panadol", "Acetaminophen"),
        ("aleve", "Naproxen"),
        ("zestril", "Lisinopril"),
        ("glucophage", "Metformin"),
        ("wegovy", "Semaglutide"),
        ("zoloft", "Sertraline"),
        ("xanax", "Alprazolam"),
        ("ventolin", "Albuterol"),
        ("nexium", "Esomeprazole"),
        ("lipitor", "Atorvastatin"),
        ("zithromax", "Azithromycin"),
        ("ambien", "Zolpidem"),
        ("zyrtec", "Cetirizine"),
        ("coumadin", "Warfarin"),
        ("synthroid", "Levothyroxine"),
        ("vicodin", "Hydrocodone"),
    ];

    for (alias, expected) in alias_tests {
        let result = normalizer.normalize(alias);
        assert_eq!(
            result, expected,
            "Alias {} should normalize to {}, got {}",
            alias, expected, result
        );
    }
}

#[test]
fn test_all_misspellings() {
    let normalizer = DrugNameNormalizer::new();

    let misspelling_tests = vec![
        ("ibuprophen", "Ibuprofen"),
        ("acetominophen", "Acetaminophen"),
        ("lisinpril", "Lisinopril"),
        ("metphormin", "Metformin"),
        ("amlodapine", "Amlodipine"),
        ("omeprozole", "Omeprazole"),
        ("sertralin", "Sertraline"),
        ("gabapenten", "Gabapentin"),
        ("asprin", "Aspirin"),
    ];

    for (typed, expected) in misspelling_tests {
        let result = normalizer.normalize(typed);
        assert_eq!(
            result, expected,
            "Misspelling {} should correct to {}, got {}",
            typed, expected, result
        );
    }
}

#[test]
fn test_every_brand_table_row() {
    let normalizer = DrugNameNormalizer::new();

    for (brand, generic) in BRAND_TO_GENERIC {
        assert_eq!(normalizer.normalize(brand), title_case(generic), "brand {}", brand);
    }
}

#[test]
fn test_suggestions_for_typos() {
    let normalizer = DrugNameNormalizer::new();

    let suggestions = normalizer.suggest_corrections("warfrin", 3);
    assert_eq!(suggestions.first().map(String::as_str), Some("Warfarin"));

    assert!(normalizer.suggest_corrections("qqqq", 3).is_empty());
}

#[test]
fn test_near_miss_is_suggested_not_substituted() {
    let normalizer = DrugNameNormalizer::new();

    let extracted = normalizer.extract_and_normalize("is aspire bad for me");
    assert_eq!(extracted.name, "Aspire");
    assert_eq!(extracted.suggestions, vec!["Aspirin"]);

    let extracted = normalizer.extract_and_normalize("is fever bad for me");
    assert!(!extracted.is_found());
    assert!(extracted.suggestions.is_empty());
}
