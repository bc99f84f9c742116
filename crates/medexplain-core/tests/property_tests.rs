//! Property tests over the static tables.

use medexplain_core::conversation::ConversationContext;
use medexplain_core::interaction::InteractionAnalyzer;
use medexplain_core::resolver::{title_case, DrugNameNormalizer, BRAND_TO_GENERIC};
use medexplain_core::PlainEnglishTranslator;
use proptest::prelude::*;

const DRUGS: &[&str] = &[
    "acetaminophen", "ibuprofen", "naproxen", "aspirin", "lisinopril", "amlodipine",
    "metoprolol", "hydrochlorothiazide", "sertraline", "fluoxetine", "warfarin", "amoxicillin",
    "azithromycin", "cephalexin", "metformin", "zolpidem", "lorazepam", "alprazolam",
    "tylenol", "advil", "motrin", "aleve", "zpack", "amoxil", "gabapentin",
];

const PHRASES: &[&str] = &[
    "hypertension", "nausea", "orally", "bid", "take", "the", "tablet", "with",
    "myocardial infarction", "edema", "water", "daily", "adverse reactions",
];

fn drug() -> impl Strategy<Value = &'static str> {
    prop::sample::select(DRUGS)
}

fn brand_row() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop::sample::select(BRAND_TO_GENERIC)
}

/// Randomly upper-cases letters.
fn recase(word: &str, mask: &[bool]) -> String {
    word.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    #[test]
    fn interaction_severity_is_order_independent(a in drug(), b in drug()) {
        let analyzer = InteractionAnalyzer::new();
        let forward = analyzer.analyze(a, b);
        let reverse = analyzer.analyze(b, a);
        prop_assert_eq!(forward.severity, reverse.severity);
        prop_assert_eq!(forward.kind, reverse.kind);
        prop_assert_eq!(forward.confidence, reverse.confidence);
    }

    #[test]
    fn brand_normalizes_to_generic_in_any_case(
        (brand, generic) in brand_row(),
        mask in prop::collection::vec(any::<bool>(), 1..8)
    ) {
        let normalizer = DrugNameNormalizer::new();
        prop_assert_eq!(normalizer.normalize(&recase(brand, &mask)), title_case(generic));
    }

    #[test]
    fn context_keeps_newest_mentions(picks in prop::collection::vec(drug(), 1..12)) {
        let mut ctx = ConversationContext::new();
        for d in &picks {
            ctx.add_mention(d);
        }

        let recent = ctx.recent_drugs();
        prop_assert!(recent.len() <= 3);
        prop_assert_eq!(recent.first().cloned(), picks.last().map(|d| title_case(d)));
    }

    #[test]
    fn dictionary_translation_is_idempotent(
        words in prop::collection::vec(prop::sample::select(PHRASES), 0..10)
    ) {
        let translator = PlainEnglishTranslator::new();
        let once = translator.dictionary_translate(&words.join(" "));
        prop_assert_eq!(translator.dictionary_translate(&once), once);
    }
}
