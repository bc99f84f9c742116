//! Fuzzy string similarity for drug names.

use strsim::normalized_levenshtein;

/// Similarity in `[0, 1]`: one minus the edit distance over the longer length.
///
/// A shared prefix earns nothing extra, so an ordinary word that happens to
/// start a longer brand name ("fever" / "feverall") stays below the
/// extraction cutoff.
pub fn fuzzy_match(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Up to `n` candidates scoring at least `cutoff` against `word`, best first.
///
/// Ties are broken alphabetically so results are stable.
pub fn close_matches<'a, I>(word: &str, candidates: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &'a str)> = candidates
        .into_iter()
        .map(|c| (fuzzy_match(word, c), c))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(n).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match_identical() {
        assert!((fuzzy_match("ibuprofen", "ibuprofen") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_match_typo_beats_unrelated() {
        let typo = fuzzy_match("tylenl", "tylenol");
        let unrelated = fuzzy_match("tylenl", "warfarin");
        assert!(typo > 0.8, "typo score {}", typo);
        assert!(unrelated < 0.6, "unrelated score {}", unrelated);
    }

    #[test]
    fn test_word_prefix_of_brand_is_not_close() {
        assert!(fuzzy_match("fever", "feverall") < 0.8);
        assert!(fuzzy_match("aspire", "aspirin") < 0.8);
        assert!(fuzzy_match("aspire", "aspirin") >= 0.6);
    }

    #[test]
    fn test_close_matches_orders_and_limits() {
        let candidates = ["ibuprofen", "ibuprophen", "bupropion", "warfarin"];
        let matches = close_matches("ibuprofn", candidates, 2, 0.6);
        assert_eq!(matches, vec!["ibuprofen", "ibuprophen"]);
    }

    #[test]
    fn test_close_matches_respects_cutoff() {
        let candidates = ["ibuprofen", "warfarin"];
        assert!(close_matches("what", candidates, 3, 0.8).is_empty());
    }
}
