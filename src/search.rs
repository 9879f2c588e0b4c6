//! Fuzzy filtering for the list screens.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Case-insensitive fuzzy matcher shared by the filterable screens.
///
/// Wraps the underlying implementation so it can change without touching
/// the screens.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default(),
        }
    }

    /// Whether `pattern` fuzzy-matches `text`. Case-insensitive, and the
    /// pattern's characters may be non-consecutive in the text.
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        self.score(text, pattern).is_some()
    }

    /// Match score for ranking, higher is better. `None` means no match.
    pub fn score(&self, text: &str, pattern: &str) -> Option<i64> {
        let pattern = pattern.to_lowercase();
        self.inner.fuzzy_match(text, &pattern)
    }

    /// Whether any of `texts` matches the pattern.
    pub fn matches_any<'a>(&self, texts: impl IntoIterator<Item = &'a str>, pattern: &str) -> bool {
        texts.into_iter().any(|text| self.matches(text, pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_non_consecutive_characters() {
        let matcher = Matcher::new();

        assert!(matcher.matches("Central Pharmacy", "cpha"));
        assert!(matcher.matches("Baixa Walk-in Clinic", "bwc"));
        assert!(!matcher.matches("Central Pharmacy", "xyz"));
    }

    #[test]
    fn matching_ignores_case() {
        let matcher = Matcher::new();

        assert!(matcher.matches("HILLTOP PHARMACY", "hilltop"));
        assert!(matcher.matches("hilltop pharmacy", "HILLTOP"));
    }

    #[test]
    fn matches_any_checks_every_field() {
        let matcher = Matcher::new();
        let fields = ["Harbor Pharmacy", "Rua da Alfândega 10"];

        assert!(matcher.matches_any(fields, "harbor"));
        assert!(matcher.matches_any(fields, "alfandega") || matcher.matches_any(fields, "Alfândega"));
        assert!(!matcher.matches_any(fields, "queensway"));
    }

    #[test]
    fn exact_match_scores_at_least_as_high_as_fuzzy() {
        let matcher = Matcher::new();

        let exact = matcher.score("bank", "bank").unwrap();
        let fuzzy = matcher.score("First Atlantic Bank", "bank").unwrap();
        assert!(exact >= fuzzy);

        assert!(matcher.score("bank", "pharmacy").is_none());
    }
}
