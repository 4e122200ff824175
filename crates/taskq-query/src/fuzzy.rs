//! Fuzzy name matching.
//!
//! Scores run from 0 to 100 and fall into tiers, so a better kind of match
//! always outranks a worse one regardless of length:
//!
//! | match                         | score   |
//! |-------------------------------|---------|
//! | equal (ignoring case)         | 100     |
//! | candidate starts with query   | 80..=99 |
//! | candidate contains query      | 60..=79 |
//! | query is a subsequence        | 40..=59 |
//! | edit-distance similarity      | 0..=39  |
//!
//! Within a tier, the score grows with the share of the candidate the query
//! covers (or, in the last tier, with Damerau-Levenshtein similarity).

use strsim::normalized_damerau_levenshtein;
use tracing::trace;

/// Default minimum score for a fuzzy match to count.
pub const MIN_FUZZY_SCORE: u8 = 30;

/// Score of an exact (case-insensitive) match.
pub const EXACT_SCORE: u8 = 100;

const PREFIX_BASE: u8 = 80;
const SUBSTRING_BASE: u8 = 60;
const SUBSEQUENCE_BASE: u8 = 40;

/// Width of each tier above its base.
const TIER_SPAN: f64 = 19.0;

/// Width of the edit-distance tier.
const SIMILARITY_SPAN: f64 = 39.0;

/// Scores how well `candidate` matches `query`, from 0 to 100.
pub fn score(query: &str, candidate: &str) -> u8 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    if query == candidate {
        return EXACT_SCORE;
    }
    if query.is_empty() || candidate.is_empty() {
        return 0;
    }

    let coverage = query.chars().count() as f64 / candidate.chars().count() as f64;
    let tiered = |base: u8| base + (TIER_SPAN * coverage.min(1.0)).round() as u8;

    if candidate.starts_with(&query) {
        tiered(PREFIX_BASE).min(EXACT_SCORE - 1)
    } else if candidate.contains(&query) {
        tiered(SUBSTRING_BASE).min(PREFIX_BASE - 1)
    } else if is_subsequence(&query, &candidate) {
        tiered(SUBSEQUENCE_BASE).min(SUBSTRING_BASE - 1)
    } else {
        let similarity = normalized_damerau_levenshtein(&query, &candidate);
        ((SIMILARITY_SPAN * similarity).round() as u8).min(SUBSEQUENCE_BASE - 1)
    }
}

/// Returns true if every character of `needle` appears in `haystack` in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut remaining = haystack.chars();
    needle.chars().all(|c| remaining.any(|h| h == c))
}

/// Picks the best-scoring candidate above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatcher {
    threshold: u8,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(MIN_FUZZY_SCORE)
    }
}

impl FuzzyMatcher {
    /// Creates a matcher that discards scores below `threshold`.
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(EXACT_SCORE),
        }
    }

    /// Returns the minimum accepted score.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Scores `candidate` against `query`.
    pub fn score(&self, query: &str, candidate: &str) -> u8 {
        score(query, candidate)
    }

    /// Returns the candidate with the highest score at or above the
    /// threshold, together with its score.
    ///
    /// Ties go to the candidate listed first.
    pub fn best_match<'a, T, F>(
        &self,
        query: &str,
        candidates: &'a [T],
        name: F,
    ) -> Option<(&'a T, u8)>
    where
        F: Fn(&T) -> &str,
    {
        let mut best: Option<(&'a T, u8)> = None;
        for candidate in candidates {
            let s = score(query, name(candidate));
            trace!(query, candidate = name(candidate), score = s, "fuzzy score");
            if s < self.threshold {
                continue;
            }
            if best.is_none_or(|(_, top)| s > top) {
                best = Some((candidate, s));
            }
        }
        best
    }

    /// Returns every candidate at or above the threshold, best first.
    ///
    /// Candidates with equal scores keep their listing order.
    pub fn rank<'a, T, F>(&self, query: &str, candidates: &'a [T], name: F) -> Vec<(&'a T, u8)>
    where
        F: Fn(&T) -> &str,
    {
        let mut ranked: Vec<(&'a T, u8)> = candidates
            .iter()
            .map(|c| (c, score(query, name(c))))
            .filter(|(_, s)| *s >= self.threshold)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_maximal() {
        assert_eq!(score("backend", "backend"), 100);
        assert_eq!(score("Backend", "BACKEND"), 100);
    }

    #[test]
    fn test_scores_stay_in_range() {
        for (q, c) in [("a", "b"), ("", "x"), ("x", ""), ("long query", "q"), ("é", "É")] {
            assert!(score(q, c) <= 100);
        }
        assert_eq!(score("", ""), 100);
        assert_eq!(score("", "backend"), 0);
    }

    #[test]
    fn test_tier_ordering() {
        let prefix = score("back", "backend");
        let substring = score("kend", "backend");
        let subsequence = score("bkd", "backend");
        let unrelated = score("zzz", "backend");

        assert!((80..100).contains(&prefix), "prefix {prefix}");
        assert!((60..80).contains(&substring), "substring {substring}");
        assert!((40..60).contains(&subsequence), "subsequence {subsequence}");
        assert!(unrelated < 40, "unrelated {unrelated}");
        assert!(prefix > substring && substring > subsequence && subsequence > unrelated);
    }

    #[test]
    fn test_longer_prefix_scores_higher() {
        assert!(score("backen", "backend") > score("ba", "backend"));
        assert!(score("backend", "backend-api") > score("backend", "backend-authentication"));
    }

    #[test]
    fn test_typo_scores_above_threshold() {
        assert!(score("bakcend", "backend") >= MIN_FUZZY_SCORE);
        assert!(score("backnd", "backend") >= MIN_FUZZY_SCORE);
        assert!(score("frontend", "backend") < MIN_FUZZY_SCORE);
    }

    #[test]
    fn test_similarity_degrades_with_edit_distance() {
        let one_edit = score("backxnd", "backend");
        let two_edits = score("bxckxnd", "backend");
        assert!(one_edit > two_edits, "{one_edit} <= {two_edits}");
    }

    #[test]
    fn test_is_subsequence() {
        assert!(is_subsequence("bkd", "backend"));
        assert!(is_subsequence("", "backend"));
        assert!(!is_subsequence("dkb", "backend"));
        assert!(!is_subsequence("backends", "backend"));
    }

    #[test]
    fn test_best_match_prefers_exact_name() {
        let names = ["backend-api", "backend", "backend-auth"];
        let matcher = FuzzyMatcher::default();
        let (best, s) = matcher.best_match("backend", &names, |n| *n).unwrap();
        assert_eq!(*best, "backend");
        assert_eq!(s, 100);
    }

    #[test]
    fn test_best_match_ties_keep_listing_order() {
        let names = ["web-one", "web-two"];
        let (best, _) = FuzzyMatcher::default()
            .best_match("web", &names, |n| *n)
            .unwrap();
        assert_eq!(*best, "web-one");
    }

    #[test]
    fn test_best_match_respects_threshold() {
        let names = ["frontend", "mobile"];
        assert!(FuzzyMatcher::default().best_match("backend", &names, |n| *n).is_none());
        assert!(FuzzyMatcher::new(100).best_match("front", &names, |n| *n).is_none());
        assert!(FuzzyMatcher::new(0).best_match("backend", &names, |n| *n).is_some());
    }

    #[test]
    fn test_best_match_empty_candidates() {
        let names: [&str; 0] = [];
        assert!(FuzzyMatcher::default().best_match("x", &names, |n| *n).is_none());
    }

    #[test]
    fn test_rank_orders_by_score_then_listing() {
        let names = ["backend-auth", "api", "backend", "backend-api"];
        let ranked: Vec<&str> = FuzzyMatcher::default()
            .rank("backend", &names, |n| *n)
            .into_iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(ranked, vec!["backend", "backend-api", "backend-auth"]);
    }

    #[test]
    fn test_threshold_is_capped() {
        assert_eq!(FuzzyMatcher::new(250).threshold(), 100);
    }
}
