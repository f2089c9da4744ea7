//! Endpoint path correspondence between two documents

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::trace;

use super::types::PathMatch;
use crate::scoring::path_similarity;

/// Strategy for pairing endpoint paths of the old document with the new one
///
/// Implementations must be deterministic and return at most one match per
/// old path, ordered by descending similarity.
pub trait PathMatchingStrategy {
    /// Pair `old_paths` with `new_paths`
    fn match_paths(&self, old_paths: &[&str], new_paths: &[&str]) -> Vec<PathMatch>;
}

/// Exhaustive path matcher
///
/// Scores the full cross product, so cost is `O(P1 × P2)`. That is fine for
/// API surfaces of tens to low hundreds of endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathMatcher {
    threshold: f64,
}

impl PathMatcher {
    /// Create a matcher with the default threshold (0.6)
    pub fn new() -> Self {
        Self { threshold: 0.6 }
    }

    /// Create a matcher with a custom (exclusive) threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The acceptance threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PathMatchingStrategy for PathMatcher {
    fn match_paths(&self, old_paths: &[&str], new_paths: &[&str]) -> Vec<PathMatch> {
        let mut candidates: Vec<PathMatch> = Vec::new();

        for old_path in old_paths {
            for new_path in new_paths {
                let similarity = path_similarity(old_path, new_path);
                if similarity > self.threshold {
                    candidates.push(PathMatch::new(*old_path, *new_path, similarity));
                } else {
                    trace!(old_path, new_path, similarity, "Path pair below threshold");
                }
            }
        }

        // Stable sort keeps cross-product order among equal scores
        candidates.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });

        let mut seen: HashSet<String> = HashSet::new();
        candidates.retain(|m| seen.insert(m.path1.clone()));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_paths() {
        let matches = PathMatcher::new().match_paths(&["/pay", "/refund"], &["/pay", "/refund"]);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.path1 == m.path2 && m.similarity == 1.0));
    }

    #[test]
    fn test_best_match_wins() {
        let matches = PathMatcher::new().match_paths(
            &["/users/{id}"],
            &["/users/{userId}", "/users/{id}"],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path2, "/users/{id}");
        assert_eq!(matches[0].similarity, 1.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // One of two segments matches exactly: 0.5, rejected
        let matches = PathMatcher::new().match_paths(&["/users/list"], &["/users/{id}"]);
        assert!(matches.is_empty());

        let matches = PathMatcher::with_threshold(0.5).match_paths(&["/users/list"], &["/users/{id}"]);
        assert!(matches.is_empty());

        let matches = PathMatcher::with_threshold(0.4).match_paths(&["/users/list"], &["/users/{id}"]);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_target_may_repeat() {
        let matches = PathMatcher::new().match_paths(&["/v1/payment", "/v1/payments"], &["/v1/payments"]);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].path1, "/v1/payments");
        assert_eq!(matches[1].path1, "/v1/payment");
        assert!(matches.iter().all(|m| m.path2 == "/v1/payments"));
    }

    #[test]
    fn test_sorted_descending() {
        let matches = PathMatcher::new().match_paths(
            &["/a/{x}", "/b", "/c/d"],
            &["/a/{y}", "/b", "/c/d"],
        );
        assert_eq!(matches.len(), 3);
        for pair in matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        assert_eq!(matches[2].path1, "/a/{x}");
    }
}
