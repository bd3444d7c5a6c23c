// src/domain/similarity.rs
use std::collections::HashSet;

/// Symmetric text similarity in [0, 1] based on character trigrams.
///
/// Both inputs are lowercased and whitespace-collapsed before the overlapping
/// 3-character substrings are compared as sets (Jaccard index). Strings that
/// yield no trigrams (shorter than 3 characters, or empty) score 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = canonical_text(a);
    let b = canonical_text(b);

    let trigrams_a = trigrams(&a);
    let trigrams_b = trigrams(&b);

    if trigrams_a.is_empty() || trigrams_b.is_empty() {
        return 0.0;
    }

    let intersection = trigrams_a.intersection(&trigrams_b).count();
    let union = trigrams_a.union(&trigrams_b).count();

    intersection as f64 / union as f64
}

/// The set of overlapping 3-character windows of a string.
/// Windows are taken over characters, not bytes, so multi-byte text is safe.
pub fn trigrams(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return HashSet::new();
    }

    chars.windows(3).map(|w| w.iter().collect()).collect()
}

/// Lowercased, whitespace-collapsed form used for trigram comparison.
/// Index builders must use the same form, or candidate pruning loses pairs.
pub fn canonical_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_identical_strings_when_similarity_then_one() {
        assert_eq!(similarity("Getting Started with Rust", "Getting Started with Rust"), 1.0);
    }

    #[test]
    fn given_case_and_whitespace_variants_when_similarity_then_one() {
        assert_eq!(similarity("Hello   World", "hello world"), 1.0);
    }

    #[test]
    fn given_near_duplicate_titles_when_similarity_then_above_threshold() {
        let score = similarity("Getting Started with Rust", "Getting started with Rust!");
        assert!(score >= 0.8, "score was {}", score);
    }

    #[test]
    fn given_unrelated_titles_when_similarity_then_low_score() {
        let score = similarity("Getting Started with Rust", "Chocolate Cake Recipes");
        assert!(score < 0.2, "score was {}", score);
    }

    #[test]
    fn given_empty_or_short_input_when_similarity_then_zero() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("anything", ""), 0.0);
        assert_eq!(similarity("ab", "ab"), 0.0);
    }

    #[test]
    fn given_any_pair_when_similarity_then_symmetric() {
        let pairs = [
            ("Getting Started with Rust", "Getting started with Rust!"),
            ("alpha beta", "beta alpha"),
            ("", "xyz"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn given_multibyte_text_when_trigrams_then_no_panic() {
        let score = similarity("héllo wörld", "héllo wörld");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn given_short_string_when_trigrams_then_empty_set() {
        assert!(trigrams("ab").is_empty());
        assert_eq!(trigrams("abcd").len(), 2);
    }
}
