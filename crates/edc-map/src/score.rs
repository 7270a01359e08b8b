//! String similarity for column-to-field matching.
//!
//! Combines several heuristics and keeps the best one: spreadsheet headers
//! diverge from declared field names in many independent ways (casing,
//! separators, abbreviation, word order), and any single strong signal should
//! be enough to surface a match. This is a deliberate union-of-heuristics
//! policy; the sub-scores are never averaged.

use std::collections::BTreeSet;

use rapidfuzz::distance::{jaro, levenshtein};

/// Similarity of two strings in `[0, 1]`. Symmetric and total.
///
/// Sub-scores, best wins:
/// 1. exact match after lowercasing and trimming: 1.0
/// 2. exact match after additionally stripping `_`, `-`, and inner
///    whitespace: 0.95
/// 3. substring containment in either direction: 0.9
/// 4. Levenshtein ratio `1 - dist / max_len`
/// 5. Jaro similarity
/// 6. Jaccard overlap of the word-token sets
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        // Also covers two empty strings.
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut best: f64 = 0.0;
    if strip_separators(&a) == strip_separators(&b) {
        best = 0.95;
    }
    if a.contains(&b) || b.contains(&a) {
        best = best.max(0.9);
    }

    let edit = levenshtein_ratio(&a, &b);
    let alignment = jaro::similarity(a.chars(), b.chars());
    let overlap = token_overlap(&a, &b);

    best.max(edit).max(alignment).max(overlap)
}

/// Edit-distance similarity: `1 - levenshtein / max_len`.
///
/// Callers guarantee both inputs are non-empty.
fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein::distance(a.chars(), b.chars());
    1.0 - distance as f64 / max_len as f64
}

/// Jaccard similarity of the word-token sets.
///
/// Tokens are split on whitespace, `_`, and `-`; empty tokens are dropped.
fn token_overlap(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}

fn tokenize(s: &str) -> BTreeSet<&str> {
    s.split(|ch: char| ch.is_whitespace() || ch == '_' || ch == '-')
        .filter(|token| !token.is_empty())
        .collect()
}

fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
        .collect()
}
