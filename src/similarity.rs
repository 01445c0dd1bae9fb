//! Similarity measures over sparse weighted term vectors.
//!
//! Both measures are symmetric and total: malformed or empty input maps to
//! `0.0`, never to an error.

use crate::model::document::{BagOfWords, TermVector};

/// Cosine similarity between two sparse term vectors.
///
/// The dot product runs over the key intersection; each norm runs over the
/// full vector. Returns `0.0` when either norm is zero.
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut dot = 0.0;
    for (term, weight) in small {
        if let Some(other) = large.get(term) {
            dot += weight * other;
        }
    }

    let norm_a: f64 = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b: f64 = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Dice coefficient between the key sets of two bags-of-words.
///
/// `2 * |keys(a) ∩ keys(b)| / (|keys(a)| + |keys(b)|)`, `0.0` when both
/// bags are empty.
pub fn dice(a: &BagOfWords, b: &BagOfWords) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let shared = small.keys().filter(|term| large.contains_key(*term)).count();

    2.0 * shared as f64 / (a.len() + b.len()) as f64
}
