//! N-gram extraction over token sequences.

use std::collections::HashMap;
use std::hash::Hash;
use std::slice::Windows;

/// Occurrence counts of the n-grams of one sentence. Keys borrow from the
/// sentence they were extracted from.
pub type NgramCounts<'a, T> = HashMap<&'a [T], usize>;

/// Sliding window of width `n` over `tokens`. Yields nothing when the
/// sentence is shorter than `n`.
///
/// # Panics
///
/// Panics if `n` is 0.
pub fn ngrams<T>(tokens: &[T], n: usize) -> Windows<'_, T> {
    tokens.windows(n)
}

/// Counts every n-gram of order `n` in `tokens`.
///
/// # Panics
///
/// Panics if `n` is 0.
pub fn count_ngrams<T: Eq + Hash>(tokens: &[T], n: usize) -> NgramCounts<'_, T> {
    let mut counts = HashMap::new();
    for gram in ngrams(tokens, n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}
