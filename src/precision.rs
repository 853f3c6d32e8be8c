//! Modified n-gram precision, the per-order term of BLEU.
//!
//! Each distinct candidate n-gram is credited at most as many times as it
//! occurs in the single reference that contains it most often.

use std::hash::Hash;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use log::trace;

use crate::error::{Error, Result};
use crate::ngram::count_ngrams;

/// Clipped matches over candidate n-grams for one order.
///
/// Kept unreduced so that corpus scores can be micro-averaged: add the
/// counts of every sentence first, then call [`PrecisionCounts::precision`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecisionCounts {
    pub clipped: usize,
    pub total: usize,
}

impl PrecisionCounts {
    /// `clipped / total`, or 0.0 when the candidate had no n-grams.
    pub fn precision(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.clipped as f64 / self.total as f64
        }
    }
}

impl Add for PrecisionCounts {
    type Output = PrecisionCounts;

    fn add(self, other: PrecisionCounts) -> PrecisionCounts {
        PrecisionCounts {
            clipped: self.clipped + other.clipped,
            total: self.total + other.total,
        }
    }
}

impl AddAssign for PrecisionCounts {
    fn add_assign(&mut self, other: PrecisionCounts) {
        self.clipped += other.clipped;
        self.total += other.total;
    }
}

impl Sum for PrecisionCounts {
    fn sum<I: Iterator<Item = PrecisionCounts>>(iter: I) -> Self {
        iter.fold(PrecisionCounts::default(), Add::add)
    }
}

/// Modified precision of `candidate` against `references` for n-grams of
/// order `n`.
///
/// Returns 0.0 when the candidate is shorter than `n` or when there are no
/// references. Fails only for `n == 0`.
///
/// ```
/// use mt_toolkit::modified_precision;
///
/// let references = vec![
///     "the cat is on the mat".split_whitespace().collect::<Vec<_>>(),
///     "there is a cat on the mat".split_whitespace().collect::<Vec<_>>(),
/// ];
/// let candidate: Vec<&str> = "the the the the the the the".split_whitespace().collect();
/// assert_eq!(modified_precision(&references, &candidate, 1).unwrap(), 2.0 / 7.0);
/// ```
pub fn modified_precision<T, R>(references: &[R], candidate: &[T], n: usize) -> Result<f64>
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    modified_precision_counts(references, candidate, n).map(|counts| counts.precision())
}

pub fn modified_precision_counts<T, R>(
    references: &[R],
    candidate: &[T],
    n: usize,
) -> Result<PrecisionCounts>
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    if n == 0 {
        return Err(Error::InvalidOrder);
    }

    let candidate_counts = count_ngrams(candidate, n);
    let total: usize = candidate_counts.values().sum();
    if total == 0 {
        return Ok(PrecisionCounts::default());
    }

    let reference_counts: Vec<_> = references
        .iter()
        .map(|reference| count_ngrams(reference.as_ref(), n))
        .collect();

    let clipped = candidate_counts
        .iter()
        .map(|(gram, &count)| {
            let max_ref_count = reference_counts
                .iter()
                .filter_map(|counts| counts.get(*gram))
                .copied()
                .max()
                .unwrap_or(0);
            count.min(max_ref_count)
        })
        .sum();

    trace!("order {}: {} of {} n-grams matched", n, clipped, total);
    Ok(PrecisionCounts { clipped, total })
}

/// Counts for every order from 1 through `max_order`.
pub fn precision_by_order<T, R>(
    references: &[R],
    candidate: &[T],
    max_order: usize,
) -> Result<Vec<PrecisionCounts>>
where
    T: Eq + Hash,
    R: AsRef<[T]>,
{
    if max_order == 0 {
        return Err(Error::InvalidOrder);
    }
    (1..=max_order)
        .map(|n| modified_precision_counts(references, candidate, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    fn guide_references() -> Vec<Vec<&'static str>> {
        vec![
            words(
                "It is a guide to action that ensures that the military \
                 will forever heed Party commands",
            ),
            words(
                "It is the guiding principle which guarantees the military \
                 forces always being under the command of the Party",
            ),
            words(
                "It is the practical guide for the army always to heed \
                 the directions of the party",
            ),
        ]
    }

    #[test]
    fn test_repeated_word() {
        let references = vec![
            words("the cat is on the mat"),
            words("there is a cat on the mat"),
        ];
        let hyp = words("the the the the the the the");

        assert_eq!(
            modified_precision(&references, &hyp, 1).unwrap(),
            0.2857142857142857
        );
        assert_eq!(modified_precision(&references, &hyp, 2).unwrap(), 0.0);
        assert_eq!(
            modified_precision_counts(&references, &hyp, 1).unwrap(),
            PrecisionCounts {
                clipped: 2,
                total: 7
            }
        );
    }

    #[test]
    fn test_short_hypothesis() {
        let references = guide_references();
        let hyp = words("of the");

        assert_eq!(modified_precision(&references, &hyp, 1).unwrap(), 1.0);
        assert_eq!(modified_precision(&references, &hyp, 2).unwrap(), 1.0);
    }

    #[test]
    fn test_proper_translations() {
        let references = guide_references();
        let hyp1 = words(
            "It is a guide to action which ensures that the military \
             always obeys the commands of the party",
        );
        let hyp2 = words(
            "It is to insure the troops forever hearing the activity \
             guidebook that party direct",
        );

        assert_eq!(
            modified_precision_counts(&references, &hyp1, 1).unwrap(),
            PrecisionCounts {
                clipped: 17,
                total: 18
            }
        );
        assert_eq!(
            modified_precision(&references, &hyp1, 1).unwrap(),
            0.9444444444444444
        );
        assert_eq!(
            modified_precision(&references, &hyp2, 1).unwrap(),
            0.5714285714285714
        );
        assert_eq!(
            modified_precision(&references, &hyp1, 2).unwrap(),
            0.5882352941176471
        );
        assert_eq!(
            modified_precision(&references, &hyp2, 2).unwrap(),
            0.07692307692307693
        );
    }

    #[test]
    fn test_empty_candidate() {
        let references = guide_references();
        let hyp: Vec<&str> = Vec::new();

        assert_eq!(modified_precision(&references, &hyp, 1).unwrap(), 0.0);
        assert_eq!(
            modified_precision_counts(&references, &hyp, 1).unwrap(),
            PrecisionCounts::default()
        );
    }

    #[test]
    fn test_candidate_shorter_than_order() {
        let references = guide_references();
        assert_eq!(
            modified_precision(&references, &words("of the"), 3).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_no_references() {
        let references: Vec<Vec<&str>> = Vec::new();
        let hyp = words("the cat");

        assert_eq!(
            modified_precision_counts(&references, &hyp, 1).unwrap(),
            PrecisionCounts {
                clipped: 0,
                total: 2
            }
        );
        assert_eq!(modified_precision(&references, &hyp, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_order_is_rejected() {
        let references = vec![words("the cat")];
        assert!(matches!(
            modified_precision(&references, &words("the cat"), 0),
            Err(Error::InvalidOrder)
        ));
        assert!(matches!(
            precision_by_order(&references, &words("the cat"), 0),
            Err(Error::InvalidOrder)
        ));
    }

    #[test]
    fn test_max_not_sum_of_references() {
        // "a" occurs once in each reference; the sum would allow 3 matches.
        let references = vec![words("a b"), words("a c"), words("a d")];
        let hyp = words("a a a");
        assert_eq!(
            modified_precision_counts(&references, &hyp, 1).unwrap(),
            PrecisionCounts {
                clipped: 1,
                total: 3
            }
        );
    }

    #[test]
    fn test_owned_tokens() {
        let references: Vec<Vec<String>> = vec![vec!["x".to_string(), "y".to_string()]];
        let hyp: Vec<String> = vec!["y".to_string(), "z".to_string()];
        assert_eq!(modified_precision(&references, &hyp, 1).unwrap(), 0.5);
    }

    #[test]
    fn test_precision_by_order() {
        let references = guide_references();
        let hyp = words("of the");
        let counts = precision_by_order(&references, &hyp, 3).unwrap();
        assert_eq!(
            counts,
            vec![
                PrecisionCounts {
                    clipped: 2,
                    total: 2
                },
                PrecisionCounts {
                    clipped: 1,
                    total: 1
                },
                PrecisionCounts::default(),
            ]
        );
    }

    #[test]
    fn test_counts_micro_average() {
        let a = PrecisionCounts {
            clipped: 1,
            total: 4,
        };
        let b = PrecisionCounts {
            clipped: 3,
            total: 4,
        };
        let mut acc = PrecisionCounts::default();
        acc += a;
        acc += b;
        assert_eq!(acc, a + b);
        assert_eq!(vec![a, b].into_iter().sum::<PrecisionCounts>(), acc);
        assert_eq!(acc.precision(), 0.5);
        assert_eq!(PrecisionCounts::default().precision(), 0.0);
    }

    #[test]
    fn test_random_sentences_stay_in_bounds() {
        let vocab = ["a", "b", "c", "d", "e"];
        let mut rng = StdRng::seed_from_u64(7);
        let sentence = |rng: &mut StdRng| -> Vec<&'static str> {
            let len = rng.gen_range(0..12);
            (0..len).map(|_| *vocab.choose(rng).unwrap()).collect()
        };

        for _ in 0..500 {
            let ref_count = rng.gen_range(0..4);
            let references: Vec<Vec<&str>> = (0..ref_count).map(|_| sentence(&mut rng)).collect();
            let hyp = sentence(&mut rng);
            let n = rng.gen_range(1..5);

            let counts = modified_precision_counts(&references, &hyp, n).unwrap();
            assert_eq!(counts.total, (hyp.len() + 1).saturating_sub(n));
            assert!(counts.clipped <= counts.total);

            let first = modified_precision(&references, &hyp, n).unwrap();
            let second = modified_precision(&references, &hyp, n).unwrap();
            assert_eq!(first, second);
            assert!((0.0..=1.0).contains(&first));
            if counts.total == 0 {
                assert_eq!(first, 0.0);
            }

            // Clipped credit never exceeds the bound of any single n-gram.
            let hyp_counts = count_ngrams(&hyp, n);
            let bound: usize = hyp_counts
                .iter()
                .map(|(gram, &count)| {
                    let best = references
                        .iter()
                        .map(|r| count_ngrams(r, n).get(*gram).copied().unwrap_or(0))
                        .max()
                        .unwrap_or(0);
                    count.min(best)
                })
                .sum();
            assert_eq!(counts.clipped, bound);
        }
    }
}
