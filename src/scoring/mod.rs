//! Documentation scoring
//!
//! Three independent scores, each in [0, 1] with 1.0 best:
//!
//! ```text
//! Completeness = |elements mentioned in docs| / |elements in source|   (1.0 if none)
//! Clarity      = 1 - clamp((avg_sentence_len - 15) / 25, 0, 1)         (0.0 if empty)
//! Accuracy     = Wn × ngram(doc, ref) + Ws × cosine(embed(doc), embed(ref))
//!
//! Aggregate    = Completeness × W₁ + Clarity × W₂ + Accuracy × W₃
//! ```
//!
//! When accuracy is not computable, the aggregate is taken over the two
//! remaining scores with their weights renormalized, and flagged partial.

mod accuracy;
mod clarity;
mod completeness;
mod ngram;

pub use accuracy::AccuracyScorer;
#[cfg(test)]
pub(crate) use accuracy::tests as accuracy_test_support;
pub use clarity::{
    clarity_from_average, clarity_stats, evaluate_clarity, TARGET_SENTENCE_LENGTH, TOLERANCE,
};
pub use completeness::{completeness_detail, evaluate_completeness};
pub use ngram::{ngram_overlap, normalize_tokens};

use crate::config::ScoreWeights;
use crate::models::clamp_score;

/// Weighted aggregate of the three scores.
///
/// Returns `(aggregate, partial)`; `partial` is true when accuracy was
/// missing and only completeness and clarity contributed.
pub fn aggregate_score(
    weights: &ScoreWeights,
    completeness: f64,
    clarity: f64,
    accuracy: Option<f64>,
) -> (f64, bool) {
    match accuracy {
        Some(acc) => (
            clamp_score(
                weights.completeness * completeness
                    + weights.clarity * clarity
                    + weights.accuracy * acc,
            ),
            false,
        ),
        None => {
            let remaining = weights.completeness + weights.clarity;
            if remaining <= 0.0 {
                return (0.0, true);
            }
            let sum = weights.completeness * completeness + weights.clarity * clarity;
            (clamp_score(sum / remaining), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_is_weighted_sum() {
        let w = ScoreWeights::default();
        let (agg, partial) = aggregate_score(&w, 0.5, 1.0, Some(0.8));
        assert!(!partial);
        assert!((agg - (0.4 * 0.5 + 0.3 * 1.0 + 0.3 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_without_accuracy_renormalizes() {
        let w = ScoreWeights::default();
        let (agg, partial) = aggregate_score(&w, 1.0, 0.0, None);
        assert!(partial);
        assert!((agg - 0.4 / 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_only_accuracy_weighted_and_missing() {
        let w = ScoreWeights {
            completeness: 0.0,
            clarity: 0.0,
            accuracy: 1.0,
        };
        assert_eq!(aggregate_score(&w, 1.0, 1.0, None), (0.0, true));
    }

    #[test]
    fn test_aggregate_always_bounded() {
        let w = ScoreWeights {
            completeness: 0.9,
            clarity: 0.9,
            accuracy: 0.9,
        };
        for c in [0.0, 0.5, 1.0] {
            for l in [0.0, 0.5, 1.0] {
                for a in [None, Some(0.0), Some(1.0)] {
                    let (agg, _) = aggregate_score(&w, c, l, a);
                    assert!((0.0..=1.0).contains(&agg));
                }
            }
        }
    }
}
