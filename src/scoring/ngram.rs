//! N-gram overlap between candidate and reference documentation
//!
//! For each order n in 1..=N, clipped n-gram matches give a precision
//! (over candidate n-grams) and a recall (over reference n-grams), combined
//! as F1. The per-order F1 values are averaged geometrically and multiplied
//! by a BLEU-style brevity penalty so short candidates cannot score well by
//! saying little.

use crate::models::clamp_score;
use crate::text::tokenize_words;
use rustc_hash::FxHashMap;

/// Numerator used for an order with zero matches, so a single missing order
/// does not zero the geometric mean
const SMOOTHING_EPSILON: f64 = 0.1;

/// Lowercased word tokens
pub fn normalize_tokens(text: &str) -> Vec<String> {
    tokenize_words(text)
        .into_iter()
        .map(|t| t.to_lowercase())
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> FxHashMap<&[String], u32> {
    let mut counts = FxHashMap::default();
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Overlap score in [0, 1]; identical texts score 1.0.
///
/// The highest order compared is `max_n` capped at the shorter token count.
/// Two wordless texts are identical (1.0); one wordless text scores 0.0.
pub fn ngram_overlap(candidate: &str, reference: &str, max_n: usize) -> f64 {
    let cand = normalize_tokens(candidate);
    let refs = normalize_tokens(reference);

    match (cand.is_empty(), refs.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    let order = max_n.max(1).min(cand.len()).min(refs.len());
    let mut log_sum = 0.0;

    for n in 1..=order {
        let cand_counts = ngram_counts(&cand, n);
        let ref_counts = ngram_counts(&refs, n);

        let clipped: u32 = cand_counts
            .iter()
            .map(|(gram, &c)| c.min(*ref_counts.get(gram).unwrap_or(&0)))
            .sum();

        let cand_total = (cand.len() - n + 1) as f64;
        let ref_total = (refs.len() - n + 1) as f64;
        let matches = if clipped == 0 {
            SMOOTHING_EPSILON
        } else {
            f64::from(clipped)
        };

        let precision = matches / cand_total;
        let recall = matches / ref_total;
        let f1 = 2.0 * precision * recall / (precision + recall);
        log_sum += f1.ln();
    }

    let geometric_mean = (log_sum / order as f64).exp();

    let c = cand.len() as f64;
    let r = refs.len() as f64;
    let brevity_penalty = if c < r { (1.0 - r / c).exp() } else { 1.0 };

    clamp_score(geometric_mean * brevity_penalty)
}
