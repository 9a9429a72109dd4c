//! Readability heuristic based on average sentence length

use crate::models::{clamp_score, ClarityStats};
use crate::text::{split_sentences, word_count};

/// Average sentence length (in words) at or below which clarity is 1.0
pub const TARGET_SENTENCE_LENGTH: f64 = 15.0;

/// Words past the target over which clarity decays linearly to 0.0
pub const TOLERANCE: f64 = 25.0;

/// Clarity of `documentation` in [0, 1]. Empty or wordless text scores 0.0.
pub fn evaluate_clarity(documentation: &str) -> f64 {
    let stats = clarity_stats(documentation);
    if stats.sentences == 0 || stats.words == 0 {
        return 0.0;
    }
    clarity_from_average(stats.avg_sentence_length)
}

pub fn clarity_stats(documentation: &str) -> ClarityStats {
    let sentences = split_sentences(documentation).len();
    let words = word_count(documentation);
    let avg_sentence_length = if sentences == 0 {
        0.0
    } else {
        words as f64 / sentences as f64
    };
    ClarityStats {
        sentences,
        words,
        avg_sentence_length,
    }
}

/// `1 - clamp((avg - 15) / 25, 0, 1)`
pub fn clarity_from_average(avg_sentence_length: f64) -> f64 {
    let penalty = ((avg_sentence_length - TARGET_SENTENCE_LENGTH) / TOLERANCE).clamp(0.0, 1.0);
    clamp_score(1.0 - penalty)
}
