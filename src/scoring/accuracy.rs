//! Accuracy scoring against a reference, or against the source as fallback
//!
//! | reference | embedder | result |
//! |---|---|---|
//! | yes | none | n-gram score |
//! | yes | ok | Wn × n-gram + Ws × semantic |
//! | yes | fails | n-gram score, degraded + warning |
//! | no | ok | semantic(doc, source), basis `SourceConsistency` |
//! | no | none / fails | `NotComputable` |

use super::ngram::ngram_overlap;
use crate::ai::Embedder;
use crate::config::AccuracyWeights;
use crate::models::{clamp_score, AccuracyBasis, AccuracyBreakdown, AccuracyOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct AccuracyScorer {
    weights: AccuracyWeights,
    embedder: Option<Arc<dyn Embedder>>,
}

impl AccuracyScorer {
    pub fn new(weights: AccuracyWeights, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self { weights, embedder }
    }

    pub fn semantic_model(&self) -> Option<&str> {
        self.embedder.as_deref().map(|e| e.model())
    }

    pub fn score(&self, source: &str, documentation: &str, reference: Option<&str>) -> AccuracyOutcome {
        match reference {
            Some(reference) => self.against_reference(documentation, reference),
            None => self.against_source(source, documentation),
        }
    }

    fn against_reference(&self, documentation: &str, reference: &str) -> AccuracyOutcome {
        let ngram = ngram_overlap(documentation, reference, self.weights.max_ngram);

        let Some(embedder) = self.embedder.as_deref() else {
            return AccuracyOutcome::Measured(AccuracyBreakdown {
                score: ngram,
                basis: AccuracyBasis::Reference,
                ngram: Some(ngram),
                semantic: None,
                degraded: false,
                warnings: vec![],
            });
        };

        match embedder.similarity(documentation, reference) {
            Ok(semantic) => {
                let (wn, ws) = self.weights.normalized();
                let score = clamp_score(wn * ngram + ws * semantic);
                debug!("accuracy: ngram={:.3} semantic={:.3} -> {:.3}", ngram, semantic, score);
                AccuracyOutcome::Measured(AccuracyBreakdown {
                    score,
                    basis: AccuracyBasis::Reference,
                    ngram: Some(ngram),
                    semantic: Some(semantic),
                    degraded: false,
                    warnings: vec![],
                })
            }
            Err(e) => {
                let message = format!(
                    "semantic similarity unavailable ({}); accuracy uses n-gram overlap only",
                    e
                );
                warn!("{}", message);
                AccuracyOutcome::Measured(AccuracyBreakdown {
                    score: ngram,
                    basis: AccuracyBasis::Reference,
                    ngram: Some(ngram),
                    semantic: None,
                    degraded: true,
                    warnings: vec![message],
                })
            }
        }
    }

    fn against_source(&self, source: &str, documentation: &str) -> AccuracyOutcome {
        let Some(embedder) = self.embedder.as_deref() else {
            return AccuracyOutcome::NotComputable {
                reason: "no reference documentation and no semantic similarity backend configured"
                    .to_string(),
            };
        };

        match embedder.similarity(documentation, source) {
            Ok(semantic) => {
                let score = clamp_score(semantic);
                debug!("accuracy (source consistency): {:.3}", score);
                AccuracyOutcome::Measured(AccuracyBreakdown {
                    score,
                    basis: AccuracyBasis::SourceConsistency,
                    ngram: None,
                    semantic: Some(score),
                    degraded: false,
                    warnings: vec![],
                })
            }
            Err(e) => {
                let reason = format!(
                    "no reference documentation and semantic similarity failed: {}",
                    e
                );
                warn!("{}", reason);
                AccuracyOutcome::NotComputable { reason }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ai::{AiError, AiResult};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic bag-of-letters embedding
    pub(crate) struct LetterEmbedder;

    impl Embedder for LetterEmbedder {
        fn embed(&self, text: &str) -> AiResult<Vec<f32>> {
            let mut v = vec![0.0_f32; 26];
            for c in text.to_lowercase().chars() {
                if c.is_ascii_lowercase() {
                    v[(c as u8 - b'a') as usize] += 1.0;
                }
            }
            Ok(v)
        }

        fn model(&self) -> &str {
            "letters"
        }
    }

    /// Always fails, counting calls
    #[derive(Default)]
    pub(crate) struct DownEmbedder {
        pub calls: AtomicUsize,
    }

    impl Embedder for DownEmbedder {
        fn embed(&self, _text: &str) -> AiResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AiError::Timeout(1))
        }

        fn model(&self) -> &str {
            "down"
        }
    }

    const DOC: &str = "Parses the manifest and returns the dependency list.";

    #[test]
    fn test_identical_reference_is_one() {
        let scorer = AccuracyScorer::new(AccuracyWeights::default(), Some(Arc::new(LetterEmbedder)));
        let outcome = scorer.score("fn parse() {}", DOC, Some(DOC));
        assert_eq!(outcome.score(), Some(1.0));
        let AccuracyOutcome::Measured(b) = outcome else {
            panic!("expected measured")
        };
        assert_eq!(b.ngram, Some(1.0));
        assert_eq!(b.semantic, Some(1.0));
        assert!(!b.degraded);
    }

    #[test]
    fn test_identical_reference_without_semantic_is_one() {
        let scorer = AccuracyScorer::new(AccuracyWeights::default(), None);
        assert_eq!(scorer.score("", DOC, Some(DOC)).score(), Some(1.0));
    }

    #[test]
    fn test_weighted_combination() {
        let weights = AccuracyWeights {
            ngram: 1.0,
            semantic: 3.0,
            max_ngram: 4,
        };
        let scorer = AccuracyScorer::new(weights, Some(Arc::new(LetterEmbedder)));
        let reference = "Reads the manifest file and lists dependencies.";
        let AccuracyOutcome::Measured(b) = scorer.score("", DOC, Some(reference)) else {
            panic!("expected measured")
        };
        let expected = 0.25 * b.ngram.unwrap() + 0.75 * b.semantic.unwrap();
        assert!((b.score - expected).abs() < 1e-12);
        assert!(b.score > 0.0 && b.score < 1.0);
    }

    #[test]
    fn test_semantic_failure_degrades_to_ngram() {
        let down = Arc::new(DownEmbedder::default());
        let scorer = AccuracyScorer::new(AccuracyWeights::default(), Some(down.clone()));
        let reference = "Parses the manifest file.";
        let outcome = scorer.score("", DOC, Some(reference));
        let AccuracyOutcome::Measured(b) = outcome else {
            panic!("expected measured")
        };
        assert!(b.degraded);
        assert_eq!(b.semantic, None);
        assert_eq!(Some(b.score), b.ngram);
        assert_eq!(b.warnings.len(), 1);
        assert!(down.calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_no_reference_no_semantic_is_not_computable() {
        let scorer = AccuracyScorer::new(AccuracyWeights::default(), None);
        let outcome = scorer.score("def foo(): pass", "Defines foo.", None);
        assert!(!outcome.is_computable());
        assert_eq!(outcome.score(), None);
    }

    #[test]
    fn test_no_reference_semantic_failure_is_not_computable() {
        let scorer = AccuracyScorer::new(
            AccuracyWeights::default(),
            Some(Arc::new(DownEmbedder::default())),
        );
        let outcome = scorer.score("def foo(): pass", "Defines foo.", None);
        assert!(matches!(outcome, AccuracyOutcome::NotComputable { .. }));
    }

    #[test]
    fn test_no_reference_uses_source_consistency() {
        let scorer = AccuracyScorer::new(AccuracyWeights::default(), Some(Arc::new(LetterEmbedder)));
        let AccuracyOutcome::Measured(b) = scorer.score("def foo(): pass", "Defines foo.", None)
        else {
            panic!("expected measured")
        };
        assert_eq!(b.basis, AccuracyBasis::SourceConsistency);
        assert_eq!(b.ngram, None);
        assert!(b.score > 0.0 && b.score <= 1.0);
    }
}
