//! Evaluation facade
//!
//! [`DocEvaluator`] owns the configuration fixed at construction (weights,
//! semantic backend, credential) and exposes the four scoring operations.
//! It holds no mutable state, so one instance can be shared across threads.

use crate::ai::{AiError, Embedder, EmbeddingClient};
use crate::config::{EvaluatorConfig, ScoreWeights};
use crate::error::{EvalError, EvalResult};
use crate::extract::Language;
use crate::models::{grade_from_score, AccuracyOutcome, EvaluationReport};
use crate::scoring::{self, AccuracyScorer};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DocEvaluator {
    weights: ScoreWeights,
    accuracy: AccuracyScorer,
}

impl Default for DocEvaluator {
    /// Default weights, no semantic backend
    fn default() -> Self {
        let config = EvaluatorConfig::default();
        Self {
            weights: config.weights,
            accuracy: AccuracyScorer::new(config.accuracy, None),
        }
    }
}

impl DocEvaluator {
    /// Build an evaluator from configuration.
    ///
    /// When semantic scoring is enabled, the embedding client is created
    /// here; a missing credential is a configuration error, not a warning.
    pub fn new(config: EvaluatorConfig) -> EvalResult<Self> {
        Self::with_env(config, |name| std::env::var(name).ok())
    }

    /// [`DocEvaluator::new`] with environment variables read through `lookup`.
    pub fn with_env(
        config: EvaluatorConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> EvalResult<Self> {
        config.validate()?;

        let embedder: Option<Arc<dyn Embedder>> = if config.semantic.enabled {
            let client = EmbeddingClient::with_credential_lookup(
                config.semantic.embedding_config(),
                config.credential.as_deref(),
                lookup,
            )
            .map_err(|e| match e {
                AiError::MissingApiKey { .. } | AiError::ConfigError(_) => {
                    EvalError::Configuration(e.to_string())
                }
                other => EvalError::ExternalService(other),
            })?;
            Some(Arc::new(client))
        } else {
            None
        };

        Ok(Self::build(config, embedder))
    }

    /// Build an evaluator with an injected embedding capability.
    pub fn with_embedder(config: EvaluatorConfig, embedder: Arc<dyn Embedder>) -> EvalResult<Self> {
        config.validate()?;
        Ok(Self::build(config, Some(embedder)))
    }

    fn build(config: EvaluatorConfig, embedder: Option<Arc<dyn Embedder>>) -> Self {
        let weights = config.weights;
        if (weights.total() - 1.0).abs() > 1e-9 {
            debug!(
                "Aggregate weights sum to {:.3}; the weighted sum is clamped to [0, 1]",
                weights.total()
            );
        }

        let accuracy = AccuracyScorer::new(config.accuracy, embedder);
        match accuracy.semantic_model() {
            Some(model) => info!("DocEvaluator initialized with semantic model {}", model),
            None => info!("DocEvaluator initialized without semantic scoring"),
        }

        Self { weights, accuracy }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn semantic_model(&self) -> Option<&str> {
        self.accuracy.semantic_model()
    }

    pub fn evaluate_completeness(&self, source: &str, documentation: &str) -> f64 {
        scoring::evaluate_completeness(source, documentation)
    }

    pub fn evaluate_clarity(&self, documentation: &str) -> f64 {
        scoring::evaluate_clarity(documentation)
    }

    pub fn evaluate_accuracy(
        &self,
        source: &str,
        documentation: &str,
        reference: Option<&str>,
    ) -> AccuracyOutcome {
        self.accuracy.score(source, documentation, reference)
    }

    /// Run all three scorers and assemble a report.
    pub fn evaluate(
        &self,
        source: &str,
        documentation: &str,
        reference: Option<&str>,
    ) -> EvaluationReport {
        self.evaluate_with_language(source, documentation, reference, None)
    }

    pub fn evaluate_with_language(
        &self,
        source: &str,
        documentation: &str,
        reference: Option<&str>,
        language: Option<Language>,
    ) -> EvaluationReport {
        let (completeness, completeness_detail) =
            scoring::completeness_detail(source, documentation, language);
        let clarity_detail = scoring::clarity_stats(documentation);
        let clarity = scoring::evaluate_clarity(documentation);
        let accuracy_detail = self.accuracy.score(source, documentation, reference);
        let accuracy = accuracy_detail.score();

        let (aggregate, aggregate_partial) =
            scoring::aggregate_score(&self.weights, completeness, clarity, accuracy);

        let mut warnings = accuracy_detail.warnings();
        if aggregate_partial {
            warnings.push(
                "accuracy not computable; aggregate uses completeness and clarity only"
                    .to_string(),
            );
        }

        debug!(
            "completeness={:.3} clarity={:.3} accuracy={} aggregate={:.3}",
            completeness, clarity, accuracy_detail, aggregate
        );

        EvaluationReport {
            completeness,
            clarity,
            accuracy,
            aggregate,
            aggregate_partial,
            grade: grade_from_score(aggregate),
            language: language.filter(Language::is_known),
            completeness_detail,
            clarity_detail,
            accuracy_detail,
            warnings,
        }
    }

    /// Read the files and evaluate them. The source file's extension picks
    /// the extraction rules.
    pub fn evaluate_files(
        &self,
        source_path: &Path,
        doc_path: &Path,
        reference_path: Option<&Path>,
        language: Option<Language>,
    ) -> anyhow::Result<EvaluationReport> {
        let source = read_text(source_path)?;
        let documentation = read_text(doc_path)?;
        let reference = reference_path.map(read_text).transpose()?;

        let language = language.or_else(|| {
            let detected = Language::from_path(source_path);
            detected.is_known().then_some(detected)
        });

        Ok(self.evaluate_with_language(&source, &documentation, reference.as_deref(), language))
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::EmbeddingBackend;
    use crate::scoring::accuracy_test_support::{DownEmbedder, LetterEmbedder};

    const SOURCE: &str = "def foo(): pass\ndef bar(): pass";

    #[test]
    fn test_scenarios() {
        let ev = DocEvaluator::default();
        assert_eq!(ev.evaluate_completeness(SOURCE, "This module defines foo."), 0.5);
        assert_eq!(ev.evaluate_clarity("Do X. Do Y. Do Z."), 1.0);
        assert_eq!(ev.evaluate_clarity(""), 0.0);
    }

    #[test]
    fn test_report_without_reference_is_partial() {
        let ev = DocEvaluator::default();
        let report = ev.evaluate(SOURCE, "Defines foo and bar.", None);
        assert_eq!(report.completeness, 1.0);
        assert_eq!(report.clarity, 1.0);
        assert_eq!(report.accuracy, None);
        assert!(report.aggregate_partial);
        assert_eq!(report.aggregate, 1.0);
        assert!(matches!(report.accuracy_detail, AccuracyOutcome::NotComputable { .. }));
        assert!(!report.warnings.is_empty());
    }

    #[test]
    fn test_report_aggregate_is_weighted_sum() {
        let ev = DocEvaluator::with_embedder(EvaluatorConfig::default(), Arc::new(LetterEmbedder))
            .unwrap();
        let doc = "Defines foo. It returns nothing.";
        let report = ev.evaluate(SOURCE, doc, Some("Defines foo and bar."));
        let acc = report.accuracy.expect("accuracy computed");
        let expected = 0.4 * report.completeness + 0.3 * report.clarity + 0.3 * acc;
        assert!(!report.aggregate_partial);
        assert!((report.aggregate - expected).abs() < 1e-12);
    }

    #[test]
    fn test_identical_reference_scores_full_accuracy() {
        let ev = DocEvaluator::with_embedder(EvaluatorConfig::default(), Arc::new(LetterEmbedder))
            .unwrap();
        let doc = "Defines foo and bar.";
        let report = ev.evaluate(SOURCE, doc, Some(doc));
        assert_eq!(report.accuracy, Some(1.0));
        assert_eq!(report.aggregate, 1.0);
        assert_eq!(report.grade, "A");
    }

    #[test]
    fn test_semantic_outage_does_not_block_other_scores() {
        let ev = DocEvaluator::with_embedder(
            EvaluatorConfig::default(),
            Arc::new(DownEmbedder::default()),
        )
        .unwrap();
        let report = ev.evaluate(SOURCE, "Defines foo.", Some("Defines foo and bar."));
        assert_eq!(report.completeness, 0.5);
        assert_eq!(report.clarity, 1.0);
        let AccuracyOutcome::Measured(b) = &report.accuracy_detail else {
            panic!("expected n-gram fallback")
        };
        assert!(b.degraded);
        assert_eq!(report.warnings.len(), 1);

        let report = ev.evaluate(SOURCE, "Defines foo.", None);
        assert_eq!(report.accuracy, None);
        assert!(report.aggregate_partial);
    }

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let mut config = EvaluatorConfig::default().with_semantic(true);
        config.semantic.backend = EmbeddingBackend::OpenAi;
        config.credential = Some("   ".to_string());
        let result = DocEvaluator::with_env(config, |_| None);
        assert!(matches!(result, Err(EvalError::Configuration(_))));
    }

    #[test]
    fn test_credential_from_environment_lookup() {
        let config = EvaluatorConfig::default().with_semantic(true);
        let env = |name: &str| (name == crate::ai::API_KEY_ENV).then(|| "sk-env".to_string());
        let ev = DocEvaluator::with_env(config, env).unwrap();
        assert_eq!(ev.semantic_model(), Some("text-embedding-3-small"));
    }

    #[test]
    fn test_explicit_credential_builds_semantic_evaluator() {
        let config = EvaluatorConfig::default()
            .with_semantic(true)
            .with_credential("sk-test");
        let ev = DocEvaluator::new(config).unwrap();
        assert_eq!(ev.semantic_model(), Some("text-embedding-3-small"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EvaluatorConfig::default();
        config.weights.accuracy = -0.3;
        assert!(matches!(DocEvaluator::new(config), Err(EvalError::Configuration(_))));
    }

    fn with_weights(completeness: f64, clarity: f64, accuracy: f64) -> DocEvaluator {
        let mut config = EvaluatorConfig::default();
        config.weights.completeness = completeness;
        config.weights.clarity = clarity;
        config.weights.accuracy = accuracy;
        DocEvaluator::new(config).unwrap()
    }

    #[test]
    fn test_non_unit_weights_are_used_as_configured() {
        let ev = with_weights(0.5, 0.5, 0.5);
        assert_eq!(ev.weights().completeness, 0.5);
        assert_eq!(ev.weights().total(), 1.5);

        let doc = "Defines foo and nothing else.";
        let report = ev.evaluate(SOURCE, doc, Some(doc));
        assert_eq!(report.completeness, 0.5);
        assert_eq!(report.clarity, 1.0);
        assert_eq!(report.accuracy, Some(1.0));
        // 0.25 + 0.5 + 0.5 clamps to 1.0
        assert_eq!(report.aggregate, 1.0);
    }

    #[test]
    fn test_aggregate_is_configured_weighted_sum_below_one() {
        let ev = with_weights(0.2, 0.2, 0.2);
        let doc = "Defines foo and nothing else.";
        let report = ev.evaluate(SOURCE, doc, Some(doc));
        let expected = 0.2 * 0.5 + 0.2 * 1.0 + 0.2 * 1.0;
        assert!(!report.aggregate_partial);
        assert!((report.aggregate - expected).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_files_detects_language() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("util.py");
        let doc = dir.path().join("util.md");
        std::fs::write(&src, "def helper():\n    pass\n").unwrap();
        std::fs::write(&doc, "The helper function does nothing.").unwrap();

        let ev = DocEvaluator::default();
        let report = ev.evaluate_files(&src, &doc, None, None).unwrap();
        assert_eq!(report.language, Some(Language::Python));
        assert_eq!(report.completeness, 1.0);

        assert!(ev
            .evaluate_files(&dir.path().join("missing.py"), &doc, None, None)
            .is_err());
    }
}
