//! Core data models for docscore
//!
//! Scores are plain `f64` values in [0.0, 1.0] with 1.0 best. Every scorer
//! passes its result through [`clamp_score`] so NaN or out-of-range values
//! never escape.

use crate::extract::Language;
use serde::{Deserialize, Serialize};

/// Clamp a raw metric into [0, 1]. NaN maps to 0.0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Letter grade for a [0, 1] score (A >= 0.9, B >= 0.8, C >= 0.7, D >= 0.6)
pub fn grade_from_score(score: f64) -> String {
    match score * 100.0 {
        s if s >= 90.0 => "A".to_string(),
        s if s >= 80.0 => "B".to_string(),
        s if s >= 70.0 => "C".to_string(),
        s if s >= 60.0 => "D".to_string(),
        _ => "F".to_string(),
    }
}

/// Which elements the documentation mentions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessDetail {
    pub total: usize,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Segmentation numbers behind the clarity score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClarityStats {
    pub sentences: usize,
    pub words: usize,
    pub avg_sentence_length: f64,
}

/// What the accuracy score was measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyBasis {
    /// Compared with reference documentation
    Reference,
    /// No reference; semantic similarity between documentation and source
    SourceConsistency,
}

/// A measured accuracy score and the components that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyBreakdown {
    pub score: f64,
    pub basis: AccuracyBasis,
    /// N-gram overlap with the reference, if one was given
    pub ngram: Option<f64>,
    /// Semantic similarity, if the embedding call succeeded
    pub semantic: Option<f64>,
    /// True when a configured semantic component could not be obtained
    pub degraded: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Result of accuracy scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccuracyOutcome {
    Measured(AccuracyBreakdown),
    /// No reference and no usable semantic capability. Not a zero score.
    NotComputable { reason: String },
}

impl AccuracyOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            AccuracyOutcome::Measured(b) => Some(b.score),
            AccuracyOutcome::NotComputable { .. } => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, AccuracyOutcome::Measured(_))
    }

    pub fn warnings(&self) -> Vec<String> {
        match self {
            AccuracyOutcome::Measured(b) => b.warnings.clone(),
            AccuracyOutcome::NotComputable { reason } => vec![reason.clone()],
        }
    }
}

impl std::fmt::Display for AccuracyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccuracyOutcome::Measured(b) => write!(f, "{:.3}", b.score),
            AccuracyOutcome::NotComputable { .. } => write!(f, "not computable"),
        }
    }
}

/// Full evaluation of one (source, documentation[, reference]) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub completeness: f64,
    pub clarity: f64,
    /// `None` when accuracy could not be computed
    pub accuracy: Option<f64>,
    pub aggregate: f64,
    /// True when `aggregate` was computed without the accuracy component
    pub aggregate_partial: bool,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    pub completeness_detail: CompletenessDetail,
    pub clarity_detail: ClarityStats,
    pub accuracy_detail: AccuracyOutcome,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// One file's evaluation within a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEvaluation {
    pub source_path: String,
    pub doc_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_path: Option<String>,
    pub report: EvaluationReport,
}

/// Mean scores over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchAverages {
    pub completeness: f64,
    pub clarity: f64,
    /// Mean over files where accuracy was computable
    pub accuracy: Option<f64>,
    pub aggregate: f64,
}

/// Result of evaluating a whole project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub source_root: String,
    pub docs_root: String,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
    pub files: Vec<FileEvaluation>,
    /// Source files with no matching documentation file
    pub missing_docs: Vec<String>,
    /// Files that could not be read, with the error
    #[serde(default)]
    pub failed: Vec<String>,
    pub averages: BatchAverages,
    pub grade: String,
}

impl BatchAverages {
    pub fn from_files(files: &[FileEvaluation]) -> Self {
        if files.is_empty() {
            return Self::default();
        }
        let n = files.len() as f64;
        let mean = |f: fn(&EvaluationReport) -> f64| {
            clamp_score(files.iter().map(|e| f(&e.report)).sum::<f64>() / n)
        };

        let accuracies: Vec<f64> = files.iter().filter_map(|e| e.report.accuracy).collect();
        let accuracy = if accuracies.is_empty() {
            None
        } else {
            Some(clamp_score(
                accuracies.iter().sum::<f64>() / accuracies.len() as f64,
            ))
        };

        Self {
            completeness: mean(|r| r.completeness),
            clarity: mean(|r| r.clarity),
            accuracy,
            aggregate: mean(|r| r.aggregate),
        }
    }
}
