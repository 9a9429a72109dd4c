//! docscore - Documentation evaluation engine
//!
//! Scores generated source-code documentation against the code it describes:
//!
//! - **Completeness**: share of extracted functions, classes, and methods the
//!   documentation mentions
//! - **Clarity**: readability from average sentence length
//! - **Accuracy**: n-gram overlap with a reference, optionally blended with
//!   embedding similarity from an external service
//!
//! ```rust,ignore
//! use docscore::{DocEvaluator, EvaluatorConfig};
//!
//! let evaluator = DocEvaluator::new(EvaluatorConfig::default())?;
//! let report = evaluator.evaluate(source, documentation, Some(reference));
//! println!("{} ({:.2})", report.grade, report.aggregate);
//! ```

pub mod ai;
pub mod batch;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod text;

pub use config::{EvaluatorConfig, ScoreWeights};
pub use error::{EvalError, EvalResult};
pub use evaluator::DocEvaluator;
pub use extract::{extract_elements, Language};
pub use models::{AccuracyOutcome, BatchSummary, EvaluationReport};
