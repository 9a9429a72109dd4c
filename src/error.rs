//! Error types for the evaluation engine

use crate::ai::AiError;
use thiserror::Error;

/// Errors surfaced by the evaluator.
///
/// Completeness and clarity never fail; only configuration and the external
/// embedding capability can produce errors, and accuracy scoring absorbs
/// the latter by degrading instead of propagating.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External service error: {0}")]
    ExternalService(#[from] AiError),

    #[error("Invalid input: {0}")]
    Input(String),
}

pub type EvalResult<T> = Result<T, EvalError>;
