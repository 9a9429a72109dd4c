//! Configuration module for docscore
//!
//! This module handles:
//! - Project-level configuration (docscore.toml / .docscorerc.json)
//! - Aggregate and accuracy weighting
//! - Semantic scoring backend, model, timeout, and credential

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, AccuracyWeights, CliDefaults, EvaluatorConfig,
    ScoreWeights, SemanticConfig, EXAMPLE_CONFIG,
};
