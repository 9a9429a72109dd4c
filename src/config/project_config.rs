//! Evaluator configuration
//!
//! Loads configuration from `docscore.toml` or `.docscorerc.json` in the
//! working directory, or from an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # docscore.toml
//!
//! [weights]
//! completeness = 0.4
//! clarity = 0.3
//! accuracy = 0.3
//!
//! [accuracy]
//! ngram = 0.5
//! semantic = 0.5
//! max_ngram = 4
//!
//! [semantic]
//! enabled = true
//! backend = "openai"
//! model = "text-embedding-3-small"
//! timeout_secs = 30
//! max_attempts = 2
//!
//! [defaults]
//! format = "text"
//! fail_under = 0.6
//! ```

use crate::ai::{EmbeddingBackend, EmbeddingConfig};
use crate::error::{EvalError, EvalResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Example file written by `docscore init`
pub const EXAMPLE_CONFIG: &str = r#"# docscore configuration

[weights]
# Aggregate = completeness*w1 + clarity*w2 + accuracy*w3, clamped to [0, 1]
# Weights are used as given; keep them summing to 1 for a true average
completeness = 0.4
clarity = 0.3
accuracy = 0.3

[accuracy]
# Mix of n-gram overlap and semantic similarity when a reference is given
ngram = 0.5
semantic = 0.5
max_ngram = 4

[semantic]
# Requires an API key (DOCSCORE_API_KEY or the backend's own variable),
# except for ollama
enabled = false
backend = "openai"   # openai | deepinfra | ollama
# model = "text-embedding-3-small"
# endpoint = "http://localhost:11434/v1/embeddings"
timeout_secs = 30
max_attempts = 2

[defaults]
# format = "text"
# fail_under = 0.6
"#;

/// Weights for the three scores in the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight for completeness (default: 0.4)
    #[serde(default = "default_completeness_weight")]
    pub completeness: f64,

    /// Weight for clarity (default: 0.3)
    #[serde(default = "default_clarity_weight")]
    pub clarity: f64,

    /// Weight for accuracy (default: 0.3)
    #[serde(default = "default_accuracy_weight")]
    pub accuracy: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completeness: default_completeness_weight(),
            clarity: default_clarity_weight(),
            accuracy: default_accuracy_weight(),
        }
    }
}

fn default_completeness_weight() -> f64 {
    0.4
}
fn default_clarity_weight() -> f64 {
    0.3
}
fn default_accuracy_weight() -> f64 {
    0.3
}

impl ScoreWeights {
    /// Sum of the three weights. The aggregate is not rescaled by it.
    pub fn total(&self) -> f64 {
        self.completeness + self.clarity + self.accuracy
    }

    fn validate(&self) -> EvalResult<()> {
        check_weights(
            "weights",
            &[
                ("completeness", self.completeness),
                ("clarity", self.clarity),
                ("accuracy", self.accuracy),
            ],
        )
    }
}

/// Mix of the two accuracy components when a reference is available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyWeights {
    #[serde(default = "default_half")]
    pub ngram: f64,

    #[serde(default = "default_half")]
    pub semantic: f64,

    /// Highest n-gram order compared (default: 4)
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
}

impl Default for AccuracyWeights {
    fn default() -> Self {
        Self {
            ngram: default_half(),
            semantic: default_half(),
            max_ngram: default_max_ngram(),
        }
    }
}

fn default_half() -> f64 {
    0.5
}
fn default_max_ngram() -> usize {
    4
}

impl AccuracyWeights {
    /// Normalized (ngram, semantic) pair
    pub fn normalized(&self) -> (f64, f64) {
        let sum = self.ngram + self.semantic;
        if sum > 0.0 {
            (self.ngram / sum, self.semantic / sum)
        } else {
            (0.5, 0.5)
        }
    }

    fn validate(&self) -> EvalResult<()> {
        if self.max_ngram == 0 {
            return Err(EvalError::Configuration(
                "accuracy.max_ngram must be at least 1".to_string(),
            ));
        }
        check_weights(
            "accuracy",
            &[("ngram", self.ngram), ("semantic", self.semantic)],
        )
    }
}

fn check_weights(section: &str, weights: &[(&str, f64)]) -> EvalResult<()> {
    for (name, w) in weights {
        if !w.is_finite() || *w < 0.0 {
            return Err(EvalError::Configuration(format!(
                "{}.{} must be a non-negative number (got {})",
                section, name, w
            )));
        }
    }
    if weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0 {
        return Err(EvalError::Configuration(format!(
            "{} weights must not all be zero",
            section
        )));
    }
    Ok(())
}

/// External embedding capability settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticConfig {
    /// Whether semantic scoring is requested
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Embedding model (default depends on backend)
    #[serde(default)]
    pub model: Option<String>,

    /// Full endpoint URL override
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            backend: EmbeddingBackend::default(),
            model: None,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_attempts() -> u32 {
    2
}

impl SemanticConfig {
    pub fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            backend: self.backend,
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_attempts: self.max_attempts,
        }
    }

    fn validate(&self) -> EvalResult<()> {
        if self.timeout_secs == 0 {
            return Err(EvalError::Configuration(
                "semantic.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(EvalError::Configuration(format!(
                "semantic.max_attempts must be between 1 and 10 (got {})",
                self.max_attempts
            )));
        }
        Ok(())
    }
}

/// Default CLI flags that can be set in the config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Exit non-zero when the aggregate falls below this
    #[serde(default)]
    pub fail_under: Option<f64>,
}

/// Everything the evaluator needs, fixed at construction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default)]
    pub weights: ScoreWeights,

    #[serde(default)]
    pub accuracy: AccuracyWeights,

    #[serde(default)]
    pub semantic: SemanticConfig,

    #[serde(default)]
    pub defaults: CliDefaults,

    /// Explicit credential for the embedding backend. Environment variables
    /// are consulted only when this is unset.
    #[serde(default, skip_serializing)]
    pub credential: Option<String>,
}

impl EvaluatorConfig {
    /// Reject weights and limits that would make scores meaningless.
    pub fn validate(&self) -> EvalResult<()> {
        self.weights.validate()?;
        self.accuracy.validate()?;
        self.semantic.validate()?;
        if let Some(t) = self.defaults.fail_under {
            if !(0.0..=1.0).contains(&t) {
                return Err(EvalError::Configuration(format!(
                    "defaults.fail_under must be within [0, 1] (got {})",
                    t
                )));
            }
        }
        Ok(())
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_semantic(mut self, enabled: bool) -> Self {
        self.semantic.enabled = enabled;
        self
    }
}

/// Load configuration from the first config file found in `dir`.
///
/// A file that fails to parse is logged and skipped; with no usable file
/// the defaults are returned.
pub fn load_project_config(dir: &Path) -> EvaluatorConfig {
    let toml_path = dir.join("docscore.toml");
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(".docscorerc.json");
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No config file found, using defaults");
    EvaluatorConfig::default()
}

/// Load configuration from an explicit path. Errors are returned, not skipped.
pub fn load_config_file(path: &Path) -> anyhow::Result<EvaluatorConfig> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let loaded = if is_json {
        load_json_config(path)
    } else {
        load_toml_config(path)
    };
    loaded.with_context(|| format!("Failed to load config {}", path.display()))
}

fn load_toml_config(path: &Path) -> anyhow::Result<EvaluatorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EvaluatorConfig = toml::from_str(&content)?;
    Ok(config)
}

fn load_json_config(path: &Path) -> anyhow::Result<EvaluatorConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: EvaluatorConfig = serde_json::from_str(&content)?;
    Ok(config)
}
