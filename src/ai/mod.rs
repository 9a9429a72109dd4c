//! External embedding capability used for semantic similarity
//!
//! Semantic scoring only needs one thing from the outside world: turn a text
//! into a vector. [`Embedder`] is that seam. [`EmbeddingClient`] implements it
//! over the OpenAI-compatible `/embeddings` endpoint (OpenAI, DeepInfra,
//! Ollama); tests substitute a deterministic stub.
//!
//! # Environment Variables
//!
//! - `DOCSCORE_API_KEY`: Takes precedence for every backend
//! - `OPENAI_API_KEY`: OpenAI backend
//! - `DEEPINFRA_API_KEY`: DeepInfra backend
//! - `OLLAMA_MODEL`: Ollama model when none is configured (Ollama needs no key)
//!
//! # Example
//!
//! ```rust,ignore
//! use docscore::ai::{EmbeddingClient, EmbeddingConfig, Embedder};
//!
//! let client = EmbeddingClient::with_credential(EmbeddingConfig::default(), None)?;
//! let vector = client.embed("Parses the config file.")?;
//! ```

mod client;
mod similarity;

pub use client::{EmbeddingBackend, EmbeddingClient, EmbeddingConfig, API_KEY_ENV, OLLAMA_MODEL_ENV};
pub use similarity::cosine_similarity;

use thiserror::Error;

/// Errors that can occur when calling the embedding service
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: {env_var} not set. Get your key at {signup_url}")]
    MissingApiKey { env_var: String, signup_url: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type AiResult<T> = Result<T, AiError>;

/// Turns text into an embedding vector.
///
/// Implementations must be safe to share across threads: batch evaluation
/// calls the same embedder from many rayon workers.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> AiResult<Vec<f32>>;

    /// Identifier of the model behind this embedder, for reports and logs.
    fn model(&self) -> &str;

    /// Semantic similarity of two texts in [0, 1].
    ///
    /// Cosine similarity of the two embeddings; anti-correlated vectors are
    /// floored at 0.
    fn similarity(&self, a: &str, b: &str) -> AiResult<f64> {
        let va = self.embed(a)?;
        let vb = self.embed(b)?;
        if va.len() != vb.len() {
            return Err(AiError::ParseError(format!(
                "embedding dimensions differ ({} vs {})",
                va.len(),
                vb.len()
            )));
        }
        Ok(cosine_similarity(&va, &vb).max(0.0))
    }
}
