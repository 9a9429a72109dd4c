//! Embedding API client for OpenAI-compatible backends
//!
//! Uses ureq (sync HTTP) with a global timeout and a bounded number of
//! attempts. No async runtime needed.

use crate::ai::{AiError, AiResult, Embedder};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

/// Env var that overrides the backend-specific key variable.
pub const API_KEY_ENV: &str = "DOCSCORE_API_KEY";

/// Env var naming the Ollama model when none is configured
pub const OLLAMA_MODEL_ENV: &str = "OLLAMA_MODEL";

/// Supported embedding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    OpenAi,
    Deepinfra,
    Ollama,
}

impl EmbeddingBackend {
    /// Backend-specific API key variable; `None` for keyless backends
    pub fn env_key(&self) -> Option<&'static str> {
        match self {
            EmbeddingBackend::OpenAi => Some("OPENAI_API_KEY"),
            EmbeddingBackend::Deepinfra => Some("DEEPINFRA_API_KEY"),
            EmbeddingBackend::Ollama => None,
        }
    }

    pub fn signup_url(&self) -> &'static str {
        match self {
            EmbeddingBackend::OpenAi => "https://platform.openai.com/api-keys",
            EmbeddingBackend::Deepinfra => "https://deepinfra.com/dash/api_keys",
            EmbeddingBackend::Ollama => "https://ollama.ai (no key needed, just run locally)",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            EmbeddingBackend::OpenAi => "text-embedding-3-small",
            EmbeddingBackend::Deepinfra => "BAAI/bge-large-en-v1.5",
            EmbeddingBackend::Ollama => "nomic-embed-text",
        }
    }

    pub fn api_url(&self) -> &'static str {
        match self {
            EmbeddingBackend::OpenAi => "https://api.openai.com/v1/embeddings",
            EmbeddingBackend::Deepinfra => "https://api.deepinfra.com/v1/openai/embeddings",
            EmbeddingBackend::Ollama => "http://localhost:11434/v1/embeddings",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, EmbeddingBackend::Ollama)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "openai" => Some(EmbeddingBackend::OpenAi),
            "deepinfra" => Some(EmbeddingBackend::Deepinfra),
            "ollama" => Some(EmbeddingBackend::Ollama),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model: Option<String>,
    /// Full endpoint URL, overriding the backend default
    pub endpoint: Option<String>,
    pub timeout: Duration,
    /// Total attempts per request (at least 1)
    pub max_attempts: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model: None,
            endpoint: None,
            timeout: Duration::from_secs(30),
            max_attempts: 2,
        }
    }
}

impl EmbeddingConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.backend.api_url())
    }
}

/// Embedding client (sync HTTP via ureq)
pub struct EmbeddingClient {
    config: EmbeddingConfig,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We handle status codes ourselves
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingConfig, api_key: impl Into<String>) -> Self {
        let agent = make_agent(config.timeout);
        Self {
            config,
            api_key: api_key.into(),
            agent,
        }
    }

    /// Build a client from an explicit credential, falling back to
    /// `DOCSCORE_API_KEY` and then the backend's own variable.
    pub fn with_credential(config: EmbeddingConfig, credential: Option<&str>) -> AiResult<Self> {
        Self::with_credential_lookup(config, credential, |name| env::var(name).ok())
    }

    /// Like [`EmbeddingClient::with_credential`], reading variables through
    /// `lookup` instead of the process environment.
    pub fn with_credential_lookup(
        mut config: EmbeddingConfig,
        credential: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AiResult<Self> {
        let non_blank = |k: &String| !k.trim().is_empty();

        let Some(backend_var) = config.backend.env_key() else {
            if config.model.is_none() {
                config.model = lookup(OLLAMA_MODEL_ENV).filter(non_blank);
            }
            return Ok(Self::new(config, "ollama"));
        };

        let api_key = credential
            .map(str::to_string)
            .filter(non_blank)
            .or_else(|| lookup(API_KEY_ENV).filter(non_blank))
            .or_else(|| lookup(backend_var).filter(non_blank))
            .ok_or_else(|| AiError::MissingApiKey {
                env_var: backend_var.to_string(),
                signup_url: config.backend.signup_url().to_string(),
            })?;

        Ok(Self::new(config, api_key))
    }

    pub fn backend(&self) -> EmbeddingBackend {
        self.config.backend
    }

    fn request_once(&self, text: &str) -> AiResult<Vec<f32>> {
        let body = EmbeddingRequest {
            model: self.config.model(),
            input: text,
        };

        let mut req = self
            .agent
            .post(self.config.endpoint())
            .header("Content-Type", "application/json");

        if self.config.backend.requires_api_key() {
            req = req.header("Authorization", &format!("Bearer {}", self.api_key));
        }

        let response = req.send_json(&body).map_err(|e| match e {
            ureq::Error::Timeout(_) => AiError::Timeout(self.config.timeout.as_secs()),
            other => AiError::ApiError {
                status: 0,
                message: other.to_string(),
            },
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            return Err(AiError::ApiError {
                status,
                message: error_text,
            });
        }

        let resp: EmbeddingResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let vector = resp
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AiError::ParseError("No embedding in response".to_string()))?;

        if vector.is_empty() {
            return Err(AiError::ParseError("Empty embedding vector".to_string()));
        }
        Ok(vector)
    }
}

impl Embedder for EmbeddingClient {
    fn embed(&self, text: &str) -> AiResult<Vec<f32>> {
        let attempts = self.config.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            match self.request_once(text) {
                Ok(v) => {
                    debug!("Embedded {} chars ({} dims)", text.len(), v.len());
                    return Ok(v);
                }
                // Client errors won't succeed on retry
                Err(AiError::ApiError { status, message }) if (400..500).contains(&status) => {
                    return Err(AiError::ApiError { status, message });
                }
                Err(e) => {
                    warn!("Embedding attempt {}/{} failed: {}", attempt, attempts, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| AiError::ConfigError("no attempts made".to_string())))
    }

    fn model(&self) -> &str {
        self.config.model()
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
