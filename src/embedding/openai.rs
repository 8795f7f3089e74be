use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, EmbeddingError, EmbeddingVector};
use crate::config::Config;
use crate::constants::{DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};

/// Settings for [`OpenAiEmbedder`].
#[derive(Clone)]
pub struct OpenAiEmbedderConfig {
    pub api_key: String,
    /// API root; `/embeddings` is appended.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiEmbedderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiEmbedderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Builds embedder settings from server configuration.
    pub fn from_config(config: &Config) -> Result<Self, EmbeddingError> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| EmbeddingError::InvalidConfig {
                reason: "an API key is required for the OpenAI embedder".to_string(),
            })?;

        Ok(Self {
            api_key,
            base_url: config.openai_base_url.clone(),
            model: config.embedding_model.clone(),
            timeout: config.request_timeout,
        })
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.api_key.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "API key must not be empty".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model must not be empty".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
///
/// One HTTP call per [`Embedder::embed`]; no batching and no retries.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    http: reqwest::Client,
    endpoint: String,
    config: OpenAiEmbedderConfig,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn request(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|datum| datum.embedding)
            .ok_or_else(|| EmbeddingError::MalformedResponse {
                reason: "response contained no embeddings".to_string(),
            })?;

        if embedding.is_empty() {
            return Err(EmbeddingError::MalformedResponse {
                reason: "embedding was empty".to_string(),
            });
        }

        Ok(EmbeddingVector::new(embedding))
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        debug!(model = %self.config.model, chars = text.len(), "Requesting embedding");

        match tokio::time::timeout(self.config.timeout, self.request(text)).await {
            Ok(result) => result,
            Err(_) => Err(EmbeddingError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }),
        }
    }
}
