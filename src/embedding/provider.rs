use tracing::{info, warn};

use super::{
    Embedder, EmbeddingError, EmbeddingVector, OpenAiEmbedder, OpenAiEmbedderConfig, StubEmbedder,
};
use crate::config::Config;

/// Embedder chosen at startup.
#[derive(Debug, Clone)]
pub enum ProviderEmbedder {
    OpenAi(OpenAiEmbedder),
    Stub(StubEmbedder),
}

impl ProviderEmbedder {
    /// Picks the stub in mock mode, the OpenAI embedder otherwise.
    pub fn from_config(config: &Config) -> Result<Self, EmbeddingError> {
        if config.mock_provider {
            warn!("Embedder running in STUB mode (no network calls)");
            return Ok(Self::Stub(StubEmbedder::default()));
        }

        let embedder = OpenAiEmbedder::new(OpenAiEmbedderConfig::from_config(config)?)?;
        info!(model = %embedder.model(), base_url = %config.openai_base_url, "OpenAI embedder configured");
        Ok(Self::OpenAi(embedder))
    }

    /// `"openai"` or `"stub"`; reported by the readiness endpoint.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::OpenAi(_) => "openai",
            Self::Stub(_) => "stub",
        }
    }
}

impl Embedder for ProviderEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        match self {
            Self::OpenAi(embedder) => embedder.embed(text).await,
            Self::Stub(embedder) => embedder.embed(text).await,
        }
    }
}
