use tracing::debug;

use super::{Embedder, EmbeddingError, EmbeddingVector};
use crate::constants::DEFAULT_EMBEDDING_DIM;
use crate::hashing::hash_to_u64;

/// Offline embedder based on feature hashing.
///
/// Each lower-cased alphanumeric token increments one bucket, then the vector is
/// L2-normalized. Texts sharing words score higher than texts that don't, which is
/// enough to exercise ranking without a network.
///
/// Text containing one of the configured failure needles returns
/// [`EmbeddingError::RequestFailed`], for exercising error paths.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
    fail_on: Vec<String>,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim: dim.max(1),
            fail_on: Vec::new(),
        }
    }

    /// Fails any text containing `needle` (case-insensitive).
    #[cfg(any(test, feature = "mock"))]
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on.push(needle.into().to_lowercase());
        self
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Synchronous core of [`Embedder::embed`].
    pub fn embed_sync(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let lowered = text.to_lowercase();

        if let Some(needle) = self.fail_on.iter().find(|n| lowered.contains(n.as_str())) {
            return Err(EmbeddingError::RequestFailed {
                reason: format!("stub configured to fail on '{needle}'"),
            });
        }

        let mut values = vec![0.0f32; self.dim];
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = (hash_to_u64(token.as_bytes()) % self.dim as u64) as usize;
            values[bucket] += 1.0;
        }

        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }

        Ok(EmbeddingVector::new(values))
    }
}

impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        debug!(dim = self.dim, chars = text.len(), "Stub embedding");
        self.embed_sync(text)
    }
}
