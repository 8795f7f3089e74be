use moka::sync::Cache;
use tracing::debug;

use super::{Embedder, EmbeddingError, EmbeddingVector};
use crate::hashing::hash_text;

/// Content-addressed cache in front of another embedder.
///
/// Keys are the BLAKE3 digest of the input text. Only successful embeddings are stored,
/// so failures are retried by the next request. A capacity of `0` disables caching.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Option<Cache<[u8; 32], EmbeddingVector>>,
}

impl<E: std::fmt::Debug> std::fmt::Debug for CachedEmbedder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedEmbedder")
            .field("inner", &self.inner)
            .field("capacity", &self.cache.as_ref().and_then(|c| c.policy().max_capacity()))
            .finish()
    }
}

impl<E> CachedEmbedder<E> {
    pub fn new(inner: E, capacity: u64) -> Self {
        let cache = (capacity > 0).then(|| Cache::new(capacity));
        Self { inner, cache }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }
}

impl<E: Embedder> Embedder for CachedEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let Some(cache) = &self.cache else {
            return self.inner.embed(text).await;
        };

        let key = hash_text(text);
        if let Some(hit) = cache.get(&key) {
            debug!("Embedding cache hit");
            return Ok(hit);
        }

        let vector = self.inner.embed(text).await?;
        cache.insert(key, vector.clone());
        Ok(vector)
    }
}
