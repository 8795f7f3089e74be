//! Text embedding.
//!
//! - [`Embedder`] is the seam every ranking goes through.
//! - [`openai`] talks to an OpenAI-compatible `/embeddings` endpoint.
//! - [`stub`] is an offline, deterministic feature-hashing embedder.
//! - [`provider`] picks one of the two at runtime.
//! - [`cache`] wraps any embedder with a content-addressed cache.

/// Content-addressed embedding cache.
pub mod cache;
mod error;
/// OpenAI-compatible HTTP embedder.
pub mod openai;
/// Runtime provider selection.
pub mod provider;
/// Deterministic offline embedder.
pub mod stub;


pub use cache::CachedEmbedder;
pub use error::EmbeddingError;
pub use openai::{OpenAiEmbedder, OpenAiEmbedderConfig};
pub use provider::ProviderEmbedder;
pub use stub::StubEmbedder;

use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

/// Immutable embedding produced by an [`Embedder`].
///
/// Cloning is cheap (shared buffer), which lets the cache hand out the same vector to
/// concurrent requests.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Arc<[f32]>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values.into())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of components.
    pub fn dim(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl Deref for EmbeddingVector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl AsRef<[f32]> for EmbeddingVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Maps text to a fixed-length vector.
///
/// Implementations must never substitute a zero vector for a failure.
pub trait Embedder: Send + Sync {
    /// Embeds a single string.
    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<EmbeddingVector, EmbeddingError>> + Send;
}

impl<E: Embedder> Embedder for Arc<E> {
    fn embed(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<EmbeddingVector, EmbeddingError>> + Send {
        (**self).embed(text)
    }
}
