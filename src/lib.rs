//! Matchwell library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Embedder`], [`EmbeddingVector`] - Text to vector
//! - [`cosine_similarity`] - Vector similarity
//! - [`Ranker`], [`Candidate`] - Similarity ranking
//! - [`BiasClassifier`], [`TextClassifier`] - Review bias detection (fails open)
//!
//! ## Providers
//! - [`OpenAiEmbedder`], [`StubEmbedder`], [`ProviderEmbedder`], [`CachedEmbedder`]
//! - [`GenaiCompletionClient`], [`CannedCompletionClient`], [`ProviderCompletion`]
//!
//! ## Marketplace
//! - [`MarketplaceStore`], [`InMemoryStore`] and the record types the HTTP surface returns
//!
//! Offline providers ([`StubEmbedder`], [`CannedCompletionClient`]) are always compiled: the
//! server uses them in mock-provider mode.

pub mod classification;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod marketplace;
pub mod ranking;
pub mod scoring;

pub use classification::{
    BiasClassifier, BiasVerdict, CannedCompletionClient, ClassificationError, CompletionClient,
    CompletionParams, GenaiCompletionClient, ProviderCompletion, TextClassifier,
};
pub use config::{Config, ConfigError};
pub use embedding::{
    CachedEmbedder, Embedder, EmbeddingError, EmbeddingVector, OpenAiEmbedder,
    OpenAiEmbedderConfig, ProviderEmbedder, StubEmbedder,
};
pub use marketplace::{
    FreelancerProfile, InMemoryStore, Job, JobStatus, MarketplaceSeed, MarketplaceStore,
    NewReview, NewVote, Review, ReviewDetails, ReviewStats, StoreError, User, UserRole, Vote,
    VoteDetails,
};
pub use ranking::{
    Candidate, FailurePolicy, JobMatch, MatchFilters, MatchOptions, Ranker, RankerConfig,
    RankingError, ScoredCandidate, find_matching_jobs,
};
pub use scoring::{ScoringError, cosine_similarity};
