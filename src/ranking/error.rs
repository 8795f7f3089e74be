use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum RankingError {
    /// The query, or a candidate under the fail-fast policy, could not be embedded.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("invalid ranking options: {reason}")]
    InvalidOptions { reason: String },
}
