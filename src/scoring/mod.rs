//! Vector similarity.
//!
//! Scores are cosine similarities in `[-1, 1]`; higher means more similar.

pub mod error;
pub mod similarity;


pub use error::ScoringError;
pub use similarity::cosine_similarity;
