//! Similarity ranking of candidates against a free-text query.
//!
//! - [`Candidate`] describes what text a record is ranked on.
//! - [`Ranker`] embeds, scores, sorts and truncates.
//! - [`matching`] ranks open jobs for a freelancer with a similarity floor.

pub mod candidate;
pub mod error;
pub mod matching;
pub mod ranker;
pub mod types;

#[cfg(test)]
mod tests;

pub use candidate::Candidate;
pub use error::RankingError;
pub use matching::{JobMatch, MatchFilters, MatchOptions, find_matching_jobs};
pub use ranker::Ranker;
pub use types::{FailurePolicy, RankerConfig, ScoredCandidate};
