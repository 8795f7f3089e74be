use serde::Serialize;

use crate::constants::{DEFAULT_CANDIDATE_POOL_LIMIT, DEFAULT_MAX_CONCURRENCY};
use crate::config::Config;

/// A candidate and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate<T> {
    pub candidate: T,
    pub score: f32,
}

impl<T> ScoredCandidate<T> {
    pub fn into_candidate(self) -> T {
        self.candidate
    }
}

/// What to do when a single candidate cannot be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole ranking with the first failure.
    #[default]
    FailFast,
    /// Drop the failed candidate and keep ranking the rest.
    SkipFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerConfig {
    /// Candidates beyond this many are ignored without being embedded.
    pub candidate_pool_limit: usize,
    /// Embedding calls in flight at once.
    pub max_concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            candidate_pool_limit: DEFAULT_CANDIDATE_POOL_LIMIT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}

impl RankerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            candidate_pool_limit: config.candidate_pool_limit,
            max_concurrency: config.max_concurrency.max(1),
            failure_policy: FailurePolicy::FailFast,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
