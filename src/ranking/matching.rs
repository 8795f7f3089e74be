//! Job matching for a freelancer's dashboard.
//!
//! Unlike search suggestions, matches keep their similarity score and are filtered by a
//! minimum similarity.

use serde::Serialize;
use tracing::info;

use super::{Ranker, RankingError};
use crate::constants::{DEFAULT_MATCH_LIMIT, DEFAULT_MIN_SIMILARITY, MAX_MATCH_LIMIT};
use crate::embedding::Embedder;
use crate::marketplace::{FreelancerProfile, Job, JobStatus};

/// Attribute filters applied to jobs before any embedding work.
///
/// Unset filters match every job. A rate bound excludes jobs without an hourly rate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilters {
    /// Exact job location, compared case-insensitively.
    pub location: Option<String>,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    /// Every listed language must be among the job's required languages.
    pub languages: Vec<String>,
}

impl MatchFilters {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.min_rate.is_none()
            && self.max_rate.is_none()
            && self.languages.is_empty()
    }

    pub fn accepts(&self, job: &Job) -> bool {
        if let Some(location) = self.location.as_deref() {
            let same = job
                .location
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(location));
            if !same {
                return false;
            }
        }

        if self.min_rate.is_some() || self.max_rate.is_some() {
            let Some(rate) = job.hourly_rate else {
                return false;
            };
            if self.min_rate.is_some_and(|min| rate < min)
                || self.max_rate.is_some_and(|max| rate > max)
            {
                return false;
            }
        }

        self.languages.iter().all(|wanted| {
            job.languages
                .iter()
                .any(|have| have.eq_ignore_ascii_case(wanted))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// Max matches returned, in `1..=50`.
    pub limit: usize,
    /// Minimum similarity, in `(0, 1]`.
    pub min_similarity: f32,
    pub filters: MatchFilters,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_MATCH_LIMIT,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            filters: MatchFilters::default(),
        }
    }
}

impl MatchOptions {
    pub fn validate(&self) -> Result<(), RankingError> {
        if self.limit == 0 || self.limit > MAX_MATCH_LIMIT {
            return Err(RankingError::InvalidOptions {
                reason: format!("limit must be between 1 and {MAX_MATCH_LIMIT}"),
            });
        }
        if !(self.min_similarity > 0.0 && self.min_similarity <= 1.0) {
            return Err(RankingError::InvalidOptions {
                reason: "min_similarity must be greater than 0 and at most 1".to_string(),
            });
        }
        let (min_rate, max_rate) = (self.filters.min_rate, self.filters.max_rate);
        if [min_rate, max_rate]
            .into_iter()
            .flatten()
            .any(|r| !r.is_finite() || r < 0.0)
        {
            return Err(RankingError::InvalidOptions {
                reason: "rate filters must be non-negative numbers".to_string(),
            });
        }
        if let (Some(min), Some(max)) = (min_rate, max_rate)
            && min > max
        {
            return Err(RankingError::InvalidOptions {
                reason: "min_rate must not exceed max_rate".to_string(),
            });
        }
        Ok(())
    }
}

/// A job with its similarity to the freelancer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMatch {
    pub job: Job,
    pub similarity_score: f32,
}

/// Open jobs most similar to `freelancer`, at or above `options.min_similarity`.
///
/// Non-open jobs and jobs rejected by `options.filters` are dropped before scoring.
pub async fn find_matching_jobs<E: Embedder>(
    ranker: &Ranker<E>,
    freelancer: &FreelancerProfile,
    jobs: Vec<Job>,
    options: MatchOptions,
) -> Result<Vec<JobMatch>, RankingError> {
    options.validate()?;

    let open: Vec<Job> = jobs
        .into_iter()
        .filter(|j| j.status == JobStatus::Open && options.filters.accepts(j))
        .collect();
    let pool_size = open.len();

    let matches: Vec<JobMatch> = ranker
        .rank_scored(&freelancer.matching_text(), open, pool_size)
        .await?
        .into_iter()
        .filter(|scored| scored.score >= options.min_similarity)
        .take(options.limit)
        .map(|scored| JobMatch {
            job: scored.candidate,
            similarity_score: scored.score,
        })
        .collect();

    info!(
        freelancer_id = %freelancer.id,
        candidates = pool_size,
        matches = matches.len(),
        min_similarity = options.min_similarity,
        filtered = !options.filters.is_empty(),
        "Job matching complete"
    );

    Ok(matches)
}
