//! Request and response bodies, plus helpers that pull typed values out of loosely
//! shaped JSON so validation messages stay under the handler's control.

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use matchwell::marketplace::{MAX_RATING, MIN_RATING};
use matchwell::{FreelancerProfile, Job, MatchOptions, ReviewDetails, ReviewStats, VoteDetails};

use crate::gateway::error::GatewayError;

/// Header carrying the authenticated caller's user id, set by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub jobs: Vec<Job>,
    pub freelancers: Vec<FreelancerProfile>,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewDetails>,
    pub votes: Vec<VoteDetails>,
    pub stats: ReviewStats,
}

/// `GET /votes` response: matching votes and their summed value.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteListResponse {
    pub votes: Vec<VoteDetails>,
    pub score: i64,
    pub total_votes: usize,
}

impl VoteListResponse {
    pub fn new(votes: Vec<VoteDetails>) -> Self {
        Self {
            score: votes.iter().map(|v| i64::from(v.vote.value)).sum(),
            total_votes: votes.len(),
            votes,
        }
    }
}

/// `GET /votes` filters; at least one is required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotesQuery {
    pub user_id: Option<String>,
    pub job_id: Option<String>,
}

impl VotesQuery {
    /// Non-blank `(receiver, job)` filters, or an error when both are missing.
    pub fn filters<'a>(&'a self) -> Result<(Option<&'a str>, Option<&'a str>), GatewayError> {
        let present = |v: &'a Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (present(&self.user_id), present(&self.job_id)) {
            (None, None) => Err(GatewayError::invalid("Either userId or jobId is required")),
            filters => Ok(filters),
        }
    }
}

/// Raw `/match-jobs` query string values; parsed by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct MatchJobsQuery {
    pub limit: Option<String>,
    pub min_similarity: Option<String>,
    pub location: Option<String>,
    pub min_rate: Option<String>,
    pub max_rate: Option<String>,
    /// Comma-separated.
    pub languages: Option<String>,
}

/// Validated fields of a review submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSubmission {
    pub rating: u8,
    pub comment: String,
    pub job_id: Option<String>,
}

/// Validated fields of a vote.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteSubmission {
    pub value: i8,
    pub receiver_id: String,
    pub job_id: Option<String>,
}

/// Caller id from [`USER_ID_HEADER`]; blank values count as missing.
pub fn caller_id(headers: &HeaderMap) -> Result<String, GatewayError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(GatewayError::Unauthorized)
}

pub fn parse_body(body: &Bytes) -> Result<Value, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::invalid(format!("Invalid request body: {e}")))
}

fn non_empty_str<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// `query` must be a non-empty string.
pub fn suggestion_query(body: &Value) -> Result<String, GatewayError> {
    non_empty_str(body, "query")
        .map(str::to_string)
        .ok_or_else(|| GatewayError::invalid("Invalid query"))
}

/// Checks the rating only; the job and authorization checks need the store.
pub fn review_submission(body: &Value) -> Result<ReviewSubmission, GatewayError> {
    let rating = body
        .get("rating")
        .and_then(Value::as_u64)
        .and_then(|r| u8::try_from(r).ok())
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| GatewayError::invalid("Invalid rating"))?;

    Ok(ReviewSubmission {
        rating,
        comment: body
            .get("comment")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        job_id: non_empty_str(body, "jobId").map(str::to_string),
    })
}

pub fn vote_submission(body: &Value, giver_id: &str) -> Result<VoteSubmission, GatewayError> {
    let value = match body.get("value").and_then(Value::as_i64) {
        Some(1) => 1,
        Some(-1) => -1,
        _ => return Err(GatewayError::invalid("Invalid vote value")),
    };

    let receiver_id = non_empty_str(body, "receiverId")
        .ok_or_else(|| GatewayError::invalid("Receiver ID is required"))?;

    if receiver_id == giver_id {
        return Err(GatewayError::invalid("Cannot vote for yourself"));
    }

    Ok(VoteSubmission {
        value,
        receiver_id: receiver_id.to_string(),
        job_id: non_empty_str(body, "jobId").map(str::to_string),
    })
}

/// Applies query overrides to the default [`MatchOptions`] and validates the result.
pub fn match_options(query: &MatchJobsQuery) -> Result<MatchOptions, GatewayError> {
    let mut options = MatchOptions::default();

    if let Some(raw) = query.limit.as_deref() {
        options.limit = raw
            .trim()
            .parse()
            .map_err(|_| GatewayError::invalid(format!("Invalid limit: {raw}")))?;
    }
    if let Some(raw) = query.min_similarity.as_deref() {
        options.min_similarity = raw
            .trim()
            .parse()
            .map_err(|_| GatewayError::invalid(format!("Invalid min_similarity: {raw}")))?;
    }

    let filters = &mut options.filters;
    filters.location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    filters.min_rate = rate_param("min_rate", query.min_rate.as_deref())?;
    filters.max_rate = rate_param("max_rate", query.max_rate.as_deref())?;
    filters.languages = query
        .languages
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    options
        .validate()
        .map_err(|e| GatewayError::invalid(e.to_string()))?;
    Ok(options)
}

fn rate_param(name: &str, raw: Option<&str>) -> Result<Option<f64>, GatewayError> {
    raw.map(str::trim)
        .filter(|r| !r.is_empty())
        .map(|r| {
            r.parse()
                .map_err(|_| GatewayError::invalid(format!("Invalid {name}: {r}")))
        })
        .transpose()
}
