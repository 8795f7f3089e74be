use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use matchwell::{
    Embedder, JobStatus, MarketplaceStore, NewReview, NewVote, ReviewStats, StoreError,
    TextClassifier, find_matching_jobs,
};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    MatchJobsQuery, ReviewListResponse, SuggestionsResponse, VoteListResponse, VotesQuery,
    caller_id, match_options, parse_body, review_submission, suggestion_query, vote_submission,
};
use crate::gateway::state::HandlerState;

const SUGGESTIONS_FAILED: &str = "Failed to generate suggestions";
const REVIEW_CREATE_FAILED: &str = "Failed to create review";
const REVIEW_FETCH_FAILED: &str = "Failed to fetch reviews";
const VOTE_FAILED: &str = "Failed to process vote";
const VOTE_FETCH_FAILED: &str = "Failed to fetch votes";
const MATCH_FAILED: &str = "Failed to match jobs";

/// `POST /search/suggestions`: top open jobs and freelancers for a free-text query.
#[instrument(skip(state, body))]
pub async fn suggestions_handler<E, C, S>(
    State(state): State<HandlerState<E, C, S>>,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let query = suggestion_query(&parse_body(&body)?)?;
    let pool = state.candidate_pool_limit;
    let top_k = state.suggestion_top_k;

    let (jobs, freelancers) = tokio::try_join!(
        state.store.open_jobs(pool),
        state.store.freelancers(pool)
    )
    .map_err(|e| GatewayError::internal(SUGGESTIONS_FAILED, e))?;

    debug!(
        jobs = jobs.len(),
        freelancers = freelancers.len(),
        "Ranking suggestion pools"
    );

    let (jobs, freelancers) = tokio::try_join!(
        state.ranker.rank(&query, jobs, top_k),
        state.ranker.rank(&query, freelancers, top_k)
    )
    .map_err(|e| GatewayError::internal(SUGGESTIONS_FAILED, e))?;

    info!(
        jobs = jobs.len(),
        freelancers = freelancers.len(),
        "Suggestions generated"
    );

    Ok(Json(SuggestionsResponse { jobs, freelancers }).into_response())
}

/// `POST /reviews/{receiver_id}`: validates, classifies the comment, stores the review.
///
/// Every validation runs before the classifier is called.
#[instrument(skip(state, headers, body))]
pub async fn create_review_handler<E, C, S>(
    State(state): State<HandlerState<E, C, S>>,
    Path(receiver_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let giver_id = caller_id(&headers)?;
    let submission = review_submission(&parse_body(&body)?)?;

    let job = match submission.job_id.as_deref() {
        Some(job_id) => state
            .store
            .find_job(job_id)
            .await
            .map_err(|e| GatewayError::internal(REVIEW_CREATE_FAILED, e))?,
        None => None,
    }
    .ok_or_else(|| GatewayError::not_found("Job not found"))?;

    if job.status != JobStatus::Completed {
        return Err(GatewayError::invalid("Can only review completed jobs"));
    }

    if !job.involves(&giver_id) {
        return Err(GatewayError::Forbidden(
            "Not authorized to review this job".to_string(),
        ));
    }

    let existing = state
        .store
        .find_review(&job.id, &giver_id, &receiver_id)
        .await
        .map_err(|e| GatewayError::internal(REVIEW_CREATE_FAILED, e))?;
    if existing.is_some() {
        return Err(GatewayError::invalid("Already reviewed this job"));
    }

    let verdict = state.classifier.classify(&submission.comment).await;

    let review = state
        .store
        .insert_review(NewReview {
            rating: submission.rating,
            comment: submission.comment,
            job_id: job.id,
            giver_id,
            receiver_id,
            is_biased: verdict.is_biased,
            bias_reason: verdict.reason,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict { .. } => GatewayError::invalid("Already reviewed this job"),
            other => GatewayError::internal(REVIEW_CREATE_FAILED, other),
        })?;

    info!(
        review_id = %review.review.id,
        rating = review.review.rating,
        is_biased = review.review.is_biased,
        "Review created"
    );

    Ok((StatusCode::CREATED, Json(review)).into_response())
}

/// `GET /reviews/{receiver_id}`: reviews and votes received, with aggregate stats.
#[instrument(skip(state))]
pub async fn list_reviews_handler<E, C, S>(
    State(state): State<HandlerState<E, C, S>>,
    Path(receiver_id): Path<String>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let (reviews, votes) = tokio::try_join!(
        state.store.reviews_for(&receiver_id),
        state.store.votes_for(&receiver_id)
    )
    .map_err(|e| GatewayError::internal(REVIEW_FETCH_FAILED, e))?;

    let stats = ReviewStats::compute(&reviews, &votes);

    Ok(Json(ReviewListResponse {
        reviews,
        votes,
        stats,
    })
    .into_response())
}

/// `POST /votes`: records or updates the caller's vote for another user.
#[instrument(skip(state, headers, body))]
pub async fn vote_handler<E, C, S>(
    State(state): State<HandlerState<E, C, S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let giver_id = caller_id(&headers)?;
    let submission = vote_submission(&parse_body(&body)?, &giver_id)?;

    if let Some(job_id) = submission.job_id.as_deref() {
        let job = state
            .store
            .find_job(job_id)
            .await
            .map_err(|e| GatewayError::internal(VOTE_FAILED, e))?;
        if job.is_none() {
            return Err(GatewayError::not_found("Job not found"));
        }
    }

    let vote = state
        .store
        .upsert_vote(NewVote {
            value: submission.value,
            giver_id,
            receiver_id: submission.receiver_id,
            job_id: submission.job_id,
        })
        .await
        .map_err(|e| GatewayError::internal(VOTE_FAILED, e))?;

    debug!(vote_id = %vote.id, value = vote.value, "Vote recorded");

    Ok(Json(vote).into_response())
}

/// `GET /votes?userId=&jobId=`: votes received by a user and/or tied to a job.
#[instrument(skip(state))]
pub async fn list_votes_handler<E, C, S>(
    State(state): State<HandlerState<E, C, S>>,
    Query(query): Query<VotesQuery>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let (receiver_id, job_id) = query.filters()?;

    let votes = state
        .store
        .list_votes(receiver_id, job_id)
        .await
        .map_err(|e| GatewayError::internal(VOTE_FETCH_FAILED, e))?;

    Ok(Json(VoteListResponse::new(votes)).into_response())
}

/// `GET /match-jobs`: open jobs most similar to the calling freelancer.
#[instrument(skip(state, headers))]
pub async fn match_jobs_handler<E, C, S>(
    State(state): State<HandlerState<E, C, S>>,
    headers: HeaderMap,
    Query(query): Query<MatchJobsQuery>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let user_id = caller_id(&headers)?;
    let options = match_options(&query)?;

    let freelancer = state
        .store
        .find_freelancer(&user_id)
        .await
        .map_err(|e| GatewayError::internal(MATCH_FAILED, e))?
        .ok_or_else(|| GatewayError::not_found("Freelancer not found"))?;

    let jobs = state
        .store
        .open_jobs(state.candidate_pool_limit)
        .await
        .map_err(|e| GatewayError::internal(MATCH_FAILED, e))?;

    let matches = find_matching_jobs(&*state.ranker, &freelancer, jobs, options)
        .await
        .map_err(|e| GatewayError::internal(MATCH_FAILED, e))?;

    Ok(Json(matches).into_response())
}
