use std::future::Future;

use super::StoreError;
use super::model::{FreelancerProfile, Job, NewReview, NewVote, Review, ReviewDetails, Vote, VoteDetails};

/// Data access used by the HTTP surface.
///
/// Listing methods return records in insertion order so capped pools are deterministic.
pub trait MarketplaceStore: Send + Sync {
    /// Up to `limit` jobs with status `open`.
    fn open_jobs(&self, limit: usize)
    -> impl Future<Output = Result<Vec<Job>, StoreError>> + Send;

    /// Up to `limit` users with the freelancer role.
    fn freelancers(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<FreelancerProfile>, StoreError>> + Send;

    fn find_freelancer(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<FreelancerProfile>, StoreError>> + Send;

    fn find_job(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<Option<Job>, StoreError>> + Send;

    /// The review `giver_id` left for `receiver_id` on `job_id`, if any.
    fn find_review(
        &self,
        job_id: &str,
        giver_id: &str,
        receiver_id: &str,
    ) -> impl Future<Output = Result<Option<Review>, StoreError>> + Send;

    /// Persists a review and returns it joined with its giver and job. Fails with
    /// [`StoreError::Conflict`] on a duplicate (job, giver, receiver) triple.
    fn insert_review(
        &self,
        review: NewReview,
    ) -> impl Future<Output = Result<ReviewDetails, StoreError>> + Send;

    /// Reviews received by `receiver_id`, newest first.
    fn reviews_for(
        &self,
        receiver_id: &str,
    ) -> impl Future<Output = Result<Vec<ReviewDetails>, StoreError>> + Send;

    fn votes_for(
        &self,
        receiver_id: &str,
    ) -> impl Future<Output = Result<Vec<VoteDetails>, StoreError>> + Send;

    /// Votes matching every given filter: received by `receiver_id` and/or tied to `job_id`.
    fn list_votes(
        &self,
        receiver_id: Option<&str>,
        job_id: Option<&str>,
    ) -> impl Future<Output = Result<Vec<VoteDetails>, StoreError>> + Send;

    /// Creates the vote or replaces the value of the existing (giver, receiver) vote.
    fn upsert_vote(&self, vote: NewVote)
    -> impl Future<Output = Result<Vote, StoreError>> + Send;
}
