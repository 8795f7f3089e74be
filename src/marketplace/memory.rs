use std::path::Path;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{
    FreelancerProfile, Job, JobStatus, JobSummary, NewReview, NewVote, Review, ReviewDetails, User,
    Vote, VoteDetails,
};
use super::{MarketplaceStore, StoreError};

/// Initial contents of an [`InMemoryStore`], usually loaded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceSeed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub votes: Vec<Vote>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    reviews: Vec<Review>,
    votes: Vec<Vote>,
}

impl Tables {
    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    fn review_details(&self, review: &Review) -> ReviewDetails {
        ReviewDetails {
            giver: self.user(&review.giver_id).map(User::summary),
            job: self.job(&review.job_id).map(|j| JobSummary {
                id: j.id.clone(),
                title: j.title.clone(),
            }),
            review: review.clone(),
        }
    }

    fn vote_details<'a>(
        &'a self,
        keep: impl Fn(&Vote) -> bool + 'a,
    ) -> impl Iterator<Item = VoteDetails> + 'a {
        self.votes
            .iter()
            .filter(move |v| keep(*v))
            .map(move |v| VoteDetails {
                giver: self.user(&v.giver_id).map(User::summary),
                vote: v.clone(),
            })
    }
}

/// Process-local [`MarketplaceStore`] guarded by a `parking_lot` lock.
///
/// Locks are never held across an `.await`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        f.debug_struct("InMemoryStore")
            .field("users", &tables.users.len())
            .field("jobs", &tables.jobs.len())
            .field("reviews", &tables.reviews.len())
            .field("votes", &tables.votes.len())
            .finish()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: MarketplaceSeed) -> Self {
        Self {
            tables: RwLock::new(Tables {
                users: seed.users,
                jobs: seed.jobs,
                reviews: seed.reviews,
                votes: seed.votes,
            }),
        }
    }

    /// Loads a [`MarketplaceSeed`] from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        let seed: MarketplaceSeed =
            serde_json::from_str(&raw).map_err(|source| StoreError::SeedParse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            users = seed.users.len(),
            jobs = seed.jobs.len(),
            "Loaded marketplace seed"
        );
        Ok(Self::from_seed(seed))
    }

    pub fn insert_user(&self, user: User) {
        self.tables.write().users.push(user);
    }

    pub fn insert_job(&self, job: Job) {
        self.tables.write().jobs.push(job);
    }

    pub fn review_count(&self) -> usize {
        self.tables.read().reviews.len()
    }
}

impl MarketplaceStore for InMemoryStore {
    async fn open_jobs(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Open)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn freelancers(&self, limit: usize) -> Result<Vec<FreelancerProfile>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .iter()
            .filter_map(User::freelancer_profile)
            .take(limit)
            .collect())
    }

    async fn find_freelancer(&self, user_id: &str) -> Result<Option<FreelancerProfile>, StoreError> {
        Ok(self
            .tables
            .read()
            .user(user_id)
            .and_then(User::freelancer_profile))
    }

    async fn find_job(&self, job_id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.tables.read().job(job_id).cloned())
    }

    async fn find_review(
        &self,
        job_id: &str,
        giver_id: &str,
        receiver_id: &str,
    ) -> Result<Option<Review>, StoreError> {
        Ok(self
            .tables
            .read()
            .reviews
            .iter()
            .find(|r| r.job_id == job_id && r.giver_id == giver_id && r.receiver_id == receiver_id)
            .cloned())
    }

    async fn insert_review(&self, review: NewReview) -> Result<ReviewDetails, StoreError> {
        let mut tables = self.tables.write();

        if tables.job(&review.job_id).is_none() {
            return Err(StoreError::NotFound {
                entity: "job",
                id: review.job_id,
            });
        }

        let duplicate = tables.reviews.iter().any(|r| {
            r.job_id == review.job_id
                && r.giver_id == review.giver_id
                && r.receiver_id == review.receiver_id
        });
        if duplicate {
            return Err(StoreError::Conflict {
                reason: format!(
                    "review by '{}' for '{}' on job '{}' already exists",
                    review.giver_id, review.receiver_id, review.job_id
                ),
            });
        }

        let stored = Review {
            id: Uuid::new_v4(),
            rating: review.rating,
            comment: review.comment,
            job_id: review.job_id,
            giver_id: review.giver_id,
            receiver_id: review.receiver_id,
            is_biased: review.is_biased,
            bias_reason: review.bias_reason,
            created_at: Utc::now(),
        };
        let details = tables.review_details(&stored);
        tables.reviews.push(stored);

        debug!(
            review_id = %details.review.id,
            is_biased = details.review.is_biased,
            "Review stored"
        );
        Ok(details)
    }

    async fn reviews_for(&self, receiver_id: &str) -> Result<Vec<ReviewDetails>, StoreError> {
        let tables = self.tables.read();

        // Reverse insertion order first so equal timestamps still list newest first.
        let mut reviews: Vec<ReviewDetails> = tables
            .reviews
            .iter()
            .rev()
            .filter(|r| r.receiver_id == receiver_id)
            .map(|r| tables.review_details(r))
            .collect();
        reviews.sort_by(|a, b| b.review.created_at.cmp(&a.review.created_at));

        Ok(reviews)
    }

    async fn votes_for(&self, receiver_id: &str) -> Result<Vec<VoteDetails>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .vote_details(|v| v.receiver_id == receiver_id)
            .collect())
    }

    async fn list_votes(
        &self,
        receiver_id: Option<&str>,
        job_id: Option<&str>,
    ) -> Result<Vec<VoteDetails>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .vote_details(|v| {
                receiver_id.is_none_or(|id| v.receiver_id == id)
                    && job_id.is_none_or(|id| v.job_id.as_deref() == Some(id))
            })
            .collect())
    }

    async fn upsert_vote(&self, vote: NewVote) -> Result<Vote, StoreError> {
        let mut tables = self.tables.write();
        let now = Utc::now();

        if let Some(existing) = tables
            .votes
            .iter_mut()
            .find(|v| v.giver_id == vote.giver_id && v.receiver_id == vote.receiver_id)
        {
            existing.value = vote.value;
            existing.updated_at = now;
            debug!(vote_id = %existing.id, value = vote.value, "Vote updated");
            return Ok(existing.clone());
        }

        let stored = Vote {
            id: Uuid::new_v4(),
            value: vote.value,
            giver_id: vote.giver_id,
            receiver_id: vote.receiver_id,
            job_id: vote.job_id,
            created_at: now,
            updated_at: now,
        };
        tables.votes.push(stored.clone());

        debug!(vote_id = %stored.id, value = stored.value, "Vote created");
        Ok(stored)
    }
}
