use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ranking::Candidate;

/// Lifecycle of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub budget: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub status: JobStatus,
    pub poster_id: String,
    /// Freelancer working on the job, once one is chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    /// Languages the client requires of the freelancer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
}

impl Job {
    /// Whether `user_id` took part in the job (as poster or applicant).
    pub fn involves(&self, user_id: &str) -> bool {
        self.poster_id == user_id || self.applicant_id.as_deref() == Some(user_id)
    }
}

/// Ranked on title, description, skills, category (in that order).
impl Candidate for Job {
    fn candidate_id(&self) -> &str {
        &self.id
    }

    fn text_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.description.as_str()),
            Cow::Owned(self.skills.join(" ")),
            Cow::Borrowed(self.category.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Freelancer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Freelancer => "freelancer",
        }
    }
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub bio: Option<String>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }

    /// Public profile, present only for freelancers.
    pub fn freelancer_profile(&self) -> Option<FreelancerProfile> {
        (self.role == UserRole::Freelancer).then(|| FreelancerProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
            role: self.role,
            bio: self.bio.clone(),
        })
    }
}

/// Public view of a freelancer, as returned in suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerProfile {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl FreelancerProfile {
    /// Text describing the freelancer when matching jobs to them: name, role, bio.
    pub fn matching_text(&self) -> String {
        let mut text = format!("{} {}", self.name, self.role.as_str());
        if let Some(bio) = self.bio.as_deref().filter(|b| !b.trim().is_empty()) {
            text.push(' ');
            text.push_str(bio);
        }
        text
    }
}

/// Ranked on name and role only.
impl Candidate for FreelancerProfile {
    fn candidate_id(&self) -> &str {
        &self.id
    }

    fn text_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.role.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: String,
    pub title: String,
}

/// A stored review of one user by another, tied to a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub rating: u8,
    pub comment: String,
    pub job_id: String,
    pub giver_id: String,
    pub receiver_id: String,
    pub is_biased: bool,
    pub bias_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Review fields supplied by the caller; id and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
    pub job_id: String,
    pub giver_id: String,
    pub receiver_id: String,
    pub is_biased: bool,
    pub bias_reason: Option<String>,
}

/// Review joined with its giver and job, for listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    #[serde(flatten)]
    pub review: Review,
    pub giver: Option<UserSummary>,
    pub job: Option<JobSummary>,
}

/// An up/down vote; at most one per (giver, receiver) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    /// `1` or `-1`.
    pub value: i8,
    pub giver_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub job_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub value: i8,
    pub giver_id: String,
    pub receiver_id: String,
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDetails {
    #[serde(flatten)]
    pub vote: Vote,
    pub giver: Option<UserSummary>,
}

/// Aggregates shown next to a user's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Mean rating; `0` when there are no reviews.
    pub average_rating: f64,
    pub total_reviews: usize,
    /// Sum of vote values.
    pub vote_score: i64,
    pub total_votes: usize,
}

impl ReviewStats {
    pub fn compute(reviews: &[ReviewDetails], votes: &[VoteDetails]) -> Self {
        let total_reviews = reviews.len();
        let average_rating = if total_reviews == 0 {
            0.0
        } else {
            reviews
                .iter()
                .map(|r| f64::from(r.review.rating))
                .sum::<f64>()
                / total_reviews as f64
        };

        Self {
            average_rating,
            total_reviews,
            vote_score: votes.iter().map(|v| i64::from(v.vote.value)).sum(),
            total_votes: votes.len(),
        }
    }
}
