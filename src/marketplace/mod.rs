//! Marketplace records and the storage seam the HTTP surface reads and writes.
//!
//! Schema design and durable persistence live outside this crate; [`InMemoryStore`] is a
//! process-local implementation that can be seeded from JSON.

pub mod error;
pub mod memory;
pub mod model;
pub mod store;


pub use error::StoreError;
pub use memory::{InMemoryStore, MarketplaceSeed};
pub use model::{
    FreelancerProfile, Job, JobStatus, JobSummary, NewReview, NewVote, Review, ReviewDetails,
    ReviewStats, User, UserRole, UserSummary, Vote, VoteDetails,
};
pub use store::MarketplaceStore;

/// Lowest accepted review rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted review rating.
pub const MAX_RATING: u8 = 5;
