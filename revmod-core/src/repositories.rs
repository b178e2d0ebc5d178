// Low-level database access traits.
// Each repository is responsible for a single entity and
// its relationships. Related entities are only referenced
// by their id and never modified or loaded by another
// repository.

use crate::entities::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The requested object could not be found")]
    NotFound,
    #[error("The object already exists")]
    AlreadyExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

type Result<T> = std::result::Result<T, Error>;

pub trait ReviewRepo {
    // Fails with `AlreadyExists` if the author has already
    // reviewed the same item.
    fn create_review(&self, review: &Review) -> Result<()>;
    fn update_review(&self, review: &Review) -> Result<()>;
    // Deletes all votes of the review, too.
    fn delete_review(&self, id: &str) -> Result<()>;

    fn get_review(&self, id: &str) -> Result<Review>;
    fn try_get_review_by_author_and_item(
        &self,
        author_id: &str,
        item_id: &str,
    ) -> Result<Option<Review>>;

    // All queries below return the most recent reviews first.
    // status = None: Don't filter by status.
    fn reviews_with_status(&self, status: Option<ReviewStatus>) -> Result<Vec<Review>>;
    fn reviews_of_item_with_status(&self, item_id: &str, status: ReviewStatus)
        -> Result<Vec<Review>>;
    fn reviews_of_author(&self, author_id: &str) -> Result<Vec<Review>>;
    fn reviews_decided_by(&self, user_id: &str) -> Result<Vec<Review>>;

    fn count_reviews_with_status(&self, status: ReviewStatus) -> Result<usize>;
}

/// The vote ledger.
///
/// Votes are keyed by (review, supervisor). The ledger never
/// touches the status of a review.
pub trait VoteRepo {
    // Replaces the decision, comment and timestamp of an existing vote
    // or creates a new one. Returns `true` if the vote has been created.
    // Fails with `NotFound` if the review does not exist.
    fn record_vote(&self, vote: &Vote) -> Result<(Vote, bool)>;

    // Most recent votes first
    fn load_votes_of_review(&self, review_id: &str) -> Result<Vec<Vote>>;
    fn try_load_vote(&self, review_id: &str, supervisor_id: &str) -> Result<Option<Vote>>;

    fn delete_votes_of_review(&self, review_id: &str) -> Result<usize>;
}

pub trait UserRepo {
    fn create_user(&self, user: &User) -> Result<()>;
    fn update_user(&self, user: &User) -> Result<()>;

    fn try_get_user(&self, id: &str) -> Result<Option<User>>;
    fn try_get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn all_users(&self) -> Result<Vec<User>>;

    // Only active users
    fn users_with_role(&self, role: Role) -> Result<Vec<User>>;
    fn count_users_with_role(&self, role: Role) -> Result<usize>;
}

pub trait ItemRatingRepo {
    fn store_item_rating(&self, rating: &ItemRating) -> Result<()>;
    fn try_load_item_rating(&self, item_id: &str) -> Result<Option<ItemRating>>;
}
