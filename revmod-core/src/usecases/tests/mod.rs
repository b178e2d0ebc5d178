use super::prelude::*;
use crate::repositories::Error as RepoError;
use revmod_entities::builders::*;
use std::cell::RefCell;

type RepoResult<T> = std::result::Result<T, RepoError>;

#[derive(Default)]
pub struct MockDb {
    pub reviews: RefCell<Vec<Review>>,
    pub votes: RefCell<Vec<Vote>>,
    pub users: RefCell<Vec<User>>,
    pub item_ratings: RefCell<Vec<ItemRating>>,
}

impl MockDb {
    /// Supervisors `sup1`..`supN`, an arbiter `arb` and
    /// an ordinary user `author`.
    pub fn with_supervisors(n: usize) -> Self {
        let db = Self::default();
        for i in 1..=n {
            let id = format!("sup{i}");
            let user = User::build()
                .id(&id)
                .username(&id)
                .email(&format!("{id}@example.com"))
                .role(Role::Supervisor)
                .finish();
            db.create_user(&user).unwrap();
        }
        let arbiter = User::build()
            .id("arb")
            .username("arb")
            .email("arb@example.com")
            .role(Role::Arbiter)
            .finish();
        db.create_user(&arbiter).unwrap();
        let author = User::build().id("author").username("author").finish();
        db.create_user(&author).unwrap();
        db
    }

    pub fn add_review(&self, review: Review) -> Review {
        self.create_review(&review).unwrap();
        review
    }

    pub fn pending_review(&self, id: &str) -> Review {
        self.add_review(Review::build().id(id).item("item").author("author").finish())
    }

    pub fn add_vote(&self, review_id: &str, supervisor_id: &str, decision: Decision) {
        let vote = Vote::build()
            .review(review_id)
            .supervisor(supervisor_id)
            .decision(decision)
            .finish();
        self.record_vote(&vote).unwrap();
    }
}

fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reviews
}

impl ReviewRepo for MockDb {
    fn create_review(&self, review: &Review) -> RepoResult<()> {
        let mut reviews = self.reviews.borrow_mut();
        if reviews.iter().any(|r| {
            r.id == review.id
                || (r.author_id == review.author_id && r.item_id == review.item_id)
        }) {
            return Err(RepoError::AlreadyExists);
        }
        reviews.push(review.clone());
        Ok(())
    }

    fn update_review(&self, review: &Review) -> RepoResult<()> {
        let mut reviews = self.reviews.borrow_mut();
        let pos = reviews
            .iter()
            .position(|r| r.id == review.id)
            .ok_or(RepoError::NotFound)?;
        reviews[pos] = review.clone();
        Ok(())
    }

    fn delete_review(&self, id: &str) -> RepoResult<()> {
        let mut reviews = self.reviews.borrow_mut();
        let pos = reviews
            .iter()
            .position(|r| r.id.as_str() == id)
            .ok_or(RepoError::NotFound)?;
        reviews.remove(pos);
        self.votes
            .borrow_mut()
            .retain(|v| v.review_id.as_str() != id);
        Ok(())
    }

    fn get_review(&self, id: &str) -> RepoResult<Review> {
        self.reviews
            .borrow()
            .iter()
            .find(|r| r.id.as_str() == id)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    fn try_get_review_by_author_and_item(
        &self,
        author_id: &str,
        item_id: &str,
    ) -> RepoResult<Option<Review>> {
        Ok(self
            .reviews
            .borrow()
            .iter()
            .find(|r| r.author_id.as_str() == author_id && r.item_id.as_str() == item_id)
            .cloned())
    }

    fn reviews_with_status(&self, status: Option<ReviewStatus>) -> RepoResult<Vec<Review>> {
        Ok(newest_first(
            self.reviews
                .borrow()
                .iter()
                .filter(|r| status.map(|s| s == r.status).unwrap_or(true))
                .cloned()
                .collect(),
        ))
    }

    fn reviews_of_item_with_status(
        &self,
        item_id: &str,
        status: ReviewStatus,
    ) -> RepoResult<Vec<Review>> {
        Ok(newest_first(
            self.reviews
                .borrow()
                .iter()
                .filter(|r| r.item_id.as_str() == item_id && r.status == status)
                .cloned()
                .collect(),
        ))
    }

    fn reviews_of_author(&self, author_id: &str) -> RepoResult<Vec<Review>> {
        Ok(newest_first(
            self.reviews
                .borrow()
                .iter()
                .filter(|r| r.author_id.as_str() == author_id)
                .cloned()
                .collect(),
        ))
    }

    fn reviews_decided_by(&self, user_id: &str) -> RepoResult<Vec<Review>> {
        Ok(newest_first(
            self.reviews
                .borrow()
                .iter()
                .filter(|r| r.decided_by.as_ref().map(Id::as_str) == Some(user_id))
                .cloned()
                .collect(),
        ))
    }

    fn count_reviews_with_status(&self, status: ReviewStatus) -> RepoResult<usize> {
        Ok(self
            .reviews
            .borrow()
            .iter()
            .filter(|r| r.status == status)
            .count())
    }
}

impl VoteRepo for MockDb {
    fn record_vote(&self, vote: &Vote) -> RepoResult<(Vote, bool)> {
        self.get_review(vote.review_id.as_str())?;
        let mut votes = self.votes.borrow_mut();
        if let Some(existing) = votes
            .iter_mut()
            .find(|v| v.review_id == vote.review_id && v.supervisor_id == vote.supervisor_id)
        {
            existing.decision = vote.decision;
            existing.comment = vote.comment.clone();
            existing.updated_at = vote.updated_at;
            return Ok((existing.clone(), false));
        }
        votes.push(vote.clone());
        Ok((vote.clone(), true))
    }

    fn load_votes_of_review(&self, review_id: &str) -> RepoResult<Vec<Vote>> {
        let mut votes: Vec<_> = self
            .votes
            .borrow()
            .iter()
            .filter(|v| v.review_id.as_str() == review_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(votes)
    }

    fn try_load_vote(&self, review_id: &str, supervisor_id: &str) -> RepoResult<Option<Vote>> {
        Ok(self
            .votes
            .borrow()
            .iter()
            .find(|v| {
                v.review_id.as_str() == review_id && v.supervisor_id.as_str() == supervisor_id
            })
            .cloned())
    }

    fn delete_votes_of_review(&self, review_id: &str) -> RepoResult<usize> {
        let mut votes = self.votes.borrow_mut();
        let count = votes.len();
        votes.retain(|v| v.review_id.as_str() != review_id);
        Ok(count - votes.len())
    }
}

impl UserRepo for MockDb {
    fn create_user(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.borrow_mut();
        if users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(RepoError::AlreadyExists);
        }
        users.push(user.clone());
        Ok(())
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.borrow_mut();
        let pos = users
            .iter()
            .position(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        users[pos] = user.clone();
        Ok(())
    }

    fn try_get_user(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.id.as_str() == id)
            .cloned())
    }

    fn try_get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn all_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.users.borrow().clone())
    }

    fn users_with_role(&self, role: Role) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .filter(|u| u.has_role(role))
            .cloned()
            .collect())
    }

    fn count_users_with_role(&self, role: Role) -> RepoResult<usize> {
        Ok(self.users_with_role(role)?.len())
    }
}

impl IdentityProvider for MockDb {
    fn identity(&self, user_id: &str) -> RepoResult<Option<User>> {
        self.try_get_user(user_id)
    }

    fn supervisor_roster_size(&self) -> RepoResult<usize> {
        self.count_users_with_role(Role::Supervisor)
    }

    fn active_users_with_role(&self, role: Role) -> RepoResult<Vec<User>> {
        self.users_with_role(role)
    }
}

impl ItemRatingRepo for MockDb {
    fn store_item_rating(&self, rating: &ItemRating) -> RepoResult<()> {
        let mut ratings = self.item_ratings.borrow_mut();
        ratings.retain(|r| r.item_id != rating.item_id);
        ratings.push(rating.clone());
        Ok(())
    }

    fn try_load_item_rating(&self, item_id: &str) -> RepoResult<Option<ItemRating>> {
        Ok(self
            .item_ratings
            .borrow()
            .iter()
            .find(|r| r.item_id.as_str() == item_id)
            .cloned())
    }
}
