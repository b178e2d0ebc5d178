use super::{create_review::normalize_content, prelude::*};
use crate::lifecycle;

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct EditedReview {
    pub review        : Review,
    /// The previous status if the edit reopened a decided review
    pub reopened_from : Option<ReviewStatus>,
    pub cleared_votes : usize,
}

fn load_own_review<D: ReviewRepo>(db: &D, author_id: &str, review_id: &str) -> Result<Review> {
    let review = db.get_review(review_id)?;
    if review.author_id.as_str() != author_id {
        log::warn!(
            "User {} tried to modify review {} of {}",
            author_id,
            review.id,
            review.author_id
        );
        return Err(Error::Forbidden);
    }
    Ok(review)
}

/// Replaces the content of a review.
///
/// Editing a decided review invalidates its moderation: it is
/// reopened and all votes are discarded.
pub fn edit_review<D>(
    db: &D,
    author_id: &str,
    review_id: &str,
    content: ReviewContent,
) -> Result<EditedReview>
where
    D: ReviewRepo + VoteRepo,
{
    let content = normalize_content(content)?;
    let mut review = load_own_review(db, author_id, review_id)?;
    let now = Timestamp::now();
    review.content = content;
    review.updated_at = now;
    let (reopened_from, cleared_votes) = if review.status.is_final() {
        let previous = lifecycle::reopen(&mut review, now);
        let cleared_votes = db.delete_votes_of_review(review_id)?;
        log::info!(
            "Review {} has been edited and reopened (was {}, {} votes cleared)",
            review.id,
            previous,
            cleared_votes
        );
        (Some(previous), cleared_votes)
    } else {
        log::debug!("Review {} has been edited", review.id);
        (None, 0)
    };
    db.update_review(&review)?;
    Ok(EditedReview {
        review,
        reopened_from,
        cleared_votes,
    })
}

/// Only pending reviews can be deleted by their author.
pub fn delete_review<D>(db: &D, author_id: &str, review_id: &str) -> Result<Review>
where
    D: ReviewRepo,
{
    let review = load_own_review(db, author_id, review_id)?;
    if review.status != ReviewStatus::Pending {
        return Err(Error::InvalidState(review.status));
    }
    db.delete_review(review_id)?;
    log::info!("Review {} has been deleted by its author", review.id);
    Ok(review)
}
