use super::prelude::*;
use crate::RepoError;

/// Trims the text fields and checks the rating.
pub(crate) fn normalize_content(content: ReviewContent) -> Result<ReviewContent> {
    let ReviewContent {
        title,
        body,
        rating,
        tags,
    } = content;
    if !rating.is_valid() {
        return Err(Error::RatingValue);
    }
    let body = body.trim().to_string();
    if body.is_empty() {
        return Err(Error::EmptyContent);
    }
    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let mut tags: Vec<_> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort_unstable();
    tags.dedup();
    Ok(ReviewContent {
        title,
        body,
        rating,
        tags,
    })
}

pub fn create_review<D, I>(
    db: &D,
    identities: &I,
    author_id: &str,
    item_id: &str,
    content: ReviewContent,
) -> Result<Review>
where
    D: ReviewRepo,
    I: IdentityProvider + ?Sized,
{
    let content = normalize_content(content)?;
    let item_id = Id::from(item_id.trim());
    if !item_id.is_valid() {
        return Err(Error::Id);
    }
    let author = identities
        .identity(author_id)?
        .ok_or(Error::UserDoesNotExist)?;
    if !author.active {
        log::warn!("Inactive user {} tried to create a review", author.id);
        return Err(Error::Forbidden);
    }
    if db
        .try_get_review_by_author_and_item(author.id.as_str(), item_id.as_str())?
        .is_some()
    {
        return Err(Error::ReviewExists);
    }
    let now = Timestamp::now();
    let review = Review {
        id: Id::new(),
        item_id,
        author_id: author.id,
        content,
        status: ReviewStatus::Pending,
        decided_by: None,
        decided_at: None,
        rejection_reason: None,
        metadata: Default::default(),
        created_at: now,
        updated_at: now,
    };
    db.create_review(&review).map_err(|err| match err {
        RepoError::AlreadyExists => Error::ReviewExists,
        err => Error::Repo(err),
    })?;
    log::info!(
        "User {} created review {} of item {}",
        review.author_id,
        review.id,
        review.item_id
    );
    Ok(review)
}
