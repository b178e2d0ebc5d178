use crate::{entities::*, lifecycle::InvalidTransition, repositories};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Rating value out of range")]
    RatingValue,
    #[error("Empty review text")]
    EmptyContent,
    #[error("Invalid decision")]
    Decision,
    #[error("Invalid review status")]
    Status,
    #[error("The item has already been reviewed by this author")]
    ReviewExists,
    #[error("The user already exists")]
    UserExists,
    #[error("The user does not exist")]
    UserDoesNotExist,
    #[error("Invalid username")]
    Username,
    #[error("Invalid id")]
    Id,
    #[error("This is not allowed")]
    Forbidden,
    #[error("The operation is not allowed for a review with status '{0}'")]
    InvalidState(ReviewStatus),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

impl From<InvalidTransition> for Error {
    fn from(err: InvalidTransition) -> Self {
        Self::InvalidState(err.from)
    }
}

