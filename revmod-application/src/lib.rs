#[macro_use]
extern crate log;

mod locks;
mod manage_reviews;
mod manage_users;
mod queries;
mod rating;
mod resolve_conflict;
mod service;
mod submit_vote;

pub mod error;

pub use self::{
    locks::{ReviewGuard, ReviewLocks},
    rating::DbRatingAggregator,
    service::{ConflictRecipients, ModerationService, NotificationSettings},
};

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use revmod_core::{entities::*, repositories::*, usecases};

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use revmod_db_sqlite::Connections;
}
