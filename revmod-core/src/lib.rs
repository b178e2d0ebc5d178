//! Moderation rules: consensus evaluation, review lifecycle and use cases.
//!
//! Everything in here is storage agnostic and synchronous. Exclusive
//! access to a single review is the responsibility of the caller.

pub mod authorization;
pub mod consensus;
pub mod gateways;
pub mod lifecycle;
pub mod rating;
pub mod repositories;
pub mod usecases;

pub mod entities {
    pub use revmod_entities::{
        email::*, id::*, rating::*, review::*, tally::*, time::*, user::*, vote::*,
    };
}

pub use self::repositories::Error as RepoError;
