mod authorize;
mod cast_vote;
mod create_review;
mod edit_review;
mod error;
mod item_rating;
mod manage_users;
mod moderation_queue;
mod notification_recipients;
mod override_status;
mod resolve_conflict;
mod stats;
mod tally;

#[cfg(test)]
pub mod tests;

pub use self::{
    authorize::*, cast_vote::*, create_review::*, edit_review::*, error::Error, item_rating::*,
    manage_users::*, moderation_queue::*, notification_recipients::*, override_status::*,
    resolve_conflict::*, stats::*, tally::*,
};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{entities::*, gateways::identity::*, repositories::*};
}
