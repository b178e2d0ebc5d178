use crate::{entities::*, repositories::*};

type Result<T> = std::result::Result<T, Error>;

/// Resolves callers and the supervisor roster.
///
/// The roster size must never be cached by implementations,
/// votes are always evaluated against the current roster.
/// Use cases receive the provider separately from the repositories,
/// so the accounts may live outside of the review database.
pub trait IdentityProvider {
    fn identity(&self, user_id: &str) -> Result<Option<User>>;
    fn supervisor_roster_size(&self) -> Result<usize>;
    /// Only active users
    fn active_users_with_role(&self, role: Role) -> Result<Vec<User>>;
}
