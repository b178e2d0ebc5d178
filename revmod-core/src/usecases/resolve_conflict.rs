use super::{authorize_user, prelude::*};
use crate::lifecycle;

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct ConflictResolution {
    pub review_id  : Id,
    pub arbiter_id : Id,
    pub decision   : Decision,
    pub notes      : Option<String>,
}

/// Decides a review in conflict.
///
/// The votes are kept to document the tie.
pub fn resolve_conflict<D, I>(
    db: &D,
    identities: &I,
    resolution: ConflictResolution,
) -> Result<Review>
where
    D: ReviewRepo,
    I: IdentityProvider + ?Sized,
{
    let ConflictResolution {
        review_id,
        arbiter_id,
        decision,
        notes,
    } = resolution;
    authorize_user(identities, arbiter_id.as_str(), Role::Arbiter)?;
    let mut review = db.get_review(review_id.as_str())?;
    let notes = notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    lifecycle::resolve_conflict(
        &mut review,
        decision,
        &arbiter_id,
        notes.as_deref(),
        Timestamp::now(),
    )
    .map_err(|err| {
        log::warn!(
            "Arbiter {} tried to resolve review {} that is not in conflict",
            arbiter_id,
            review_id
        );
        Error::from(err)
    })?;
    db.update_review(&review)?;
    log::info!(
        "Arbiter {} resolved the conflict of review {} as {}",
        arbiter_id,
        review.id,
        decision
    );
    Ok(review)
}
