use super::{authorize_user, authorize_user_with_any_role, prelude::*, tally::tally_review};

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct ModerationEntry {
    pub review             : Review,
    pub tally              : Tally,
    pub required_approvals : usize,
    pub my_decision        : Option<Decision>,
}

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct ConflictedReview {
    pub review : Review,
    pub tally  : Tally,
    pub votes  : Vec<Vote>,
}

/// Reviews for supervisors and arbiters, most recent first.
///
/// status = None: All reviews
pub fn reviews_for_moderation<D, I>(
    db: &D,
    identities: &I,
    caller_id: &str,
    status: Option<ReviewStatus>,
) -> Result<Vec<ModerationEntry>>
where
    D: ReviewRepo + VoteRepo,
    I: IdentityProvider + ?Sized,
{
    let caller =
        authorize_user_with_any_role(identities, caller_id, &[Role::Supervisor, Role::Arbiter])?;
    db.reviews_with_status(status)?
        .into_iter()
        .map(|review| -> Result<_> {
            let (tally, required_approvals) = tally_review(db, identities, &review)?;
            let my_decision = db
                .try_load_vote(review.id.as_str(), caller.id.as_str())?
                .map(|v| v.decision);
            Ok(ModerationEntry {
                review,
                tally,
                required_approvals,
                my_decision,
            })
        })
        .collect()
}

pub fn conflicted_reviews<D, I>(
    db: &D,
    identities: &I,
    caller_id: &str,
) -> Result<Vec<ConflictedReview>>
where
    D: ReviewRepo + VoteRepo,
    I: IdentityProvider + ?Sized,
{
    authorize_user(identities, caller_id, Role::Arbiter)?;
    db.reviews_with_status(Some(ReviewStatus::Conflict))?
        .into_iter()
        .map(|review| -> Result<_> {
            let (tally, _) = tally_review(db, identities, &review)?;
            let votes = db.load_votes_of_review(review.id.as_str())?;
            Ok(ConflictedReview {
                review,
                tally,
                votes,
            })
        })
        .collect()
}
