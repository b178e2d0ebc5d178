use super::{authorize_user, prelude::*};
use crate::consensus;

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct ReviewTally {
    pub review             : Review,
    pub tally              : Tally,
    pub required_approvals : usize,
}

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct ReviewDecisions {
    pub review             : Review,
    pub tally              : Tally,
    pub required_approvals : usize,
    /// Most recent first
    pub votes              : Vec<Vote>,
    pub my_decision        : Option<Decision>,
}

/// Tally and required approvals, both based on a
/// single read of the supervisor roster.
pub(crate) fn tally_review<D, I>(db: &D, identities: &I, review: &Review) -> Result<(Tally, usize)>
where
    D: VoteRepo,
    I: IdentityProvider + ?Sized,
{
    let total_supervisors = identities.supervisor_roster_size()?;
    let votes = db.load_votes_of_review(review.id.as_str())?;
    Ok((
        consensus::tally_votes(review.status, &votes, total_supervisors),
        consensus::majority_threshold(total_supervisors),
    ))
}

pub fn load_tally<D, I>(db: &D, identities: &I, review_id: &str) -> Result<ReviewTally>
where
    D: ReviewRepo + VoteRepo,
    I: IdentityProvider + ?Sized,
{
    let review = db.get_review(review_id)?;
    let (tally, required_approvals) = tally_review(db, identities, &review)?;
    Ok(ReviewTally {
        review,
        tally,
        required_approvals,
    })
}

/// The decision of a supervisor or `None` if still pending.
pub fn decision_of<D>(db: &D, review_id: &str, supervisor_id: &str) -> Result<Option<Decision>>
where
    D: ReviewRepo + VoteRepo,
{
    // Fail for unknown reviews
    db.get_review(review_id)?;
    Ok(db
        .try_load_vote(review_id, supervisor_id)?
        .map(|v| v.decision))
}

pub fn list_decisions<D, I>(
    db: &D,
    identities: &I,
    caller_id: &str,
    review_id: &str,
) -> Result<ReviewDecisions>
where
    D: ReviewRepo + VoteRepo,
    I: IdentityProvider + ?Sized,
{
    let caller = authorize_user(identities, caller_id, Role::Supervisor)?;
    let review = db.get_review(review_id)?;
    let (tally, required_approvals) = tally_review(db, identities, &review)?;
    let votes = db.load_votes_of_review(review_id)?;
    let my_decision = votes
        .iter()
        .find(|v| v.supervisor_id == caller.id)
        .map(|v| v.decision);
    Ok(ReviewDecisions {
        review,
        tally,
        required_approvals,
        votes,
        my_decision,
    })
}
