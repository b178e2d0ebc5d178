use super::{authorize_user, prelude::*};
use crate::{
    consensus::{self, Outcome},
    lifecycle, RepoError,
};

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct NewVote {
    pub review_id     : Id,
    pub supervisor_id : Id,
    pub decision      : Decision,
    pub comment       : Option<String>,
}

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct CastVote {
    pub review     : Review,
    pub vote       : Vote,
    /// `false` if a previous vote has been replaced
    pub created    : bool,
    pub tally      : Tally,
    /// The new status if this vote finalized the review
    /// or turned it into a conflict.
    pub transition : Option<ReviewStatus>,
}

/// Records a vote and evaluates the consensus.
///
/// Must run with exclusive access to the review. The role of the
/// supervisor is checked again here, it might have been revoked
/// while waiting for that access.
pub fn cast_vote<D, I>(db: &D, identities: &I, new_vote: NewVote) -> Result<CastVote>
where
    D: ReviewRepo + VoteRepo,
    I: IdentityProvider + ?Sized,
{
    let NewVote {
        review_id,
        supervisor_id,
        decision,
        comment,
    } = new_vote;
    authorize_user(identities, supervisor_id.as_str(), Role::Supervisor)?;
    let mut review = db.get_review(review_id.as_str())?;
    if review.status != ReviewStatus::Pending {
        log::warn!(
            "Supervisor {} tried to vote on review {} with status {}",
            supervisor_id,
            review.id,
            review.status
        );
        return Err(Error::InvalidState(review.status));
    }
    let now = Timestamp::now();
    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let (vote, created) = db.record_vote(&Vote {
        review_id,
        supervisor_id,
        decision,
        comment,
        updated_at: now,
    })?;
    if created {
        log::info!(
            "Supervisor {} voted '{}' on review {}",
            vote.supervisor_id,
            vote.decision,
            vote.review_id
        );
    } else {
        log::info!(
            "Supervisor {} changed the vote on review {} to '{}'",
            vote.supervisor_id,
            vote.review_id,
            vote.decision
        );
    }

    // The roster is read exactly once per evaluation
    let total_supervisors = identities.supervisor_roster_size()?;
    let votes = db.load_votes_of_review(review.id.as_str())?;
    let tally = consensus::tally_votes(review.status, &votes, total_supervisors);
    let transition = match consensus::evaluate(&tally) {
        Outcome::Decided(decision) => {
            let decisive_vote = if vote.decision == decision {
                &vote
            } else {
                consensus::latest_vote_with(&votes, decision).ok_or_else(|| {
                    RepoError::Other(anyhow::anyhow!(
                        "No '{decision}' vote found for review {}",
                        review.id
                    ))
                })?
            };
            lifecycle::finalize(&mut review, decision, decisive_vote, now)?;
            db.update_review(&review)?;
            log::info!(
                "Review {} has been {} (decided by {})",
                review.id,
                review.status,
                decisive_vote.supervisor_id
            );
            Some(review.status)
        }
        Outcome::Conflict => {
            lifecycle::mark_conflict(&mut review, now)?;
            db.update_review(&review)?;
            log::info!(
                "Review {} is in conflict: {} approved vs. {} rejected",
                review.id,
                tally.approved,
                tally.rejected
            );
            Some(review.status)
        }
        Outcome::Undecided => None,
    };
    let tally = if transition.is_some() {
        consensus::tally_votes(review.status, &votes, total_supervisors)
    } else {
        tally
    };
    Ok(CastVote {
        review,
        vote,
        created,
        tally,
        transition,
    })
}
