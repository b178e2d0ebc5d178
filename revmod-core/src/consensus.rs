//! Pure evaluation of the vote ledger of a single review.

use crate::entities::*;

/// Number of equal decisions required to finalize a review.
pub const fn majority_threshold(total_supervisors: usize) -> usize {
    total_supervisors / 2 + 1
}

/// Counts the votes of a review relative to the current roster size.
///
/// Approved and rejected reviews are frozen and always yield
/// an all-zero tally.
pub fn tally_votes(status: ReviewStatus, votes: &[Vote], total_supervisors: usize) -> Tally {
    if status.is_final() {
        return Tally::frozen();
    }
    let approved = votes
        .iter()
        .filter(|v| v.decision == Decision::Approved)
        .count();
    let rejected = votes.len() - approved;
    let cast = approved + rejected;
    if cast > total_supervisors {
        // The roster has shrunk after the votes were cast.
        log::warn!(
            "{} votes have been cast but only {} supervisors are left",
            cast,
            total_supervisors
        );
    }
    Tally {
        total_supervisors,
        approved,
        rejected,
        pending: total_supervisors.saturating_sub(cast),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Decided(Decision),
    Conflict,
    Undecided,
}

pub fn evaluate(tally: &Tally) -> Outcome {
    let threshold = majority_threshold(tally.total_supervisors);
    if tally.approved >= threshold {
        return Outcome::Decided(Decision::Approved);
    }
    if tally.rejected >= threshold {
        return Outcome::Decided(Decision::Rejected);
    }
    let everyone_voted = tally.cast() > 0 && tally.cast() >= tally.total_supervisors;
    if everyone_voted && tally.approved == tally.rejected {
        return Outcome::Conflict;
    }
    Outcome::Undecided
}

/// The most recent vote with the given decision.
pub fn latest_vote_with(votes: &[Vote], decision: Decision) -> Option<&Vote> {
    votes
        .iter()
        .filter(|v| v.decision == decision)
        .max_by_key(|v| v.updated_at)
}
