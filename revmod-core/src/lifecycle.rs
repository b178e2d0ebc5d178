//! Transitions of the review status.
//!
//! The functions in here only modify the review itself. Clearing
//! the vote ledger on reopening is up to the caller.

use crate::entities::*;
use thiserror::Error;

pub const OVERRIDE: &str = "override";
pub const ORIGINAL_STATUS: &str = "original_status";
pub const OVERRIDE_TIMESTAMP: &str = "override_timestamp";
pub const OVERRIDDEN_BY: &str = "overridden_by";
pub const OVERRIDE_REASON: &str = "override_reason";

pub const CONFLICT_RESOLVED: &str = "conflict_resolved";
pub const RESOLVED_BY: &str = "resolved_by";
pub const RESOLUTION_TIMESTAMP: &str = "resolution_timestamp";
pub const RESOLUTION_NOTES: &str = "resolution_notes";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid transition from '{from}' to '{to}'")]
pub struct InvalidTransition {
    pub from: ReviewStatus,
    pub to: ReviewStatus,
}

type Result = std::result::Result<(), InvalidTransition>;

fn ensure_source(review: &Review, allowed: &[ReviewStatus], to: ReviewStatus) -> Result {
    if allowed.contains(&review.status) {
        Ok(())
    } else {
        Err(InvalidTransition {
            from: review.status,
            to,
        })
    }
}

fn stamp_decision(review: &mut Review, decision: Decision, actor: &Id, now: Timestamp) {
    review.status = decision.into();
    review.decided_by = Some(actor.clone());
    review.decided_at = Some(now);
    review.updated_at = now;
}

/// Vote-driven finalization of a pending review.
pub fn finalize(
    review: &mut Review,
    decision: Decision,
    decisive_vote: &Vote,
    now: Timestamp,
) -> Result {
    ensure_source(review, &[ReviewStatus::Pending], decision.into())?;
    debug_assert_eq!(decision, decisive_vote.decision);
    stamp_decision(review, decision, &decisive_vote.supervisor_id, now);
    review.rejection_reason = match decision {
        Decision::Approved => None,
        Decision::Rejected => decisive_vote
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string),
    };
    Ok(())
}

/// A tie with all supervisors having voted.
pub fn mark_conflict(review: &mut Review, now: Timestamp) -> Result {
    ensure_source(review, &[ReviewStatus::Pending], ReviewStatus::Conflict)?;
    review.status = ReviewStatus::Conflict;
    review.updated_at = now;
    Ok(())
}

/// Back to pending, forgetting the previous decision.
///
/// Always succeeds. Returns the previous status.
pub fn reopen(review: &mut Review, now: Timestamp) -> ReviewStatus {
    let previous = review.status;
    review.status = ReviewStatus::Pending;
    review.decided_by = None;
    review.decided_at = None;
    review.rejection_reason = None;
    review.updated_at = now;
    previous
}

/// Sets the status directly, bypassing the tally.
///
/// Returns the previous status.
pub fn override_status(
    review: &mut Review,
    new_status: ReviewStatus,
    arbiter: &Id,
    reason: Option<&str>,
    now: Timestamp,
) -> std::result::Result<ReviewStatus, InvalidTransition> {
    let previous = review.status;
    match new_status {
        ReviewStatus::Pending => {
            reopen(review, now);
        }
        ReviewStatus::Approved => {
            stamp_decision(review, Decision::Approved, arbiter, now);
            review.rejection_reason = None;
        }
        ReviewStatus::Rejected => {
            stamp_decision(review, Decision::Rejected, arbiter, now);
            review.rejection_reason = Some(format!(
                "Arbiter override: {}",
                reason.unwrap_or("no reason provided")
            ));
        }
        ReviewStatus::Conflict => {
            return Err(InvalidTransition {
                from: previous,
                to: new_status,
            });
        }
    }
    let metadata = &mut review.metadata;
    metadata.insert(OVERRIDE.into(), "true".into());
    metadata.insert(ORIGINAL_STATUS.into(), previous.to_string());
    metadata.insert(OVERRIDE_TIMESTAMP.into(), now.format_rfc3339());
    metadata.insert(OVERRIDDEN_BY.into(), arbiter.to_string());
    match reason {
        Some(reason) => metadata.insert(OVERRIDE_REASON.into(), reason.into()),
        None => metadata.remove(OVERRIDE_REASON),
    };
    Ok(previous)
}

/// Decides a tied review.
pub fn resolve_conflict(
    review: &mut Review,
    decision: Decision,
    arbiter: &Id,
    notes: Option<&str>,
    now: Timestamp,
) -> Result {
    ensure_source(review, &[ReviewStatus::Conflict], decision.into())?;
    stamp_decision(review, decision, arbiter, now);
    review.rejection_reason = match decision {
        Decision::Approved => None,
        Decision::Rejected => notes.map(|n| format!("Conflict resolution: {n}")),
    };
    let metadata = &mut review.metadata;
    metadata.insert(CONFLICT_RESOLVED.into(), "true".into());
    metadata.insert(RESOLVED_BY.into(), arbiter.to_string());
    metadata.insert(RESOLUTION_TIMESTAMP.into(), now.format_rfc3339());
    match notes {
        Some(notes) => metadata.insert(RESOLUTION_NOTES.into(), notes.into()),
        None => metadata.remove(RESOLUTION_NOTES),
    };
    Ok(())
}
