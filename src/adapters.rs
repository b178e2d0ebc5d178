//! Conversions between the engine and its JSON representation.

use revmod_application::error::{AppError, ErrorKind};
use revmod_boundary as json;
use revmod_core::{
    entities::{Decision, ReviewStatus},
    gateways::notify::{NotificationEvent, NotificationGateway},
    usecases,
};

pub fn error_response(err: &AppError) -> json::Error {
    let http_status = match err.kind() {
        ErrorKind::NotFound => json::Error::NOT_FOUND,
        ErrorKind::Forbidden => json::Error::FORBIDDEN,
        ErrorKind::InvalidState => json::Error::CONFLICT,
        ErrorKind::Validation => json::Error::BAD_REQUEST,
        ErrorKind::Internal => json::Error::INTERNAL_SERVER_ERROR,
    };
    let message = match err.kind() {
        // Don't leak details of the infrastructure
        ErrorKind::Internal => "Internal error".to_string(),
        _ => err.to_string(),
    };
    json::Error {
        http_status,
        message,
    }
}

/// `all` selects reviews of any status.
pub fn parse_status_filter(filter: &str) -> Result<Option<ReviewStatus>, AppError> {
    if filter.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    filter
        .parse()
        .map(Some)
        .map_err(|_| usecases::Error::Status.into())
}

pub fn vote_response(cast_vote: &usecases::CastVote) -> json::VoteResponse {
    json::VoteResponse::new(
        cast_vote.review.status,
        cast_vote.tally,
        cast_vote.vote.decision,
    )
}

pub fn tally_response(review_tally: &usecases::ReviewTally) -> json::TallyResponse {
    json::TallyResponse::new(review_tally.tally, review_tally.required_approvals)
}

pub fn conflict_resolution(review_id: &str, decision: Decision) -> json::ConflictResolution {
    json::ConflictResolution {
        review_id: review_id.to_owned(),
        final_decision: decision.into(),
    }
}

pub fn moderation_entry(entry: usecases::ModerationEntry) -> json::ModerationEntry {
    let usecases::ModerationEntry {
        review,
        tally,
        required_approvals,
        my_decision,
    } = entry;
    json::ModerationEntry {
        review: review.into(),
        tally: json::TallyResponse::new(tally, required_approvals),
        my_decision: my_decision.into(),
    }
}

pub fn review_decisions(decisions: usecases::ReviewDecisions) -> json::ReviewDecisions {
    let usecases::ReviewDecisions {
        review,
        tally,
        required_approvals,
        votes,
        my_decision,
    } = decisions;
    json::ReviewDecisions {
        review_id: review.id.into(),
        tally: json::TallyResponse::new(tally, required_approvals),
        votes: votes.into_iter().map(Into::into).collect(),
        my_decision: my_decision.into(),
    }
}

pub fn conflicted_review(conflicted: usecases::ConflictedReview) -> json::ConflictedReview {
    let usecases::ConflictedReview {
        review,
        tally,
        votes,
    } = conflicted;
    json::ConflictedReview {
        review: review.into(),
        tally: tally.into(),
        votes: votes.into_iter().map(Into::into).collect(),
    }
}

pub fn supervisor_stats(stats: usecases::SupervisorStats) -> json::SupervisorStats {
    let usecases::SupervisorStats {
        decided,
        approved,
        rejected,
        pending_in_system,
    } = stats;
    json::SupervisorStats {
        decided,
        approved,
        rejected,
        pending_in_system,
    }
}

pub fn author_stats(stats: usecases::AuthorStats) -> json::AuthorStats {
    let usecases::AuthorStats {
        total,
        pending,
        approved,
        rejected,
        conflict,
        average_rating,
    } = stats;
    json::AuthorStats {
        total,
        pending,
        approved,
        rejected,
        conflict,
        average_rating: average_rating.into(),
    }
}

/// Used if no e-mail gateway has been configured.
pub struct NoEmailGateway;

impl NotificationGateway for NoEmailGateway {
    fn notify(&self, event: NotificationEvent) -> anyhow::Result<()> {
        match event {
            NotificationEvent::ReviewConflict {
                review,
                email_addresses,
                ..
            } => {
                log::info!(
                    "No e-mail gateway configured: {} recipients are not notified about the conflict of review {}",
                    email_addresses.len(),
                    review.id
                );
            }
        }
        Ok(())
    }
}
