use super::*;
use revmod_entities as e;

impl From<e::review::ReviewStatus> for ReviewStatus {
    fn from(from: e::review::ReviewStatus) -> Self {
        use e::review::ReviewStatus::*;
        match from {
            Pending => ReviewStatus::Pending,
            Approved => ReviewStatus::Approved,
            Rejected => ReviewStatus::Rejected,
            Conflict => ReviewStatus::Conflict,
        }
    }
}

impl From<ReviewStatus> for e::review::ReviewStatus {
    fn from(from: ReviewStatus) -> Self {
        use e::review::ReviewStatus::*;
        match from {
            ReviewStatus::Pending => Pending,
            ReviewStatus::Approved => Approved,
            ReviewStatus::Rejected => Rejected,
            ReviewStatus::Conflict => Conflict,
        }
    }
}

impl From<e::vote::Decision> for Decision {
    fn from(from: e::vote::Decision) -> Self {
        use e::vote::Decision::*;
        match from {
            Approved => Decision::Approved,
            Rejected => Decision::Rejected,
        }
    }
}

impl From<Decision> for e::vote::Decision {
    fn from(from: Decision) -> Self {
        use e::vote::Decision::*;
        match from {
            Decision::Approved => Approved,
            Decision::Rejected => Rejected,
        }
    }
}

impl From<Option<e::vote::Decision>> for MyDecision {
    fn from(from: Option<e::vote::Decision>) -> Self {
        match from {
            Some(e::vote::Decision::Approved) => MyDecision::Approved,
            Some(e::vote::Decision::Rejected) => MyDecision::Rejected,
            None => MyDecision::Pending,
        }
    }
}

impl From<e::tally::Tally> for Tally {
    fn from(from: e::tally::Tally) -> Self {
        let e::tally::Tally {
            total_supervisors,
            approved,
            rejected,
            pending,
        } = from;
        Self {
            total_supervisors,
            approved,
            rejected,
            pending,
        }
    }
}

impl TallyResponse {
    pub fn new(tally: e::tally::Tally, required_approvals: usize) -> Self {
        Self {
            tally: tally.into(),
            required_approvals,
        }
    }
}

impl From<e::review::Review> for Review {
    fn from(from: e::review::Review) -> Self {
        let e::review::Review {
            id,
            item_id,
            author_id,
            content,
            status,
            decided_by,
            decided_at,
            rejection_reason,
            metadata,
            created_at,
            updated_at,
        } = from;
        let e::review::ReviewContent {
            title,
            body,
            rating,
            tags,
        } = content;
        Self {
            id: id.into(),
            item_id: item_id.into(),
            author_id: author_id.into(),
            title,
            body,
            rating: rating.into(),
            tags,
            status: status.into(),
            decided_by: decided_by.map(Into::into),
            decided_at: decided_at.map(|t| t.as_millis()),
            rejection_reason,
            metadata,
            created_at: created_at.as_millis(),
            updated_at: updated_at.as_millis(),
        }
    }
}

impl From<e::vote::Vote> for Vote {
    fn from(from: e::vote::Vote) -> Self {
        let e::vote::Vote {
            review_id: _,
            supervisor_id,
            decision,
            comment,
            updated_at,
        } = from;
        Self {
            supervisor_id: supervisor_id.into(),
            decision: decision.into(),
            comment,
            updated_at: updated_at.as_millis(),
        }
    }
}

impl From<e::rating::ItemRating> for ItemRating {
    fn from(from: e::rating::ItemRating) -> Self {
        Self {
            average: from.average.into(),
            total_ratings: from.total_ratings,
        }
    }
}

impl From<e::user::User> for User {
    fn from(from: e::user::User) -> Self {
        let e::user::User {
            id,
            username,
            email,
            active,
            roles,
        } = from;
        let roles = [e::user::Role::Supervisor, e::user::Role::Arbiter]
            .into_iter()
            .filter(|role| roles.contains(*role))
            .map(|role| role.to_string())
            .collect();
        Self {
            id: id.into(),
            username,
            email: email.map(e::email::EmailAddress::into_string),
            active,
            roles,
        }
    }
}

impl VoteResponse {
    pub fn new(
        review_status: e::review::ReviewStatus,
        tally: e::tally::Tally,
        my_decision: e::vote::Decision,
    ) -> Self {
        let message = match review_status {
            e::review::ReviewStatus::Pending => "Vote recorded",
            e::review::ReviewStatus::Approved => "Vote recorded, the review has been approved",
            e::review::ReviewStatus::Rejected => "Vote recorded, the review has been rejected",
            e::review::ReviewStatus::Conflict => {
                "Vote recorded, the review needs to be resolved by an arbiter"
            }
        };
        Self {
            message: message.to_owned(),
            review_status: review_status.into(),
            tally: tally.into(),
            my_decision: Some(my_decision).into(),
        }
    }
}
