use super::{authorize_user, prelude::*};
use crate::lifecycle;

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct StatusOverride {
    pub review_id  : Id,
    pub arbiter_id : Id,
    pub new_status : ReviewStatus,
    pub reason     : Option<String>,
}

#[rustfmt::skip]
#[derive(Debug, Clone)]
pub struct OverriddenReview {
    pub review          : Review,
    pub previous_status : ReviewStatus,
    pub cleared_votes   : usize,
}

/// Sets the status of a review regardless of its votes.
///
/// Resetting to pending also clears the vote ledger.
pub fn override_review_status<D, I>(
    db: &D,
    identities: &I,
    ov: StatusOverride,
) -> Result<OverriddenReview>
where
    D: ReviewRepo + VoteRepo,
    I: IdentityProvider + ?Sized,
{
    let StatusOverride {
        review_id,
        arbiter_id,
        new_status,
        reason,
    } = ov;
    authorize_user(identities, arbiter_id.as_str(), Role::Arbiter)?;
    if new_status == ReviewStatus::Conflict {
        return Err(Error::Status);
    }
    let mut review = db.get_review(review_id.as_str())?;
    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    let now = Timestamp::now();
    let previous_status =
        lifecycle::override_status(&mut review, new_status, &arbiter_id, reason.as_deref(), now)?;
    let cleared_votes = if new_status == ReviewStatus::Pending {
        db.delete_votes_of_review(review_id.as_str())?
    } else {
        0
    };
    db.update_review(&review)?;
    log::info!(
        "Arbiter {} changed the status of review {} from {} to {}",
        arbiter_id,
        review.id,
        previous_status,
        new_status
    );
    Ok(OverriddenReview {
        review,
        previous_status,
        cleared_votes,
    })
}

#[cfg(test)]
mod tests {
    use super::{super::tests::MockDb, *};
    use crate::lifecycle::{ORIGINAL_STATUS, OVERRIDDEN_BY, OVERRIDE};
    use revmod_entities::builders::*;

    fn override_to(
        db: &MockDb,
        arbiter: &str,
        review: &str,
        new_status: ReviewStatus,
    ) -> Result<OverriddenReview> {
        override_review_status(
            db,
            db,
            StatusOverride {
                review_id: review.into(),
                arbiter_id: arbiter.into(),
                new_status,
                reason: None,
            },
        )
    }

    #[test]
    fn approve_without_any_votes() {
        let db = MockDb::with_supervisors(3);
        db.pending_review("r");
        let res = override_to(&db, "arb", "r", ReviewStatus::Approved).unwrap();
        assert_eq!(res.previous_status, ReviewStatus::Pending);
        assert_eq!(res.review.status, ReviewStatus::Approved);
        assert_eq!(res.review.decided_by.as_ref().unwrap().as_str(), "arb");
        assert_eq!(res.review.metadata[OVERRIDE], "true");
        assert_eq!(res.review.metadata[ORIGINAL_STATUS], "pending");
        assert_eq!(res.review.metadata[OVERRIDDEN_BY], "arb");
        assert_eq!(db.get_review("r").unwrap(), res.review);
    }

    #[test]
    fn reject_with_reason() {
        let db = MockDb::with_supervisors(3);
        db.add_review(Review::build().id("r").status(ReviewStatus::Approved).finish());
        let res = override_review_status(
            &db,
            &db,
            StatusOverride {
                review_id: "r".into(),
                arbiter_id: "arb".into(),
                new_status: ReviewStatus::Rejected,
                reason: Some("Copied text".into()),
            },
        )
        .unwrap();
        assert_eq!(res.previous_status, ReviewStatus::Approved);
        assert_eq!(
            res.review.rejection_reason.as_deref(),
            Some("Arbiter override: Copied text")
        );
    }

    #[test]
    fn reset_to_pending_clears_votes() {
        let db = MockDb::with_supervisors(4);
        db.pending_review("r");
        db.add_vote("r", "sup1", Decision::Approved);
        db.add_vote("r", "sup2", Decision::Rejected);
        db.add_vote("r", "sup3", Decision::Approved);
        db.add_vote("r", "sup4", Decision::Rejected);
        let mut review = db.get_review("r").unwrap();
        review.status = ReviewStatus::Conflict;
        db.update_review(&review).unwrap();

        let res = override_to(&db, "arb", "r", ReviewStatus::Pending).unwrap();
        assert_eq!(res.cleared_votes, 4);
        assert_eq!(res.review.status, ReviewStatus::Pending);
        assert!(db.load_votes_of_review("r").unwrap().is_empty());
    }

    #[test]
    fn override_keeps_votes_unless_reset() {
        let db = MockDb::with_supervisors(3);
        db.pending_review("r");
        db.add_vote("r", "sup1", Decision::Rejected);
        let res = override_to(&db, "arb", "r", ReviewStatus::Approved).unwrap();
        assert_eq!(res.cleared_votes, 0);
        assert_eq!(db.load_votes_of_review("r").unwrap().len(), 1);
    }

    #[test]
    fn only_arbiters_can_override() {
        let db = MockDb::with_supervisors(3);
        db.pending_review("r");
        assert!(matches!(
            override_to(&db, "sup1", "r", ReviewStatus::Approved),
            Err(Error::Forbidden)
        ));
        assert_eq!(db.get_review("r").unwrap().status, ReviewStatus::Pending);
    }

    #[test]
    fn conflict_is_not_a_valid_target() {
        let db = MockDb::with_supervisors(3);
        db.pending_review("r");
        assert!(matches!(
            override_to(&db, "arb", "r", ReviewStatus::Conflict),
            Err(Error::Status)
        ));
    }

    #[test]
    fn non_arbiters_are_rejected_before_the_target_is_checked() {
        let db = MockDb::with_supervisors(3);
        db.pending_review("r");
        for caller in ["sup1", "author", "nobody"] {
            assert!(matches!(
                override_to(&db, caller, "r", ReviewStatus::Conflict),
                Err(Error::Forbidden)
            ));
        }
    }
}
