use crate::{service::ModerationService, usecases, Result, Review, ReviewStatus, Role};
use revmod_core::rating::status_change_affects_rating;

impl ModerationService {
    /// Sets the status of a review directly, bypassing the votes.
    pub fn override_status(
        &self,
        status_override: usecases::StatusOverride,
    ) -> Result<usecases::OverriddenReview> {
        self.pre_authorize(status_override.arbiter_id.as_str(), Role::Arbiter)?;
        let overridden = {
            let _review_guard = self.review_locks.lock(status_override.review_id.as_str());
            let mut db = self.connections.exclusive()?;
            db.transaction(|conn| {
                usecases::override_review_status(conn, self.identities(conn), status_override)
            })?
        };
        if status_change_affects_rating(overridden.previous_status, overridden.review.status) {
            self.recalculate_item_rating(&overridden.review.item_id);
        }
        Ok(overridden)
    }

    /// Decides a review whose supervisors are tied.
    pub fn resolve_conflict(&self, resolution: usecases::ConflictResolution) -> Result<Review> {
        self.pre_authorize(resolution.arbiter_id.as_str(), Role::Arbiter)?;
        let review = {
            let _review_guard = self.review_locks.lock(resolution.review_id.as_str());
            let mut db = self.connections.exclusive()?;
            db.transaction(|conn| {
                usecases::resolve_conflict(conn, self.identities(conn), resolution)
            })?
        };
        if review.status == ReviewStatus::Approved {
            self.recalculate_item_rating(&review.item_id);
        }
        Ok(review)
    }
}
