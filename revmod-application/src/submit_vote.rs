use crate::{service::ModerationService, usecases, Result, ReviewStatus, Role};

impl ModerationService {
    /// Casts the vote of a supervisor and applies the consensus.
    pub fn submit_vote(&self, new_vote: usecases::NewVote) -> Result<usecases::CastVote> {
        self.pre_authorize(new_vote.supervisor_id.as_str(), Role::Supervisor)?;
        let cast_vote = {
            let _review_guard = self.review_locks.lock(new_vote.review_id.as_str());
            let mut db = self.connections.exclusive()?;
            db.transaction(|conn| usecases::cast_vote(conn, self.identities(conn), new_vote))?
        };
        match cast_vote.transition {
            Some(ReviewStatus::Approved) => {
                self.recalculate_item_rating(&cast_vote.review.item_id);
            }
            Some(ReviewStatus::Conflict) => {
                self.notify_conflict(&cast_vote.review, &cast_vote.tally);
            }
            _ => {}
        }
        Ok(cast_vote)
    }
}
