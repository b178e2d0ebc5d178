use crate::{
    service::ModerationService, usecases, Decision, ItemRating, Result, Review, ReviewRepo,
    ReviewStatus,
};

// Read-only operations don't need the review lock.
impl ModerationService {
    pub fn review(&self, review_id: &str) -> Result<Review> {
        let db = self.connections.shared()?;
        Ok(db.get_review(review_id)?)
    }

    pub fn tally(&self, review_id: &str) -> Result<usecases::ReviewTally> {
        let db = self.connections.shared()?;
        Ok(usecases::load_tally(&db, self.identities(&db), review_id)?)
    }

    /// `None` means the supervisor has not voted yet.
    pub fn decision_of(&self, review_id: &str, supervisor_id: &str) -> Result<Option<Decision>> {
        let db = self.connections.shared()?;
        Ok(usecases::decision_of(&db, review_id, supervisor_id)?)
    }

    pub fn list_decisions(
        &self,
        caller_id: &str,
        review_id: &str,
    ) -> Result<usecases::ReviewDecisions> {
        let db = self.connections.shared()?;
        let identities = self.identities(&db);
        Ok(usecases::list_decisions(&db, identities, caller_id, review_id)?)
    }

    pub fn reviews_for_moderation(
        &self,
        caller_id: &str,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<usecases::ModerationEntry>> {
        let db = self.connections.shared()?;
        let identities = self.identities(&db);
        Ok(usecases::reviews_for_moderation(&db, identities, caller_id, status)?)
    }

    pub fn conflicted_reviews(&self, caller_id: &str) -> Result<Vec<usecases::ConflictedReview>> {
        let db = self.connections.shared()?;
        Ok(usecases::conflicted_reviews(&db, self.identities(&db), caller_id)?)
    }

    pub fn supervisor_stats(&self, caller_id: &str) -> Result<usecases::SupervisorStats> {
        let db = self.connections.shared()?;
        Ok(usecases::supervisor_stats(&db, self.identities(&db), caller_id)?)
    }

    pub fn author_stats(&self, author_id: &str) -> Result<usecases::AuthorStats> {
        let db = self.connections.shared()?;
        Ok(usecases::author_stats(&db, author_id)?)
    }

    pub fn item_rating(&self, item_id: &str) -> Result<ItemRating> {
        let db = self.connections.shared()?;
        Ok(usecases::load_item_rating(&db, item_id)?)
    }
}
