use crate::{service::ModerationService, usecases, Result, Review, ReviewContent, ReviewStatus};

impl ModerationService {
    pub fn create_review(
        &self,
        author_id: &str,
        item_id: &str,
        content: ReviewContent,
    ) -> Result<Review> {
        let mut db = self.connections.exclusive()?;
        let review = db.transaction(|conn| {
            usecases::create_review(conn, self.identities(conn), author_id, item_id, content)
        })?;
        Ok(review)
    }

    /// Editing a decided review reopens its moderation.
    pub fn edit_review(
        &self,
        author_id: &str,
        review_id: &str,
        content: ReviewContent,
    ) -> Result<usecases::EditedReview> {
        let edited = {
            let _review_guard = self.review_locks.lock(review_id);
            let mut db = self.connections.exclusive()?;
            db.transaction(|conn| usecases::edit_review(conn, author_id, review_id, content))?
        };
        if edited.reopened_from == Some(ReviewStatus::Approved) {
            self.recalculate_item_rating(&edited.review.item_id);
        }
        Ok(edited)
    }

    pub fn delete_review(&self, author_id: &str, review_id: &str) -> Result<Review> {
        let review = {
            let _review_guard = self.review_locks.lock(review_id);
            let mut db = self.connections.exclusive()?;
            db.transaction(|conn| usecases::delete_review(conn, author_id, review_id))?
        };
        Ok(review)
    }
}
