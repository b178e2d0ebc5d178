use revmod_entities::{id::*, rating::*, review::*};

pub trait Rated {
    fn item_rating(&self, reviews: &[Review]) -> ItemRating;
}

/// Only approved reviews contribute to the rating of an item.
impl Rated for Id {
    fn item_rating(&self, reviews: &[Review]) -> ItemRating {
        debug_assert_eq!(
            reviews.len(),
            reviews.iter().filter(|r| &r.item_id == self).count()
        );
        let builder = reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Approved)
            .fold(AvgRatingValueBuilder::default(), |mut acc, r| {
                acc += r.content.rating;
                acc
            });
        ItemRating {
            item_id: self.clone(),
            total_ratings: builder.count(),
            average: builder.build(),
        }
    }
}

/// Whether a status change alters the set of approved reviews.
pub const fn status_change_affects_rating(from: ReviewStatus, to: ReviewStatus) -> bool {
    matches!(from, ReviewStatus::Approved) || matches!(to, ReviewStatus::Approved)
}
