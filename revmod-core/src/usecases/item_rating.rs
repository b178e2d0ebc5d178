use super::prelude::*;
use crate::rating::Rated;

/// Recomputes and stores the aggregated rating of an item.
pub fn recalculate_item_rating<D>(db: &D, item_id: &Id) -> Result<ItemRating>
where
    D: ReviewRepo + ItemRatingRepo,
{
    let approved = db.reviews_of_item_with_status(item_id.as_str(), ReviewStatus::Approved)?;
    let rating = item_id.item_rating(&approved);
    db.store_item_rating(&rating)?;
    log::debug!(
        "Rating of item {} is {:.2} ({} reviews)",
        item_id,
        f64::from(rating.average),
        rating.total_ratings
    );
    Ok(rating)
}

/// Items without any approved review have a rating of zero.
pub fn load_item_rating<D: ItemRatingRepo>(db: &D, item_id: &str) -> Result<ItemRating> {
    Ok(db
        .try_load_item_rating(item_id)?
        .unwrap_or_else(|| ItemRating {
            item_id: item_id.into(),
            average: Default::default(),
            total_ratings: 0,
        }))
}
