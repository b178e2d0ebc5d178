use revmod_entities::id::*;

/// Keeps the aggregated rating of an item in sync with
/// its approved reviews.
pub trait RatingAggregator {
    fn recompute(&self, item_id: &Id) -> anyhow::Result<()>;
}
