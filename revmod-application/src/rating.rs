use crate::{sqlite, usecases, Id};
use revmod_core::gateways::rating::RatingAggregator;

/// Stores the aggregated rating of an item in the database.
#[derive(Debug, Clone)]
pub struct DbRatingAggregator {
    connections: sqlite::Connections,
}

impl DbRatingAggregator {
    pub fn new(connections: sqlite::Connections) -> Self {
        Self { connections }
    }
}

impl RatingAggregator for DbRatingAggregator {
    fn recompute(&self, item_id: &Id) -> anyhow::Result<()> {
        let mut db = self.connections.exclusive()?;
        db.transaction(|conn| usecases::recalculate_item_rating(conn, item_id))?;
        Ok(())
    }
}
