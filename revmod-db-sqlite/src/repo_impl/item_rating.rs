use super::*;

impl<'a> ItemRatingRepo for DbReadOnly<'a> {
    fn store_item_rating(&self, _rating: &ItemRating) -> Result<()> {
        Err(read_only_err())
    }
    fn try_load_item_rating(&self, item_id: &str) -> Result<Option<ItemRating>> {
        try_load_item_rating(&mut self.conn.borrow_mut(), item_id)
    }
}

impl<'a> ItemRatingRepo for DbReadWrite<'a> {
    fn store_item_rating(&self, rating: &ItemRating) -> Result<()> {
        store_item_rating(&mut self.conn.borrow_mut(), rating)
    }
    fn try_load_item_rating(&self, item_id: &str) -> Result<Option<ItemRating>> {
        try_load_item_rating(&mut self.conn.borrow_mut(), item_id)
    }
}

impl<'a> ItemRatingRepo for DbConnection<'a> {
    fn store_item_rating(&self, rating: &ItemRating) -> Result<()> {
        store_item_rating(&mut self.conn.borrow_mut(), rating)
    }
    fn try_load_item_rating(&self, item_id: &str) -> Result<Option<ItemRating>> {
        try_load_item_rating(&mut self.conn.borrow_mut(), item_id)
    }
}

fn store_item_rating(conn: &mut SqliteConnection, rating: &ItemRating) -> Result<()> {
    let new_rating = models::NewItemRating {
        item_id: rating.item_id.as_str(),
        average: rating.average.into(),
        total_ratings: rating.total_ratings as i64,
    };
    diesel::replace_into(schema::item_ratings::table)
        .values(&new_rating)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn try_load_item_rating(conn: &mut SqliteConnection, item_id: &str) -> Result<Option<ItemRating>> {
    use schema::item_ratings::dsl;
    Ok(dsl::item_ratings
        .filter(dsl::item_id.eq(item_id))
        .first::<models::ItemRatingEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(|entity| {
            let models::ItemRatingEntity {
                item_id,
                average,
                total_ratings,
            } = entity;
            ItemRating {
                item_id: item_id.into(),
                average: average.into(),
                total_ratings: total_ratings as usize,
            }
        }))
}
