use super::*;

impl<'a> ReviewRepo for DbReadOnly<'a> {
    fn create_review(&self, _review: &Review) -> Result<()> {
        Err(read_only_err())
    }
    fn update_review(&self, _review: &Review) -> Result<()> {
        Err(read_only_err())
    }
    fn delete_review(&self, _id: &str) -> Result<()> {
        Err(read_only_err())
    }

    fn get_review(&self, id: &str) -> Result<Review> {
        get_review(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_review_by_author_and_item(
        &self,
        author_id: &str,
        item_id: &str,
    ) -> Result<Option<Review>> {
        try_get_review_by_author_and_item(&mut self.conn.borrow_mut(), author_id, item_id)
    }
    fn reviews_with_status(&self, status: Option<ReviewStatus>) -> Result<Vec<Review>> {
        reviews_with_status(&mut self.conn.borrow_mut(), status)
    }
    fn reviews_of_item_with_status(
        &self,
        item_id: &str,
        status: ReviewStatus,
    ) -> Result<Vec<Review>> {
        reviews_of_item_with_status(&mut self.conn.borrow_mut(), item_id, status)
    }
    fn reviews_of_author(&self, author_id: &str) -> Result<Vec<Review>> {
        reviews_of_author(&mut self.conn.borrow_mut(), author_id)
    }
    fn reviews_decided_by(&self, user_id: &str) -> Result<Vec<Review>> {
        reviews_decided_by(&mut self.conn.borrow_mut(), user_id)
    }
    fn count_reviews_with_status(&self, status: ReviewStatus) -> Result<usize> {
        count_reviews_with_status(&mut self.conn.borrow_mut(), status)
    }
}

impl<'a> ReviewRepo for DbReadWrite<'a> {
    fn create_review(&self, review: &Review) -> Result<()> {
        create_review(&mut self.conn.borrow_mut(), review)
    }
    fn update_review(&self, review: &Review) -> Result<()> {
        update_review(&mut self.conn.borrow_mut(), review)
    }
    fn delete_review(&self, id: &str) -> Result<()> {
        delete_review(&mut self.conn.borrow_mut(), id)
    }

    fn get_review(&self, id: &str) -> Result<Review> {
        get_review(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_review_by_author_and_item(
        &self,
        author_id: &str,
        item_id: &str,
    ) -> Result<Option<Review>> {
        try_get_review_by_author_and_item(&mut self.conn.borrow_mut(), author_id, item_id)
    }
    fn reviews_with_status(&self, status: Option<ReviewStatus>) -> Result<Vec<Review>> {
        reviews_with_status(&mut self.conn.borrow_mut(), status)
    }
    fn reviews_of_item_with_status(
        &self,
        item_id: &str,
        status: ReviewStatus,
    ) -> Result<Vec<Review>> {
        reviews_of_item_with_status(&mut self.conn.borrow_mut(), item_id, status)
    }
    fn reviews_of_author(&self, author_id: &str) -> Result<Vec<Review>> {
        reviews_of_author(&mut self.conn.borrow_mut(), author_id)
    }
    fn reviews_decided_by(&self, user_id: &str) -> Result<Vec<Review>> {
        reviews_decided_by(&mut self.conn.borrow_mut(), user_id)
    }
    fn count_reviews_with_status(&self, status: ReviewStatus) -> Result<usize> {
        count_reviews_with_status(&mut self.conn.borrow_mut(), status)
    }
}

impl<'a> ReviewRepo for DbConnection<'a> {
    fn create_review(&self, review: &Review) -> Result<()> {
        create_review(&mut self.conn.borrow_mut(), review)
    }
    fn update_review(&self, review: &Review) -> Result<()> {
        update_review(&mut self.conn.borrow_mut(), review)
    }
    fn delete_review(&self, id: &str) -> Result<()> {
        delete_review(&mut self.conn.borrow_mut(), id)
    }

    fn get_review(&self, id: &str) -> Result<Review> {
        get_review(&mut self.conn.borrow_mut(), id)
    }
    fn try_get_review_by_author_and_item(
        &self,
        author_id: &str,
        item_id: &str,
    ) -> Result<Option<Review>> {
        try_get_review_by_author_and_item(&mut self.conn.borrow_mut(), author_id, item_id)
    }
    fn reviews_with_status(&self, status: Option<ReviewStatus>) -> Result<Vec<Review>> {
        reviews_with_status(&mut self.conn.borrow_mut(), status)
    }
    fn reviews_of_item_with_status(
        &self,
        item_id: &str,
        status: ReviewStatus,
    ) -> Result<Vec<Review>> {
        reviews_of_item_with_status(&mut self.conn.borrow_mut(), item_id, status)
    }
    fn reviews_of_author(&self, author_id: &str) -> Result<Vec<Review>> {
        reviews_of_author(&mut self.conn.borrow_mut(), author_id)
    }
    fn reviews_decided_by(&self, user_id: &str) -> Result<Vec<Review>> {
        reviews_decided_by(&mut self.conn.borrow_mut(), user_id)
    }
    fn count_reviews_with_status(&self, status: ReviewStatus) -> Result<usize> {
        count_reviews_with_status(&mut self.conn.borrow_mut(), status)
    }
}

fn new_review_model(review: &Review) -> Result<models::NewReview<'_>> {
    let Review {
        id,
        item_id,
        author_id,
        content,
        status,
        decided_by,
        decided_at,
        rejection_reason,
        metadata,
        created_at,
        updated_at,
    } = review;
    Ok(models::NewReview {
        id: id.as_str(),
        item_id: item_id.as_str(),
        author_id: author_id.as_str(),
        title: content.title.as_deref(),
        body: &content.body,
        rating: i16::from(u8::from(content.rating)),
        tags: serde_json::to_string(&content.tags).map_err(anyhow::Error::from)?,
        status: review_status_primitive(*status),
        decided_by: decided_by.as_ref().map(Id::as_str),
        decided_at: decided_at.map(Timestamp::as_millis),
        rejection_reason: rejection_reason.as_deref(),
        metadata: serde_json::to_string(metadata).map_err(anyhow::Error::from)?,
        created_at: created_at.as_millis(),
        updated_at: updated_at.as_millis(),
    })
}

fn load_review(entity: models::ReviewEntity) -> Result<Review> {
    let models::ReviewEntity {
        id,
        item_id,
        author_id,
        title,
        body,
        rating,
        tags,
        status,
        decided_by,
        decided_at,
        rejection_reason,
        metadata,
        created_at,
        updated_at,
    } = entity;
    let rating = u8::try_from(rating)
        .map(RatingValue::from)
        .map_err(|_| anyhow!("Invalid rating value: {rating}"))?;
    let tags = serde_json::from_str(&tags).map_err(anyhow::Error::from)?;
    let metadata = serde_json::from_str(&metadata).map_err(anyhow::Error::from)?;
    Ok(Review {
        id: id.into(),
        item_id: item_id.into(),
        author_id: author_id.into(),
        content: ReviewContent {
            title,
            body,
            rating,
            tags,
        },
        status: load_review_status(status)?,
        decided_by: decided_by.map(Into::into),
        decided_at: decided_at.map(Timestamp::from_millis),
        rejection_reason,
        metadata,
        created_at: Timestamp::from_millis(created_at),
        updated_at: Timestamp::from_millis(updated_at),
    })
}

fn load_reviews(entities: Vec<models::ReviewEntity>) -> Result<Vec<Review>> {
    entities.into_iter().map(load_review).collect()
}

fn create_review(conn: &mut SqliteConnection, review: &Review) -> Result<()> {
    let new_review = new_review_model(review)?;
    diesel::insert_into(schema::reviews::table)
        .values(&new_review)
        .execute(conn)
        .map_err(from_diesel_err)?;
    Ok(())
}

fn update_review(conn: &mut SqliteConnection, review: &Review) -> Result<()> {
    use schema::reviews::dsl;
    let new_review = new_review_model(review)?;
    let count = diesel::update(dsl::reviews.filter(dsl::id.eq(new_review.id)))
        .set(&new_review)
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    debug_assert_eq!(1, count);
    Ok(())
}

fn delete_review(conn: &mut SqliteConnection, id: &str) -> Result<()> {
    use schema::reviews::dsl;
    // Votes are deleted by the database (ON DELETE CASCADE)
    let count = diesel::delete(dsl::reviews.filter(dsl::id.eq(id)))
        .execute(conn)
        .map_err(from_diesel_err)?;
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    Ok(())
}

fn get_review(conn: &mut SqliteConnection, id: &str) -> Result<Review> {
    use schema::reviews::dsl;
    let entity = dsl::reviews
        .filter(dsl::id.eq(id))
        .first::<models::ReviewEntity>(conn)
        .map_err(from_diesel_err)?;
    load_review(entity)
}

fn try_get_review_by_author_and_item(
    conn: &mut SqliteConnection,
    author_id: &str,
    item_id: &str,
) -> Result<Option<Review>> {
    use schema::reviews::dsl;
    dsl::reviews
        .filter(dsl::author_id.eq(author_id))
        .filter(dsl::item_id.eq(item_id))
        .first::<models::ReviewEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(load_review)
        .transpose()
}

fn reviews_with_status(
    conn: &mut SqliteConnection,
    status: Option<ReviewStatus>,
) -> Result<Vec<Review>> {
    use schema::reviews::dsl;
    let mut query = dsl::reviews.into_boxed();
    if let Some(status) = status {
        query = query.filter(dsl::status.eq(review_status_primitive(status)));
    }
    let entities = query
        .order_by(dsl::created_at.desc())
        .load::<models::ReviewEntity>(conn)
        .map_err(from_diesel_err)?;
    load_reviews(entities)
}

fn reviews_of_item_with_status(
    conn: &mut SqliteConnection,
    item_id: &str,
    status: ReviewStatus,
) -> Result<Vec<Review>> {
    use schema::reviews::dsl;
    let entities = dsl::reviews
        .filter(dsl::item_id.eq(item_id))
        .filter(dsl::status.eq(review_status_primitive(status)))
        .order_by(dsl::created_at.desc())
        .load::<models::ReviewEntity>(conn)
        .map_err(from_diesel_err)?;
    load_reviews(entities)
}

fn reviews_of_author(conn: &mut SqliteConnection, author_id: &str) -> Result<Vec<Review>> {
    use schema::reviews::dsl;
    let entities = dsl::reviews
        .filter(dsl::author_id.eq(author_id))
        .order_by(dsl::created_at.desc())
        .load::<models::ReviewEntity>(conn)
        .map_err(from_diesel_err)?;
    load_reviews(entities)
}

fn reviews_decided_by(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Review>> {
    use schema::reviews::dsl;
    let entities = dsl::reviews
        .filter(dsl::decided_by.eq(user_id))
        .order_by(dsl::created_at.desc())
        .load::<models::ReviewEntity>(conn)
        .map_err(from_diesel_err)?;
    load_reviews(entities)
}

fn count_reviews_with_status(conn: &mut SqliteConnection, status: ReviewStatus) -> Result<usize> {
    use schema::reviews::dsl;
    let count = dsl::reviews
        .filter(dsl::status.eq(review_status_primitive(status)))
        .count()
        .get_result::<i64>(conn)
        .map_err(from_diesel_err)?;
    Ok(count as usize)
}
