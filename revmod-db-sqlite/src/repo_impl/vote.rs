use super::*;

impl<'a> VoteRepo for DbReadOnly<'a> {
    fn record_vote(&self, _vote: &Vote) -> Result<(Vote, bool)> {
        Err(read_only_err())
    }
    fn load_votes_of_review(&self, review_id: &str) -> Result<Vec<Vote>> {
        load_votes_of_review(&mut self.conn.borrow_mut(), review_id)
    }
    fn try_load_vote(&self, review_id: &str, supervisor_id: &str) -> Result<Option<Vote>> {
        try_load_vote(&mut self.conn.borrow_mut(), review_id, supervisor_id)
    }
    fn delete_votes_of_review(&self, _review_id: &str) -> Result<usize> {
        Err(read_only_err())
    }
}

impl<'a> VoteRepo for DbReadWrite<'a> {
    fn record_vote(&self, vote: &Vote) -> Result<(Vote, bool)> {
        record_vote(&mut self.conn.borrow_mut(), vote)
    }
    fn load_votes_of_review(&self, review_id: &str) -> Result<Vec<Vote>> {
        load_votes_of_review(&mut self.conn.borrow_mut(), review_id)
    }
    fn try_load_vote(&self, review_id: &str, supervisor_id: &str) -> Result<Option<Vote>> {
        try_load_vote(&mut self.conn.borrow_mut(), review_id, supervisor_id)
    }
    fn delete_votes_of_review(&self, review_id: &str) -> Result<usize> {
        delete_votes_of_review(&mut self.conn.borrow_mut(), review_id)
    }
}

impl<'a> VoteRepo for DbConnection<'a> {
    fn record_vote(&self, vote: &Vote) -> Result<(Vote, bool)> {
        record_vote(&mut self.conn.borrow_mut(), vote)
    }
    fn load_votes_of_review(&self, review_id: &str) -> Result<Vec<Vote>> {
        load_votes_of_review(&mut self.conn.borrow_mut(), review_id)
    }
    fn try_load_vote(&self, review_id: &str, supervisor_id: &str) -> Result<Option<Vote>> {
        try_load_vote(&mut self.conn.borrow_mut(), review_id, supervisor_id)
    }
    fn delete_votes_of_review(&self, review_id: &str) -> Result<usize> {
        delete_votes_of_review(&mut self.conn.borrow_mut(), review_id)
    }
}

fn load_vote(entity: models::VoteEntity) -> Result<Vote> {
    let models::VoteEntity {
        review_id,
        supervisor_id,
        decision,
        comment,
        updated_at,
    } = entity;
    Ok(Vote {
        review_id: review_id.into(),
        supervisor_id: supervisor_id.into(),
        decision: load_decision(decision)?,
        comment,
        updated_at: Timestamp::from_millis(updated_at),
    })
}

fn record_vote(conn: &mut SqliteConnection, vote: &Vote) -> Result<(Vote, bool)> {
    use schema::votes::dsl;
    {
        use schema::reviews::dsl as r_dsl;
        let review_exists = r_dsl::reviews
            .filter(r_dsl::id.eq(vote.review_id.as_str()))
            .count()
            .get_result::<i64>(conn)
            .map_err(from_diesel_err)?
            > 0;
        if !review_exists {
            return Err(repo::Error::NotFound);
        }
    }
    let decision = decision_primitive(vote.decision);
    let updated = diesel::update(
        dsl::votes
            .filter(dsl::review_id.eq(vote.review_id.as_str()))
            .filter(dsl::supervisor_id.eq(vote.supervisor_id.as_str())),
    )
    .set((
        dsl::decision.eq(decision),
        dsl::comment.eq(vote.comment.as_deref()),
        dsl::updated_at.eq(vote.updated_at.as_millis()),
    ))
    .execute(conn)
    .map_err(from_diesel_err)?;
    let created = if updated == 0 {
        let new_vote = models::NewVote {
            review_id: vote.review_id.as_str(),
            supervisor_id: vote.supervisor_id.as_str(),
            decision,
            comment: vote.comment.as_deref(),
            updated_at: vote.updated_at.as_millis(),
        };
        diesel::insert_into(schema::votes::table)
            .values(&new_vote)
            .execute(conn)
            .map_err(from_diesel_err)?;
        true
    } else {
        debug_assert_eq!(1, updated);
        false
    };
    Ok((vote.clone(), created))
}

fn load_votes_of_review(conn: &mut SqliteConnection, review_id: &str) -> Result<Vec<Vote>> {
    use schema::votes::dsl;
    dsl::votes
        .filter(dsl::review_id.eq(review_id))
        .order_by(dsl::updated_at.desc())
        .load::<models::VoteEntity>(conn)
        .map_err(from_diesel_err)?
        .into_iter()
        .map(load_vote)
        .collect()
}

fn try_load_vote(
    conn: &mut SqliteConnection,
    review_id: &str,
    supervisor_id: &str,
) -> Result<Option<Vote>> {
    use schema::votes::dsl;
    dsl::votes
        .filter(dsl::review_id.eq(review_id))
        .filter(dsl::supervisor_id.eq(supervisor_id))
        .first::<models::VoteEntity>(conn)
        .optional()
        .map_err(from_diesel_err)?
        .map(load_vote)
        .transpose()
}

fn delete_votes_of_review(conn: &mut SqliteConnection, review_id: &str) -> Result<usize> {
    use schema::votes::dsl;
    diesel::delete(dsl::votes.filter(dsl::review_id.eq(review_id)))
        .execute(conn)
        .map_err(from_diesel_err)
}
