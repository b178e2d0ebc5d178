use super::{authorize_user, prelude::*};

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SupervisorStats {
    /// Reviews finalized by the supervisor
    pub decided           : usize,
    pub approved          : usize,
    pub rejected          : usize,
    /// Pending reviews of all users
    pub pending_in_system : usize,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorStats {
    pub total          : usize,
    pub pending        : usize,
    pub approved       : usize,
    pub rejected       : usize,
    pub conflict       : usize,
    pub average_rating : AvgRatingValue,
}

pub fn supervisor_stats<D, I>(db: &D, identities: &I, caller_id: &str) -> Result<SupervisorStats>
where
    D: ReviewRepo,
    I: IdentityProvider + ?Sized,
{
    let supervisor = authorize_user(identities, caller_id, Role::Supervisor)?;
    let decided = db.reviews_decided_by(supervisor.id.as_str())?;
    let count = |status: ReviewStatus| decided.iter().filter(|r| r.status == status).count();
    Ok(SupervisorStats {
        decided: decided.len(),
        approved: count(ReviewStatus::Approved),
        rejected: count(ReviewStatus::Rejected),
        pending_in_system: db.count_reviews_with_status(ReviewStatus::Pending)?,
    })
}

pub fn author_stats<D>(db: &D, author_id: &str) -> Result<AuthorStats>
where
    D: ReviewRepo,
{
    let reviews = db.reviews_of_author(author_id)?;
    let mut avg = AvgRatingValueBuilder::default();
    let mut stats = AuthorStats {
        total: reviews.len(),
        ..Default::default()
    };
    for review in &reviews {
        avg += review.content.rating;
        match review.status {
            ReviewStatus::Pending => stats.pending += 1,
            ReviewStatus::Approved => stats.approved += 1,
            ReviewStatus::Rejected => stats.rejected += 1,
            ReviewStatus::Conflict => stats.conflict += 1,
        }
    }
    stats.average_rating = avg.build();
    Ok(stats)
}
