// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use anyhow::anyhow;
use diesel::{
    self,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};

use revmod_core::{
    entities::*,
    repositories::{self as repo, *},
};

use super::*;

mod item_rating;
mod review;
mod user;
mod vote;

type Result<T> = std::result::Result<T, repo::Error>;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

fn read_only_err() -> repo::Error {
    repo::Error::Other(anyhow!("Write access on a read-only database connection"))
}

type ReviewStatusPrimitive = i16;

const STATUS_PENDING: ReviewStatusPrimitive = 0;
const STATUS_APPROVED: ReviewStatusPrimitive = 1;
const STATUS_REJECTED: ReviewStatusPrimitive = -1;
const STATUS_CONFLICT: ReviewStatusPrimitive = 2;

fn review_status_primitive(status: ReviewStatus) -> ReviewStatusPrimitive {
    match status {
        ReviewStatus::Pending => STATUS_PENDING,
        ReviewStatus::Approved => STATUS_APPROVED,
        ReviewStatus::Rejected => STATUS_REJECTED,
        ReviewStatus::Conflict => STATUS_CONFLICT,
    }
}

fn load_review_status(status: ReviewStatusPrimitive) -> Result<ReviewStatus> {
    match status {
        STATUS_PENDING => Ok(ReviewStatus::Pending),
        STATUS_APPROVED => Ok(ReviewStatus::Approved),
        STATUS_REJECTED => Ok(ReviewStatus::Rejected),
        STATUS_CONFLICT => Ok(ReviewStatus::Conflict),
        _ => Err(anyhow!("Invalid review status: {status}").into()),
    }
}

type DecisionPrimitive = i16;

fn decision_primitive(decision: Decision) -> DecisionPrimitive {
    match decision {
        Decision::Approved => STATUS_APPROVED,
        Decision::Rejected => STATUS_REJECTED,
    }
}

fn load_decision(decision: DecisionPrimitive) -> Result<Decision> {
    match decision {
        STATUS_APPROVED => Ok(Decision::Approved),
        STATUS_REJECTED => Ok(Decision::Rejected),
        _ => Err(anyhow!("Invalid decision: {decision}").into()),
    }
}
