use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{id::*, review::ReviewStatus, time::*};

/// The position of a single supervisor on a review.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for ReviewStatus {
    fn from(from: Decision) -> Self {
        match from {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}

/// A ledger entry, unique per (review, supervisor).
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub review_id     : Id,
    pub supervisor_id : Id,
    pub decision      : Decision,
    pub comment       : Option<String>,
    pub updated_at    : Timestamp,
}
