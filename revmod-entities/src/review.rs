use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

use crate::{id::*, rating::RatingValue, time::*};

/// Lifecycle of a review from submission to its final disposition.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    Conflict,
}

impl ReviewStatus {
    pub const fn default() -> Self {
        Self::Pending
    }

    /// Approved and rejected reviews are final until they are reopened.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Free-form provenance markers, e.g. of overrides.
pub type Metadata = BTreeMap<String, String>;

/// The part of a review that is written by its author.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewContent {
    pub title  : Option<String>,
    pub body   : String,
    pub rating : RatingValue,
    pub tags   : Vec<String>,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id               : Id,
    pub item_id          : Id,
    pub author_id        : Id,
    pub content          : ReviewContent,
    pub status           : ReviewStatus,
    pub decided_by       : Option<Id>,
    pub decided_at       : Option<Timestamp>,
    pub rejection_reason : Option<String>,
    pub metadata         : Metadata,
    pub created_at       : Timestamp,
    pub updated_at       : Timestamp,
}
