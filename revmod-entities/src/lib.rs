#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # revmod-entities
//!
//! Reusable, agnostic domain entities for moderating reviews.
//!
//! The entities only contain generic functionality that does not reveal
//! any moderation rules. Those live in `revmod-core`.

pub mod email;
pub mod id;
pub mod rating;
pub mod review;
pub mod tally;
pub mod time;
pub mod user;
pub mod vote;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
