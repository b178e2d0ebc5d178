#![allow(clippy::extra_unused_lifetimes)]

// NOTE:
// All timestamps with the `_at` postfix are stored
// as unix timestamp in **milli**seconds.

use super::schema::*;

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = true)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub active: bool,
    pub is_supervisor: bool,
    pub is_arbiter: bool,
}

#[derive(Queryable)]
pub struct UserEntity {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub active: bool,
    pub is_supervisor: bool,
    pub is_arbiter: bool,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = reviews, treat_none_as_null = true)]
pub struct NewReview<'a> {
    pub id: &'a str,
    pub item_id: &'a str,
    pub author_id: &'a str,
    pub title: Option<&'a str>,
    pub body: &'a str,
    pub rating: i16,
    pub tags: String,
    pub status: i16,
    pub decided_by: Option<&'a str>,
    pub decided_at: Option<i64>,
    pub rejection_reason: Option<&'a str>,
    pub metadata: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Queryable)]
pub struct ReviewEntity {
    pub id: String,
    pub item_id: String,
    pub author_id: String,
    pub title: Option<String>,
    pub body: String,
    pub rating: i16,
    pub tags: String,
    pub status: i16,
    pub decided_by: Option<String>,
    pub decided_at: Option<i64>,
    pub rejection_reason: Option<String>,
    pub metadata: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = votes)]
pub struct NewVote<'a> {
    pub review_id: &'a str,
    pub supervisor_id: &'a str,
    pub decision: i16,
    pub comment: Option<&'a str>,
    pub updated_at: i64,
}

#[derive(Queryable)]
pub struct VoteEntity {
    pub review_id: String,
    pub supervisor_id: String,
    pub decision: i16,
    pub comment: Option<String>,
    pub updated_at: i64,
}

#[derive(Insertable)]
#[diesel(table_name = item_ratings)]
pub struct NewItemRating<'a> {
    pub item_id: &'a str,
    pub average: f64,
    pub total_ratings: i64,
}

#[derive(Queryable)]
pub struct ItemRatingEntity {
    pub item_id: String,
    pub average: f64,
    pub total_ratings: i64,
}
