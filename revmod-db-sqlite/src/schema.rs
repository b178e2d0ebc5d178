///////////////////////////////////////////////////////////////////////
// Users
///////////////////////////////////////////////////////////////////////

table! {
    users (id) {
        id -> Text,
        username -> Text,
        email -> Nullable<Text>,
        active -> Bool,
        is_supervisor -> Bool,
        is_arbiter -> Bool,
    }
}

///////////////////////////////////////////////////////////////////////
// Reviews
///////////////////////////////////////////////////////////////////////

table! {
    reviews (id) {
        id -> Text,
        item_id -> Text,
        author_id -> Text,
        title -> Nullable<Text>,
        body -> Text,
        rating -> SmallInt,
        tags -> Text,
        status -> SmallInt,
        decided_by -> Nullable<Text>,
        decided_at -> Nullable<BigInt>,
        rejection_reason -> Nullable<Text>,
        metadata -> Text,
        created_at -> BigInt,
        updated_at -> BigInt,
    }
}

table! {
    votes (review_id, supervisor_id) {
        review_id -> Text,
        supervisor_id -> Text,
        decision -> SmallInt,
        comment -> Nullable<Text>,
        updated_at -> BigInt,
    }
}

joinable!(votes -> reviews (review_id));
joinable!(votes -> users (supervisor_id));

///////////////////////////////////////////////////////////////////////
// Ratings
///////////////////////////////////////////////////////////////////////

table! {
    item_ratings (item_id) {
        item_id -> Text,
        average -> Double,
        total_ratings -> BigInt,
    }
}

allow_tables_to_appear_in_same_query!(users, reviews, votes, item_ratings);
