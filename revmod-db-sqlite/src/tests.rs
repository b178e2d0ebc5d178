use super::*;
use revmod_core::{entities::*, repositories::*, RepoError};
use revmod_entities::builders::*;

fn init_connections() -> Connections {
    let connections = Connections::init(":memory:", 1, Duration::from_secs(5)).unwrap();
    run_embedded_database_migrations(connections.exclusive().unwrap()).unwrap();
    connections
}

fn create_supervisors(db: &DbReadWrite, n: usize) {
    for i in 1..=n {
        let id = format!("sup{i}");
        db.create_user(
            &User::build()
                .id(&id)
                .username(&id)
                .role(Role::Supervisor)
                .finish(),
        )
        .unwrap();
    }
}

#[test]
fn create_and_load_review() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    let mut review = Review::build().id("r").item("i").author("a").rating(3).finish();
    review.content.title = Some("Title".into());
    review.content.tags = vec!["x".into(), "y".into()];
    review
        .metadata
        .insert("override".into(), "true".into());
    db.create_review(&review).unwrap();
    assert_eq!(db.get_review("r").unwrap(), review);
    assert_eq!(
        db.try_get_review_by_author_and_item("a", "i")
            .unwrap()
            .unwrap(),
        review
    );
    assert!(db
        .try_get_review_by_author_and_item("a", "x")
        .unwrap()
        .is_none());
    assert!(matches!(db.get_review("x"), Err(RepoError::NotFound)));
}

#[test]
fn one_review_per_author_and_item() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    db.create_review(&Review::build().id("r1").item("i").author("a").finish())
        .unwrap();
    assert!(matches!(
        db.create_review(&Review::build().id("r2").item("i").author("a").finish()),
        Err(RepoError::AlreadyExists)
    ));
}

#[test]
fn update_clears_optional_fields() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    let mut review = Review::build()
        .id("r")
        .status(ReviewStatus::Rejected)
        .decided_by("sup1")
        .finish();
    review.rejection_reason = Some("spam".into());
    db.create_review(&review).unwrap();
    review.status = ReviewStatus::Pending;
    review.decided_by = None;
    review.decided_at = None;
    review.rejection_reason = None;
    db.update_review(&review).unwrap();
    assert_eq!(db.get_review("r").unwrap(), review);
    assert_eq!(db.count_reviews_with_status(ReviewStatus::Pending).unwrap(), 1);
    assert_eq!(db.count_reviews_with_status(ReviewStatus::Rejected).unwrap(), 0);
}

#[test]
fn upsert_votes() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    create_supervisors(&db, 2);
    db.create_review(&Review::build().id("r").finish()).unwrap();

    let vote = Vote::build()
        .review("r")
        .supervisor("sup1")
        .decision(Decision::Approved)
        .at(1000)
        .finish();
    let (_, created) = db.record_vote(&vote).unwrap();
    assert!(created);

    let vote = Vote::build()
        .review("r")
        .supervisor("sup1")
        .decision(Decision::Rejected)
        .comment("changed my mind")
        .at(2000)
        .finish();
    let (_, created) = db.record_vote(&vote).unwrap();
    assert!(!created);

    let votes = db.load_votes_of_review("r").unwrap();
    assert_eq!(votes, vec![vote.clone()]);
    assert_eq!(db.try_load_vote("r", "sup1").unwrap(), Some(vote));
    assert_eq!(db.try_load_vote("r", "sup2").unwrap(), None);
}

#[test]
fn votes_are_ordered_by_most_recent_first() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    create_supervisors(&db, 3);
    db.create_review(&Review::build().id("r").finish()).unwrap();
    for (sup, at) in [("sup1", 3000), ("sup2", 1000), ("sup3", 2000)] {
        db.record_vote(&Vote::build().review("r").supervisor(sup).at(at).finish())
            .unwrap();
    }
    let order: Vec<_> = db
        .load_votes_of_review("r")
        .unwrap()
        .into_iter()
        .map(|v| v.supervisor_id.to_string())
        .collect();
    assert_eq!(order, vec!["sup1", "sup3", "sup2"]);
}

#[test]
fn vote_on_missing_review() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    create_supervisors(&db, 1);
    let vote = Vote::build().review("x").supervisor("sup1").finish();
    assert!(matches!(db.record_vote(&vote), Err(RepoError::NotFound)));
}

#[test]
fn deleting_a_review_deletes_its_votes() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    create_supervisors(&db, 2);
    db.create_review(&Review::build().id("r").finish()).unwrap();
    db.record_vote(&Vote::build().review("r").supervisor("sup1").finish())
        .unwrap();
    db.record_vote(&Vote::build().review("r").supervisor("sup2").finish())
        .unwrap();
    db.delete_review("r").unwrap();
    assert!(db.load_votes_of_review("r").unwrap().is_empty());
    assert!(matches!(db.delete_review("r"), Err(RepoError::NotFound)));
}

#[test]
fn clear_votes() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    create_supervisors(&db, 2);
    db.create_review(&Review::build().id("r").finish()).unwrap();
    db.record_vote(&Vote::build().review("r").supervisor("sup1").finish())
        .unwrap();
    db.record_vote(&Vote::build().review("r").supervisor("sup2").finish())
        .unwrap();
    assert_eq!(db.delete_votes_of_review("r").unwrap(), 2);
    assert_eq!(db.delete_votes_of_review("r").unwrap(), 0);
}

#[test]
fn roster_contains_active_supervisors_only() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    create_supervisors(&db, 3);
    let mut sup3 = db.try_get_user("sup3").unwrap().unwrap();
    sup3.active = false;
    db.update_user(&sup3).unwrap();
    db.create_user(
        &User::build()
            .id("arb")
            .username("arb")
            .email("arb@example.com")
            .role(Role::Arbiter)
            .finish(),
    )
    .unwrap();
    assert_eq!(db.count_users_with_role(Role::Supervisor).unwrap(), 2);
    let arbiters = db.users_with_role(Role::Arbiter).unwrap();
    assert_eq!(arbiters.len(), 1);
    assert_eq!(
        arbiters[0].email.as_ref().map(EmailAddress::as_str),
        Some("arb@example.com")
    );
    assert_eq!(db.all_users().unwrap().len(), 4);
    assert!(db.try_get_user_by_username("sup2").unwrap().is_some());
}

#[test]
fn store_item_rating() {
    let connections = init_connections();
    let db = connections.exclusive().unwrap();
    assert!(db.try_load_item_rating("i").unwrap().is_none());
    let rating = ItemRating {
        item_id: "i".into(),
        average: 4.5.into(),
        total_ratings: 2,
    };
    db.store_item_rating(&rating).unwrap();
    let rating = ItemRating {
        total_ratings: 3,
        average: 4.33.into(),
        ..rating
    };
    db.store_item_rating(&rating).unwrap();
    assert_eq!(db.try_load_item_rating("i").unwrap(), Some(rating));
}

#[test]
fn rollback_failed_transactions() {
    let connections = init_connections();
    let result = connections.exclusive().unwrap().transaction(|db| {
        db.create_review(&Review::build().id("r").finish())?;
        Err::<(), _>(uc::Error::Forbidden)
    });
    assert!(matches!(result, Err(uc::Error::Forbidden)));
    let db = connections.shared().unwrap();
    assert!(matches!(db.get_review("r"), Err(RepoError::NotFound)));
}

#[test]
fn read_only_connections_reject_writes() {
    let connections = init_connections();
    let db = connections.shared().unwrap();
    assert!(db.create_review(&Review::build().finish()).is_err());
    assert!(db.reviews_with_status(None).unwrap().is_empty());
}
