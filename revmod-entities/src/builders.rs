pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{review_builder::*, user_builder::*, vote_builder::*};

pub mod review_builder {

    use super::*;
    use crate::{id::*, rating::*, review::*, time::*};

    #[derive(Debug)]
    pub struct ReviewBuild {
        review: Review,
    }

    impl ReviewBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.review.id = id.into();
            self
        }
        pub fn item(mut self, item_id: &str) -> Self {
            self.review.item_id = item_id.into();
            self
        }
        pub fn author(mut self, author_id: &str) -> Self {
            self.review.author_id = author_id.into();
            self
        }
        pub fn body(mut self, body: &str) -> Self {
            self.review.content.body = body.into();
            self
        }
        pub fn rating(mut self, rating: u8) -> Self {
            self.review.content.rating = rating.into();
            self
        }
        pub fn status(mut self, status: ReviewStatus) -> Self {
            self.review.status = status;
            self
        }
        pub fn decided_by(mut self, user_id: &str) -> Self {
            self.review.decided_by = Some(user_id.into());
            self.review.decided_at = Some(Timestamp::now());
            self
        }
        pub fn finish(self) -> Review {
            self.review
        }
    }

    impl Builder for Review {
        type Build = ReviewBuild;
        fn build() -> Self::Build {
            let now = Timestamp::now();
            ReviewBuild {
                review: Review {
                    id: Id::new(),
                    item_id: Id::new(),
                    author_id: Id::new(),
                    content: ReviewContent {
                        title: None,
                        body: "A review".into(),
                        rating: RatingValue::max(),
                        tags: vec![],
                    },
                    status: ReviewStatus::default(),
                    decided_by: None,
                    decided_at: None,
                    rejection_reason: None,
                    metadata: Default::default(),
                    created_at: now,
                    updated_at: now,
                },
            }
        }
    }
}

pub mod user_builder {

    use super::*;
    use crate::{id::*, user::*};

    #[derive(Debug)]
    pub struct UserBuild {
        user: User,
    }

    impl UserBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.user.id = id.into();
            self
        }
        pub fn username(mut self, username: &str) -> Self {
            self.user.username = username.into();
            self
        }
        pub fn email(mut self, email: &str) -> Self {
            self.user.email = email.parse().ok();
            self
        }
        pub fn inactive(mut self) -> Self {
            self.user.active = false;
            self
        }
        pub fn role(mut self, role: Role) -> Self {
            self.user.roles.grant(role);
            self
        }
        pub fn finish(self) -> User {
            self.user
        }
    }

    impl Builder for User {
        type Build = UserBuild;
        fn build() -> Self::Build {
            UserBuild {
                user: User {
                    id: Id::new(),
                    username: "user".into(),
                    email: None,
                    active: true,
                    roles: Roles::none(),
                },
            }
        }
    }
}

pub mod vote_builder {

    use super::*;
    use crate::{id::*, time::*, vote::*};

    #[derive(Debug)]
    pub struct VoteBuild {
        vote: Vote,
    }

    impl VoteBuild {
        pub fn review(mut self, review_id: &str) -> Self {
            self.vote.review_id = review_id.into();
            self
        }
        pub fn supervisor(mut self, supervisor_id: &str) -> Self {
            self.vote.supervisor_id = supervisor_id.into();
            self
        }
        pub fn decision(mut self, decision: Decision) -> Self {
            self.vote.decision = decision;
            self
        }
        pub fn comment(mut self, comment: &str) -> Self {
            self.vote.comment = Some(comment.into());
            self
        }
        pub fn at(mut self, millis: i64) -> Self {
            self.vote.updated_at = Timestamp::from_millis(millis);
            self
        }
        pub fn finish(self) -> Vote {
            self.vote
        }
    }

    impl Builder for Vote {
        type Build = VoteBuild;
        fn build() -> Self::Build {
            VoteBuild {
                vote: Vote {
                    review_id: Id::new(),
                    supervisor_id: Id::new(),
                    decision: Decision::Approved,
                    comment: None,
                    updated_at: Timestamp::now(),
                },
            }
        }
    }
}
