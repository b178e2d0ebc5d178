pub mod prelude {
    use parking_lot::Mutex;
    use std::{path::PathBuf, sync::Arc};

    pub use revmod_core::{
        entities::*,
        gateways::{
            identity::IdentityProvider,
            notify::{NotificationEvent, NotificationGateway},
            rating::RatingAggregator,
        },
        repositories::{Error as RepoError, *},
        usecases,
    };

    pub use crate::{
        error::{AppError, BError},
        ConflictRecipients, DbRatingAggregator, ModerationService, NotificationSettings,
    };
    pub use revmod_db_sqlite::Connections;

    /// Records all invocations and optionally stores the rating.
    #[derive(Default)]
    pub struct RecordingRatingAggregator {
        calls: Mutex<Vec<Id>>,
        fail: bool,
        inner: Option<DbRatingAggregator>,
    }

    impl RecordingRatingAggregator {
        pub fn calls(&self) -> Vec<Id> {
            self.calls.lock().clone()
        }
    }

    impl RatingAggregator for RecordingRatingAggregator {
        fn recompute(&self, item_id: &Id) -> anyhow::Result<()> {
            self.calls.lock().push(item_id.clone());
            if self.fail {
                anyhow::bail!("rating aggregation failed");
            }
            if let Some(inner) = &self.inner {
                inner.recompute(item_id)?;
            }
            Ok(())
        }
    }

    pub type RecordedConflict = (Id, Tally, Vec<String>);

    #[derive(Default)]
    pub struct RecordingNotificationGateway {
        conflicts: Mutex<Vec<RecordedConflict>>,
        fail: bool,
    }

    impl RecordingNotificationGateway {
        pub fn conflicts(&self) -> Vec<RecordedConflict> {
            self.conflicts.lock().clone()
        }
    }

    impl NotificationGateway for RecordingNotificationGateway {
        fn notify(&self, event: NotificationEvent) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("notification failed");
            }
            match event {
                NotificationEvent::ReviewConflict {
                    review,
                    tally,
                    email_addresses,
                } => {
                    let recipients = email_addresses
                        .iter()
                        .map(|addr| addr.as_str().to_string())
                        .collect();
                    self.conflicts
                        .lock()
                        .push((review.id.clone(), *tally, recipients));
                }
            }
            Ok(())
        }
    }

    /// Users known independently of the review database.
    #[derive(Default)]
    pub struct StaticIdentityProvider {
        users: Mutex<Vec<User>>,
        lookups_until_revocation: Mutex<Option<usize>>,
    }

    impl StaticIdentityProvider {
        pub fn add(&self, user: User) {
            self.users.lock().push(user);
        }

        /// All roles are gone after `lookups` more identity lookups.
        pub fn revoke_roles_after(&self, lookups: usize) {
            *self.lookups_until_revocation.lock() = Some(lookups);
        }

        fn users_with_role(&self, role: Role) -> Vec<User> {
            self.users
                .lock()
                .iter()
                .filter(|u| u.has_role(role))
                .cloned()
                .collect()
        }
    }

    impl IdentityProvider for StaticIdentityProvider {
        fn identity(&self, user_id: &str) -> Result<Option<User>, RepoError> {
            let revoked = match &mut *self.lookups_until_revocation.lock() {
                Some(0) => true,
                Some(remaining) => {
                    *remaining -= 1;
                    false
                }
                None => false,
            };
            let user = self
                .users
                .lock()
                .iter()
                .find(|u| u.id.as_str() == user_id)
                .cloned();
            Ok(user.map(|mut user| {
                if revoked {
                    user.roles = Roles::none();
                }
                user
            }))
        }

        fn supervisor_roster_size(&self) -> Result<usize, RepoError> {
            Ok(self.users_with_role(Role::Supervisor).len())
        }

        fn active_users_with_role(&self, role: Role) -> Result<Vec<User>, RepoError> {
            Ok(self.users_with_role(role))
        }
    }

    /// A database file that outlives a single service, removed on drop.
    pub struct SharedDatabaseFile {
        path: PathBuf,
    }

    impl SharedDatabaseFile {
        pub fn new() -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let path = std::env::temp_dir().join(format!("revmod-test-{}.sqlite", Id::new()));
            Self { path }
        }

        /// Every service gets its own connection pool like
        /// a separate process would.
        pub fn service(&self) -> ModerationService {
            let connections = Connections::init(
                &self.path.to_string_lossy(),
                2,
                std::time::Duration::from_secs(30),
            )
            .unwrap();
            revmod_db_sqlite::run_embedded_database_migrations(connections.exclusive().unwrap())
                .unwrap();
            ModerationService::new(
                connections,
                Arc::new(RecordingRatingAggregator::default()),
                Arc::new(RecordingNotificationGateway::default()),
                Default::default(),
            )
        }
    }

    impl Drop for SharedDatabaseFile {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm"] {
                let mut path = self.path.clone().into_os_string();
                path.push(suffix);
                let _ = std::fs::remove_file(path);
            }
        }
    }

    pub struct BackendFixture {
        pub service: ModerationService,
        pub rating_aggregator: Arc<RecordingRatingAggregator>,
        pub notifications: Arc<RecordingNotificationGateway>,
    }

    fn init_connections() -> Connections {
        let _ = env_logger::builder().is_test(true).try_init();
        let connections =
            Connections::init(":memory:", 1, std::time::Duration::from_secs(10)).unwrap();
        revmod_db_sqlite::run_embedded_database_migrations(connections.exclusive().unwrap())
            .unwrap();
        connections
    }

    impl BackendFixture {
        fn setup(
            settings: NotificationSettings,
            fail: bool,
            store_ratings: bool,
            identities: Option<Arc<StaticIdentityProvider>>,
        ) -> Self {
            let connections = init_connections();
            let rating_aggregator = Arc::new(RecordingRatingAggregator {
                calls: Default::default(),
                fail,
                inner: store_ratings.then(|| DbRatingAggregator::new(connections.clone())),
            });
            let notifications = Arc::new(RecordingNotificationGateway {
                conflicts: Default::default(),
                fail,
            });
            let mut service = ModerationService::new(
                connections,
                rating_aggregator.clone(),
                notifications.clone(),
                settings,
            );
            if let Some(identities) = identities {
                service = service.with_identity_provider(identities);
            }
            let fixture = Self {
                service,
                rating_aggregator,
                notifications,
            };
            fixture.create_user("author", &[]);
            fixture.create_user("arbiter", &[Role::Arbiter]);
            fixture
        }

        pub fn new() -> Self {
            Self::setup(Default::default(), false, false, None)
        }

        pub fn with_settings(settings: NotificationSettings) -> Self {
            Self::setup(settings, false, false, None)
        }

        /// Both the rating aggregator and the notification gateway fail.
        pub fn with_failing_gateways() -> Self {
            Self::setup(Default::default(), true, false, None)
        }

        pub fn with_db_rating() -> Self {
            Self::setup(Default::default(), false, true, None)
        }

        /// Users are resolved by `identities`, which already knows
        /// the author and the arbiter.
        pub fn with_identities(identities: Arc<StaticIdentityProvider>) -> Self {
            let fixture = Self::setup(Default::default(), false, false, Some(identities.clone()));
            identities.add(fixture.author());
            identities.add(fixture.arbiter());
            fixture
        }

        pub fn create_user(&self, username: &str, roles: &[Role]) -> User {
            self.service
                .create_user(usecases::NewUser {
                    username: username.into(),
                    email: Some(EmailAddress::new_unchecked(format!(
                        "{username}@example.com"
                    ))),
                    roles: roles.iter().copied().collect(),
                })
                .unwrap()
        }

        /// Creates the supervisors `sup0`, `sup1`, ...
        pub fn create_supervisors(&self, count: usize) -> Vec<User> {
            (0..count)
                .map(|i| self.create_user(&format!("sup{i}"), &[Role::Supervisor]))
                .collect()
        }

        fn user(&self, username: &str) -> User {
            self.service
                .connections()
                .shared()
                .unwrap()
                .try_get_user_by_username(username)
                .unwrap()
                .unwrap()
        }

        pub fn author(&self) -> User {
            self.user("author")
        }

        pub fn arbiter(&self) -> User {
            self.user("arbiter")
        }

        pub fn supervisor(&self, index: usize) -> User {
            self.user(&format!("sup{index}"))
        }

        /// A pending review of `author`.
        pub fn create_review(&self, item_id: &str) -> Review {
            let author = self.author();
            self.service
                .create_review(
                    author.id.as_str(),
                    item_id,
                    ReviewContent {
                        title: Some("Title".into()),
                        body: "A review".into(),
                        rating: RatingValue::from(4),
                        tags: vec![],
                    },
                )
                .unwrap()
        }

        pub fn vote(
            &self,
            review_id: &Id,
            supervisor_id: &Id,
            decision: Decision,
        ) -> crate::Result<usecases::CastVote> {
            self.service.submit_vote(usecases::NewVote {
                review_id: review_id.clone(),
                supervisor_id: supervisor_id.clone(),
                decision,
                comment: None,
            })
        }

        pub fn try_get_review(&self, id: &Id) -> Option<Review> {
            match self.service.review(id.as_str()) {
                Ok(review) => Some(review),
                Err(AppError::Business(BError::Repo(RepoError::NotFound))) => None,
                Err(err) => panic!("{err}"),
            }
        }

        pub fn get_review(&self, id: &Id) -> Review {
            self.try_get_review(id).unwrap()
        }

        pub fn votes_of(&self, review_id: &Id) -> Vec<Vote> {
            self.service
                .connections()
                .shared()
                .unwrap()
                .load_votes_of_review(review_id.as_str())
                .unwrap()
        }
    }
}
