use crate::{locks::ReviewLocks, sqlite, usecases, EmailAddress, Id, Result, Review, Role, Tally};
use revmod_core::gateways::{
    identity::IdentityProvider,
    notify::{NotificationEvent, NotificationGateway},
    rating::RatingAggregator,
};
use std::sync::Arc;

/// Who is informed about reviews in conflict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictRecipients {
    #[default]
    Arbiters,
    ArbitersAndSupervisors,
}

impl ConflictRecipients {
    pub const fn roles(self) -> &'static [Role] {
        match self {
            Self::Arbiters => &[Role::Arbiter],
            Self::ArbitersAndSupervisors => &[Role::Arbiter, Role::Supervisor],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub conflict_recipients: ConflictRecipients,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            conflict_recipients: ConflictRecipients::default(),
        }
    }
}

/// Orchestrates all operations that modify reviews.
///
/// Every read-modify-write sequence on a review runs while holding
/// the lock of that review and inside a single database transaction.
/// The review lock is always acquired before the database connection.
/// Rating recalculation and notifications happen after the commit,
/// their failures are logged and never reported to the caller.
///
/// Users are resolved from the review database unless another
/// identity provider has been injected.
pub struct ModerationService {
    pub(crate) connections: sqlite::Connections,
    pub(crate) review_locks: ReviewLocks,
    rating_aggregator: Arc<dyn RatingAggregator + Send + Sync>,
    notify: Arc<dyn NotificationGateway + Send + Sync>,
    settings: NotificationSettings,
    identity_provider: Option<Arc<dyn IdentityProvider + Send + Sync>>,
}

impl std::fmt::Debug for ModerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModerationService")
            .field("connections", &self.connections)
            .field("review_locks", &self.review_locks)
            .field("settings", &self.settings)
            .field("external_identities", &self.identity_provider.is_some())
            .finish_non_exhaustive()
    }
}

impl ModerationService {
    pub fn new(
        connections: sqlite::Connections,
        rating_aggregator: Arc<dyn RatingAggregator + Send + Sync>,
        notify: Arc<dyn NotificationGateway + Send + Sync>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            connections,
            review_locks: ReviewLocks::new(),
            rating_aggregator,
            notify,
            settings,
            identity_provider: None,
        }
    }

    pub fn with_identity_provider(
        mut self,
        identity_provider: Arc<dyn IdentityProvider + Send + Sync>,
    ) -> Self {
        self.identity_provider = Some(identity_provider);
        self
    }

    pub fn connections(&self) -> &sqlite::Connections {
        &self.connections
    }

    /// The injected provider or the user accounts behind `db`.
    ///
    /// Inside a transaction `db` must be the connection of that
    /// transaction, a second connection would wait for the writer.
    pub(crate) fn identities<'a>(
        &'a self,
        db: &'a dyn IdentityProvider,
    ) -> &'a dyn IdentityProvider {
        match &self.identity_provider {
            Some(provider) => provider.as_ref(),
            None => db,
        }
    }

    /// Early check with a short-lived connection.
    ///
    /// Must be repeated after acquiring the review lock.
    pub(crate) fn pre_authorize(&self, user_id: &str, role: Role) -> Result<()> {
        let db = self.connections.shared()?;
        usecases::authorize_user(self.identities(&db), user_id, role)?;
        Ok(())
    }

    pub(crate) fn recalculate_item_rating(&self, item_id: &Id) {
        if let Err(err) = self.rating_aggregator.recompute(item_id) {
            error!("Failed to recalculate the rating of item {item_id}: {err}");
        }
    }

    fn load_conflict_recipients(&self) -> Result<Vec<EmailAddress>> {
        let db = self.connections.shared()?;
        let roles = self.settings.conflict_recipients.roles();
        Ok(usecases::email_addresses_of_roles(self.identities(&db), roles)?)
    }

    pub(crate) fn notify_conflict(&self, review: &Review, tally: &Tally) {
        if !self.settings.enabled {
            debug!(
                "Notifications are disabled, not reporting the conflict of review {}",
                review.id
            );
            return;
        }
        let email_addresses = match self.load_conflict_recipients() {
            Ok(email_addresses) => email_addresses,
            Err(err) => {
                warn!(
                    "Failed to load the recipients of the conflict notification for review {}: {err}",
                    review.id
                );
                return;
            }
        };
        if email_addresses.is_empty() {
            warn!(
                "Nobody can be notified about the conflict of review {}",
                review.id
            );
            return;
        }
        let event = NotificationEvent::ReviewConflict {
            review,
            tally,
            email_addresses: &email_addresses,
        };
        if let Err(err) = self.notify.notify(event) {
            warn!(
                "Failed to send the conflict notification for review {}: {err}",
                review.id
            );
        }
    }
}
