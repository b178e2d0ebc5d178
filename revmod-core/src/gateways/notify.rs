use revmod_entities::{email::*, review::*, tally::*};

#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent<'a> {
    /// All supervisors have voted without reaching a majority.
    ReviewConflict {
        review: &'a Review,
        tally: &'a Tally,
        email_addresses: &'a [EmailAddress],
    },
}

/// Delivery is best effort. Callers log failures and carry on.
pub trait NotificationGateway {
    fn notify(&self, event: NotificationEvent) -> anyhow::Result<()>;
}
