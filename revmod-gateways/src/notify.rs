use std::sync::Arc;

use revmod_core::{
    entities::*,
    gateways::notify::{NotificationEvent, NotificationGateway},
};

use crate::{email::EmailGateway, user_communication};

/// Sends notifications as e-mails.
#[derive(Clone)]
pub struct Notify {
    email_gw: Arc<dyn EmailGateway + Send + Sync + 'static>,
}

impl Notify {
    pub fn new<G>(gw: G) -> Self
    where
        G: EmailGateway + Send + Sync + 'static,
    {
        Self {
            email_gw: Arc::new(gw),
        }
    }
}

impl NotificationGateway for Notify {
    fn notify(&self, event: NotificationEvent) -> anyhow::Result<()> {
        use NotificationEvent as E;
        match event {
            E::ReviewConflict {
                review,
                tally,
                email_addresses,
            } => {
                let content = user_communication::review_conflict_email(review, tally);
                log::info!(
                    "Sending e-mails to {} recipients about the conflict of review {}",
                    email_addresses.len(),
                    review.id,
                );
                compose_and_send_emails(&*self.email_gw, email_addresses, &content)
            }
        }
    }
}

fn compose_and_send_emails(
    gw: &dyn EmailGateway,
    recipients: &[EmailAddress],
    email_content: &EmailContent,
) -> anyhow::Result<()> {
    gw.compose_and_send(recipients, email_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use revmod_entities::builders::*;
    use std::sync::Mutex;

    type SentEmail = (Vec<EmailAddress>, EmailContent);

    #[derive(Default, Clone)]
    struct Outbox(Arc<Mutex<Vec<SentEmail>>>);

    impl EmailGateway for Outbox {
        fn compose_and_send(
            &self,
            recipients: &[EmailAddress],
            email: &EmailContent,
        ) -> anyhow::Result<()> {
            self.0
                .lock()
                .unwrap()
                .push((recipients.to_vec(), email.clone()));
            Ok(())
        }
    }

    #[test]
    fn send_conflict_email_to_all_recipients() {
        let outbox = Outbox::default();
        let notify = Notify::new(outbox.clone());
        let review = Review::build().id("r1").status(ReviewStatus::Conflict).finish();
        let tally = Tally::default();
        let recipients = vec![
            EmailAddress::new_unchecked("a@example.com".into()),
            EmailAddress::new_unchecked("b@example.com".into()),
        ];
        notify
            .notify(NotificationEvent::ReviewConflict {
                review: &review,
                tally: &tally,
                email_addresses: &recipients,
            })
            .unwrap();
        let sent = outbox.0.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, recipients);
        assert!(sent[0].1.subject.contains("r1"));
    }
}
