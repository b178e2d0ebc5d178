use jfs::Store;
use revmod_core::entities::{EmailAddress, EmailContent, Timestamp};
use serde::{Deserialize, Serialize};
use std::{io, path::Path};

use super::EmailGateway;

/// Stores e-mails as JSON files instead of sending them.
///
/// Useful for local testing.
pub struct SendToJsonFile {
    json_store: Store,
}

impl SendToJsonFile {
    pub fn try_new<P: AsRef<Path>>(directory: P) -> io::Result<Self> {
        let json_store = Store::new(directory)?;
        Ok(Self { json_store })
    }

    pub fn path(&self) -> &Path {
        self.json_store.path()
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JsonEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl JsonEmail {
    fn new(to: &EmailAddress, content: &EmailContent) -> Self {
        Self {
            to: to.as_str().to_owned(),
            subject: content.subject.to_owned(),
            body: content.body.to_owned(),
        }
    }
}

impl EmailGateway for SendToJsonFile {
    fn compose_and_send(
        &self,
        recipients: &[EmailAddress],
        content: &EmailContent,
    ) -> anyhow::Result<()> {
        let now = Timestamp::now().as_millis();
        for to in recipients {
            let key = format!("{now}-{to}");
            let email = JsonEmail::new(to, content);
            self.json_store.save_with_id(&email, &key)?;
            log::debug!("Stored e-mail to {to} in {}", self.path().display());
        }
        Ok(())
    }
}
