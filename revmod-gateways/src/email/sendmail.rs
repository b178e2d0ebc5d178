use fast_chemail::is_valid_email;
use parking_lot::Mutex;
use revmod_core::entities::{EmailAddress, EmailContent};
#[cfg(not(test))]
use std::{
    io::{self, prelude::*},
    process::{Command, Stdio},
};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use super::EmailGateway;

/// Delivers e-mails through the local `sendmail` binary.
///
/// Dropping the gateway waits for pending deliveries.
#[derive(Debug, Clone)]
pub struct Sendmail {
    from: EmailAddress,
    deliveries: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Sendmail {
    pub fn new(from: EmailAddress) -> Self {
        Self {
            from,
            deliveries: Default::default(),
        }
    }

    /// Hands the mails over to `sendmail` one after another
    /// without blocking the caller.
    fn deliver_in_background(&self, mails: Vec<String>) {
        let delivery = thread::spawn(move || {
            let total = mails.len();
            let failed = mails
                .iter()
                .filter_map(|mail| send_raw(mail).err())
                .inspect(|err| warn!("Could not send e-mail: {err}"))
                .count();
            if failed > 0 {
                warn!("{failed} of {total} e-mails have not been delivered");
            }
        });
        let mut deliveries = self.deliveries.lock();
        deliveries.retain(|delivery| !delivery.is_finished());
        deliveries.push(delivery);
    }

    /// Blocks until all e-mails handed over so far are delivered.
    pub fn wait_for_deliveries(&self) {
        let pending: Vec<_> = self.deliveries.lock().drain(..).collect();
        if !pending.is_empty() {
            debug!("Waiting for {} pending e-mail deliveries", pending.len());
        }
        for delivery in pending {
            if delivery.join().is_err() {
                warn!("E-mail delivery aborted with a panic");
            }
        }
    }

    pub fn pending_deliveries(&self) -> usize {
        self.deliveries
            .lock()
            .iter()
            .filter(|delivery| !delivery.is_finished())
            .count()
    }
}

impl Drop for Sendmail {
    fn drop(&mut self) {
        self.wait_for_deliveries();
    }
}

#[cfg(not(test))]
fn send_raw(mail: &str) -> io::Result<()> {
    let mut child = Command::new("sendmail")
        .arg("-t")
        .stdin(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .as_mut()
        .ok_or_else(|| io::Error::other("Could not get stdin"))?
        .write_all(mail.as_bytes())?;
    child.wait_with_output()?;
    Ok(())
}

/// Don't actually send e-mails while running the tests.
#[cfg(test)]
fn send_raw(email: &str) -> std::io::Result<()> {
    debug!("Would send e-mail: {}", email);
    Ok(())
}

impl EmailGateway for Sendmail {
    fn compose_and_send(
        &self,
        recipients: &[EmailAddress],
        email: &EmailContent,
    ) -> anyhow::Result<()> {
        debug!("Sending e-mails to: {:?}", recipients);
        let from = self.from.to_string();
        let mails: Vec<_> = recipients
            .iter()
            .filter_map(|to| {
                compose(&from, &[to.as_str()], &email.subject, &email.body)
                    .inspect_err(|err| warn!("Failed to compose e-mail to {to}: {err}"))
                    .ok()
            })
            .collect();
        if mails.is_empty() && !recipients.is_empty() {
            anyhow::bail!("None of the {} e-mails could be composed", recipients.len());
        }
        self.deliver_in_background(mails);
        Ok(())
    }
}

// Encoded words longer than 76 chars get soft line breaks from
// quoted_printable. Header lines are limited to 78 chars
// including CRLF.
const MAX_HEADER_FIELD_LEN: usize = 76;

const LINE_BREAK: &str = "\r\n";

/// Encodes the longest prefix of `input` that fits into `encoded_max_len`.
///
/// Returns the encoded prefix and the number of consumed input bytes.
fn encode_header_field_partially(input: &str, encoded_max_len: usize) -> (String, usize) {
    debug_assert!(encoded_max_len >= "=?UTF-8?Q??=".len());
    debug_assert!(encoded_max_len <= MAX_HEADER_FIELD_LEN);
    let encode = |len: usize| {
        format!(
            "=?UTF-8?Q?{}?=",
            quoted_printable::encode_to_str(input[..len].as_bytes())
        )
    };
    // Binary search over the char boundaries of the input
    let boundaries: Vec<_> = input
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(input.len()))
        .collect();
    let fitting = boundaries.partition_point(|len| encode(*len).len() <= encoded_max_len);
    let len = match fitting {
        0 => boundaries.first().copied().unwrap_or_default(),
        n => boundaries[n - 1],
    };
    (encode(len), len)
}

fn encode_header_field(name: &str, input: &str) -> String {
    let mut prefix_len = name.len() + 1;
    let mut encoded_output = String::with_capacity(prefix_len + input.len() * 2);
    encoded_output.push_str(name);
    encoded_output.push(':');
    let mut input_len = 0;
    while input_len < input.len() {
        if input_len > 0 {
            // continuation line
            encoded_output.push_str(LINE_BREAK);
            encoded_output.push(' ');
            prefix_len = 1;
        }
        let (encoded_part, input_part_len) =
            encode_header_field_partially(&input[input_len..], MAX_HEADER_FIELD_LEN - prefix_len);
        debug_assert!(input_part_len > 0);
        encoded_output.push_str(&encoded_part);
        input_len += input_part_len;
    }
    encoded_output
}

pub fn compose(from: &str, to: &[&str], subject: &str, body: &str) -> anyhow::Result<String> {
    let to: Vec<_> = to.iter().copied().filter(|m| is_valid_email(m)).collect();
    if to.is_empty() {
        anyhow::bail!("No valid e-mail addresses specified");
    }
    let date = OffsetDateTime::now_utc().format(&Rfc2822)?;
    let email = format!(
        "Date:{date}\r\n\
         From:{from}\r\n\
         To:{to}\r\n\
         {subject_header}\r\n\
         MIME-Version:1.0\r\n\
         Content-Type:text/plain;charset=utf-8\r\n\r\n\
         {body}",
        to = to.join(","),
        subject_header = encode_header_field("Subject", subject),
    );
    debug!("Composed e-mail: {email}");
    Ok(email)
}
