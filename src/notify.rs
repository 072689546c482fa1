//! E-mails the hosts whenever an RSVP comes in.

use std::env;

use lettre::message::header::{self, ContentType};
use lettre::message::Mailboxes;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Deserialize;
use thiserror::Error;

use crate::models::RsvpWithGuests;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotifyConfig {
    /// STARTTLS relay host.
    pub relay: String,
    pub username: String,
    pub from: String,
    /// Comma-separated mailboxes, e.g. `"Ethan <e@example.com>, Amanda <a@example.com>"`.
    pub to: String,
    #[serde(default)]
    pub reply_to: Option<String>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SMTP_PASSWORD is not set")]
    MissingPassword,
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub fn subject_for(response: &RsvpWithGuests) -> String {
    let names = if response.parsed_guests.is_empty() {
        String::from("Someone")
    } else {
        response.parsed_guests.join(", ")
    };
    if response.rsvp.attending {
        format!("{names} will be attending")
    } else {
        format!("{names} can't make it")
    }
}

pub fn body_for(response: &RsvpWithGuests) -> String {
    let raw = response.rsvp.guests.as_deref().unwrap_or("N/A");
    let diet = response.rsvp.allergies.as_deref().unwrap_or("N/A");
    let status = if response.rsvp.attending {
        "Attending"
    } else {
        "Not attending"
    };

    let mut body = format!("Response: {status}\nGuests as entered: {raw}\n");
    if !response.parsed_guests.is_empty() {
        body.push_str("Guest list:\n");
        for name in &response.parsed_guests {
            body.push_str(&format!("  - {name}\n"));
        }
    }
    body.push_str(&format!("Dietary notes: {diet}\n"));
    body
}

pub fn build_message(config: &NotifyConfig, response: &RsvpWithGuests) -> Result<Message, NotifyError> {
    let mailboxes: Mailboxes = config.to.parse()?;
    let to_header: header::To = mailboxes.into();

    let mut builder = Message::builder()
        .mailbox(to_header)
        .from(config.from.parse()?)
        .subject(subject_for(response))
        .header(ContentType::TEXT_PLAIN);
    if let Some(reply_to) = &config.reply_to {
        builder = builder.reply_to(reply_to.parse()?);
    }

    Ok(builder.body(body_for(response))?)
}

/// Blocking send; call from a blocking task.
pub fn send(config: &NotifyConfig, response: &RsvpWithGuests) -> Result<(), NotifyError> {
    let password = env::var("SMTP_PASSWORD").map_err(|_| NotifyError::MissingPassword)?;
    let email = build_message(config, response)?;
    let creds = Credentials::new(config.username.clone(), password);

    let mailer = SmtpTransport::starttls_relay(&config.relay)?
        .credentials(creds)
        .build();
    mailer.send(&email)?;
    Ok(())
}

/// Fire-and-forget notification. Errors are logged, never returned.
pub fn spawn(config: Option<NotifyConfig>, response: RsvpWithGuests) {
    let Some(config) = config else {
        return;
    };
    rocket::tokio::task::spawn_blocking(move || match send(&config, &response) {
        Ok(()) => log::info!("notified hosts about rsvp {}", response.rsvp.id),
        Err(e) => log::error!("could not notify hosts about rsvp {}: {e}", response.rsvp.id),
    });
}
