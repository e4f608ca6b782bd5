//! # Notification Crate
//!
//! This crate composes MyMindSpace notification emails and relays them
//! through a [`MailTransport`]. The production transport speaks SMTP and can
//! target Gmail, an arbitrary SMTP relay or an Ethereal sandbox mailbox.
//!
//! ## Features
//!
//! - HTML and plain text bodies from a fixed branded template
//! - Transport priority headers for urgent notifications
//! - Disposable Ethereal mailbox for local verification
//! - Async/await support

mod envelope;
mod error;
pub mod ethereal;
mod notifier;
pub mod smtp;
pub mod template;

use async_trait::async_trait;
pub use lettre::{message::Mailbox, Address};
use snafu::ResultExt;

pub use self::{
    envelope::{Envelope, TransportPriority},
    error::Error,
    notifier::{DeliveryResult, Notifier},
};

/// Display name used for every outgoing notification.
pub const SENDER_NAME: &str = "MyMindSpace";

/// Urgency requested by the caller.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    /// All accepted priorities, in the order they are documented.
    pub const ALL: [Self; 3] = [Self::Low, Self::Normal, Self::High];

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// Looks a priority up by its lowercase name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.as_str() == name)
    }
}

/// A validated notification, ready to be rendered and delivered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    /// Recipient's display name.
    pub recipient_name: String,
    /// Recipient's email address.
    pub recipient_address: Address,
    /// Free text body, may contain line breaks.
    pub content: String,
    /// Subject line.
    pub subject: String,
    /// Requested urgency.
    pub priority: Priority,
}

impl Notification {
    #[must_use]
    pub fn recipient(&self) -> Mailbox {
        Mailbox::new(Some(self.recipient_name.clone()), self.recipient_address.clone())
    }
}

/// What a transport hands back after accepting a message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Receipt {
    /// `Message-ID` assigned to the delivered message.
    pub message_id: String,
    /// Web preview of the message, only known for sandbox mailboxes.
    pub preview_url: Option<String>,
}

/// Trait for transports that can deliver a composed [`Envelope`].
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Checks that the mail server is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or is refused.
    async fn verify(&self) -> Result<(), Error>;

    /// Sends a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or is rejected.
    async fn send(&self, envelope: &Envelope) -> Result<Receipt, Error>;
}

/// Builds the sender mailbox shown on every notification.
///
/// # Errors
///
/// Returns an error if `address` is not a valid email address.
pub fn sender_mailbox(address: &str) -> Result<Mailbox, Error> {
    let email = address
        .parse::<Address>()
        .context(error::InvalidAddressSnafu { address: address.to_string() })?;
    Ok(Mailbox::new(Some(SENDER_NAME.to_string()), email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_name() {
        assert_eq!(Priority::from_name("low"), Some(Priority::Low));
        assert_eq!(Priority::from_name("normal"), Some(Priority::Normal));
        assert_eq!(Priority::from_name("high"), Some(Priority::High));
        assert_eq!(Priority::from_name("HIGH"), None);
        assert_eq!(Priority::from_name("urgent"), None);
    }

    #[test]
    fn test_sender_mailbox() {
        let mailbox = sender_mailbox("noreply@mymindspace.com").unwrap();
        assert_eq!(mailbox.name.as_deref(), Some(SENDER_NAME));
        assert_eq!(mailbox.email.to_string(), "noreply@mymindspace.com");

        assert!(sender_mailbox("not an address").is_err());
    }
}
