use lettre::{
    message::{
        header::{Header, HeaderName, HeaderValue},
        Mailbox, MultiPart,
    },
    Message,
};
use snafu::ResultExt;
use uuid::Uuid;

use crate::{error, Error, Priority};

/// Priority as understood by mail clients. `low` has no header of its own and
/// is sent as `normal`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TransportPriority {
    #[default]
    Normal,
    High,
}

impl From<Priority> for TransportPriority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => Self::High,
            Priority::Low | Priority::Normal => Self::Normal,
        }
    }
}

/// A fully composed message, independent of the transport that delivers it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Envelope {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub priority: TransportPriority,
}

impl Envelope {
    /// Generates a fresh `Message-ID` on the sender's domain.
    #[must_use]
    pub fn new_message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }

    /// Builds the `multipart/alternative` MIME message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built.
    pub fn to_message(&self, message_id: &str) -> Result<Message, Error> {
        let builder = Message::builder()
            .message_id(Some(message_id.to_string()))
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(self.subject.as_str());

        let builder = match self.priority {
            TransportPriority::High => builder
                .header(XPriority("1 (Highest)".to_string()))
                .header(XMsMailPriority("High".to_string()))
                .header(Importance("High".to_string())),
            TransportPriority::Normal => builder,
        };

        builder
            .multipart(MultiPart::alternative_plain_html(self.text.clone(), self.html.clone()))
            .context(error::BuildMessageSnafu)
    }
}

macro_rules! priority_header {
    ($header:ident, $name:literal) => {
        #[derive(Clone, Debug, Eq, PartialEq)]
        struct $header(String);

        impl Header for $header {
            fn name() -> HeaderName { HeaderName::new_from_ascii_str($name) }

            fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
                Ok(Self(s.to_string()))
            }

            fn display(&self) -> HeaderValue { HeaderValue::new(Self::name(), self.0.clone()) }
        }
    };
}

priority_header!(XPriority, "X-Priority");
priority_header!(XMsMailPriority, "X-MSMail-Priority");
priority_header!(Importance, "Importance");
