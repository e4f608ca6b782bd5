//! SMTP implementation of [`MailTransport`].

use std::fmt::{self, Debug, Formatter};

use async_trait::async_trait;
use lettre::{
    transport::smtp::{
        authentication::Credentials as SmtpCredentials,
        client::{Tls, TlsParameters},
        AsyncSmtpTransportBuilder,
    },
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use snafu::ResultExt;

use crate::{error, ethereal, Envelope, Error, MailTransport, Receipt};

pub const GMAIL_HOST: &str = "smtp.gmail.com";

/// Gmail only accepts implicit TLS on this port.
pub const GMAIL_PORT: u16 = 465;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP user name and password.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Pairs up optional values, both have to be present.
    #[must_use]
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Where and how to deliver mail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportConfig {
    /// Gmail with an application password.
    Gmail { credentials: Option<Credentials> },

    /// Any SMTP relay. `secure` selects implicit TLS, otherwise STARTTLS is
    /// used when the server offers it.
    Smtp { host: String, port: u16, secure: bool, credentials: Option<Credentials> },

    /// Ethereal sandbox. Without credentials a test account is provisioned.
    Ethereal { credentials: Option<Credentials> },
}

impl TransportConfig {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Gmail { .. } => "gmail",
            Self::Smtp { .. } => "smtp",
            Self::Ethereal { .. } => "ethereal",
        }
    }
}

/// Mail transport backed by a pooled `lettre` SMTP client.
#[derive(Clone)]
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,

    // Set for sandbox mailboxes only
    preview_base_url: Option<String>,
}

impl SmtpTransport {
    /// Creates a transport from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - TLS parameters cannot be built for the host
    /// - An Ethereal test account cannot be provisioned
    pub async fn from_config(config: TransportConfig) -> Result<Self, Error> {
        match config {
            TransportConfig::Gmail { credentials } => {
                if credentials.is_none() {
                    tracing::warn!("Gmail transport has no credentials, delivery will fail");
                }
                let builder = transport_builder(GMAIL_HOST, GMAIL_PORT, true)?;
                Ok(Self { inner: authenticate(builder, credentials).build(), preview_base_url: None })
            }
            TransportConfig::Smtp { host, port, secure, credentials } => {
                let builder = transport_builder(&host, port, secure)?;
                Ok(Self { inner: authenticate(builder, credentials).build(), preview_base_url: None })
            }
            TransportConfig::Ethereal { credentials: Some(credentials) } => {
                let builder = transport_builder(ethereal::SMTP_HOST, ethereal::SMTP_PORT, false)?;
                Ok(Self {
                    inner: authenticate(builder, Some(credentials)).build(),
                    preview_base_url: Some(ethereal::WEB_URL.to_string()),
                })
            }
            TransportConfig::Ethereal { credentials: None } => {
                let account = ethereal::create_test_account(&reqwest::Client::new()).await?;
                tracing::info!(user = %account.credentials.username, "Using Ethereal test account");

                let ethereal::Endpoint { host, port, secure } = &account.smtp;
                let builder = transport_builder(host, *port, *secure)?;
                Ok(Self {
                    inner: authenticate(builder, Some(account.credentials)).build(),
                    preview_base_url: Some(account.web),
                })
            }
        }
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn verify(&self) -> Result<(), Error> {
        if self.inner.test_connection().await.context(error::VerifyConnectionSnafu)? {
            Ok(())
        } else {
            Err(Error::ConnectionRejected)
        }
    }

    async fn send(&self, envelope: &Envelope) -> Result<Receipt, Error> {
        let message_id = envelope.new_message_id();
        let message = envelope.to_message(&message_id)?;

        let response = self.inner.send(message).await.context(error::SendMailSnafu)?;

        let preview_url = self.preview_base_url.as_deref().and_then(|web_url| {
            let reply = response.message().collect::<Vec<_>>().join(" ");
            ethereal::preview_url(web_url, &reply)
        });

        Ok(Receipt { message_id, preview_url })
    }
}

fn transport_builder(
    host: &str,
    port: u16,
    secure: bool,
) -> Result<AsyncSmtpTransportBuilder, Error> {
    let parameters =
        TlsParameters::new(host.to_string()).context(error::BuildTransportSnafu { host })?;
    let tls = if secure { Tls::Wrapper(parameters) } else { Tls::Opportunistic(parameters) };

    Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port).tls(tls))
}

fn authenticate(
    builder: AsyncSmtpTransportBuilder,
    credentials: Option<Credentials>,
) -> AsyncSmtpTransportBuilder {
    match credentials {
        Some(Credentials { username, password }) => {
            builder.credentials(SmtpCredentials::new(username, password))
        }
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_from_parts() {
        assert_eq!(
            Credentials::from_parts(Some("user".to_string()), Some("pass".to_string())),
            Some(Credentials { username: "user".to_string(), password: "pass".to_string() })
        );
        assert_eq!(Credentials::from_parts(Some("user".to_string()), None), None);
        assert_eq!(Credentials::from_parts(None, Some("pass".to_string())), None);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials =
            Credentials { username: "user".to_string(), password: "hunter2".to_string() };
        let debug = format!("{credentials:?}");

        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_from_config_smtp() {
        let config = TransportConfig::Smtp {
            host: "mail.example.com".to_string(),
            port: 2525,
            secure: false,
            credentials: None,
        };
        assert_eq!(config.kind(), "smtp");

        let transport = SmtpTransport::from_config(config).await.unwrap();
        assert!(transport.preview_base_url.is_none());
    }

    #[tokio::test]
    async fn test_from_config_ethereal_with_credentials() {
        let config = TransportConfig::Ethereal {
            credentials: Some(Credentials {
                username: "kody@ethereal.email".to_string(),
                password: "secret".to_string(),
            }),
        };

        let transport = SmtpTransport::from_config(config).await.unwrap();
        assert_eq!(transport.preview_base_url.as_deref(), Some(ethereal::WEB_URL));
    }
}
