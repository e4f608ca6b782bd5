use notification::smtp::{Credentials, TransportConfig, DEFAULT_SMTP_PORT};
use serde::{Deserialize, Serialize};

/// Host used by the `smtp` transport when none is configured.
const DEFAULT_SMTP_HOST: &str = "localhost";

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MailConfig {
    /// `gmail`, `smtp` or anything else for an Ethereal sandbox. Unset means
    /// `gmail`.
    #[serde(default)]
    pub service: Option<String>,

    #[serde(default)]
    pub from_address: Option<String>,

    /// Escape HTML in recipient names and content.
    #[serde(default)]
    pub escape_html: bool,

    #[serde(default)]
    pub gmail: GmailConfig,

    #[serde(default)]
    pub smtp: SmtpConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GmailConfig {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub app_password: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "SmtpConfig::default_port")]
    pub port: u16,

    /// Implicit TLS instead of STARTTLS.
    #[serde(default)]
    pub secure: bool,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl SmtpConfig {
    #[inline]
    pub const fn default_port() -> u16 { DEFAULT_SMTP_PORT }

    fn credentials(&self) -> Option<Credentials> {
        Credentials::from_parts(self.username.clone(), self.password.clone())
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self { host: None, port: Self::default_port(), secure: false, username: None, password: None }
    }
}

impl MailConfig {
    /// `from_address`, else the Gmail account, else the shared no-reply
    /// address.
    pub fn sender_address(&self) -> &str {
        self.from_address
            .as_deref()
            .or(self.gmail.username.as_deref())
            .unwrap_or(mindspace_mailer_core::DEFAULT_SENDER_ADDRESS)
    }

    pub fn transport_config(&self) -> TransportConfig {
        match self.service.as_deref() {
            None | Some("gmail") => TransportConfig::Gmail {
                credentials: Credentials::from_parts(
                    self.gmail.username.clone(),
                    self.gmail.app_password.clone(),
                ),
            },
            Some("smtp") => TransportConfig::Smtp {
                host: self.smtp.host.clone().unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: self.smtp.port,
                secure: self.smtp.secure,
                credentials: self.smtp.credentials(),
            },
            Some(_) => TransportConfig::Ethereal { credentials: self.smtp.credentials() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_service_is_gmail() {
        let config = MailConfig {
            gmail: GmailConfig {
                username: Some("me@gmail.com".to_string()),
                app_password: Some("app-password".to_string()),
            },
            ..Default::default()
        };

        assert_eq!(
            config.transport_config(),
            TransportConfig::Gmail {
                credentials: Some(Credentials {
                    username: "me@gmail.com".to_string(),
                    password: "app-password".to_string(),
                })
            }
        );
        assert_eq!(config.sender_address(), "me@gmail.com");
    }

    #[test]
    fn test_smtp_service() {
        let config = MailConfig {
            service: Some("smtp".to_string()),
            smtp: SmtpConfig {
                host: Some("mail.example.com".to_string()),
                secure: true,
                username: Some("relay".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            config.transport_config(),
            TransportConfig::Smtp {
                host: "mail.example.com".to_string(),
                port: 587,
                secure: true,
                credentials: None,
            }
        );
    }

    #[test]
    fn test_smtp_service_without_host() {
        let config = MailConfig { service: Some("smtp".to_string()), ..Default::default() };

        let TransportConfig::Smtp { host, .. } = config.transport_config() else {
            panic!("expected smtp transport");
        };
        assert_eq!(host, "localhost");
    }

    #[test]
    fn test_other_service_is_ethereal() {
        let config = MailConfig { service: Some("ethereal".to_string()), ..Default::default() };

        assert_eq!(config.transport_config(), TransportConfig::Ethereal { credentials: None });
    }

    #[test]
    fn test_sender_address_precedence() {
        let mut config = MailConfig::default();
        assert_eq!(config.sender_address(), "noreply@mymindspace.com");

        config.gmail.username = Some("me@gmail.com".to_string());
        config.from_address = Some("hello@mymindspace.com".to_string());
        assert_eq!(config.sender_address(), "hello@mymindspace.com");
    }
}
