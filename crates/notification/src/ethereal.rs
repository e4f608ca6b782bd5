//! Disposable Ethereal sandbox mailboxes.
//!
//! Messages sent to an Ethereal account are never delivered; they can be
//! inspected on the web instead.

use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};

use crate::{error, smtp::Credentials, Error};

/// Account provisioning endpoint.
pub const ACCOUNT_API_URL: &str = "https://api.nodemailer.com/user";

pub const SMTP_HOST: &str = "smtp.ethereal.email";

pub const SMTP_PORT: u16 = 587;

/// Base of message preview links.
pub const WEB_URL: &str = "https://ethereal.email";

/// SMTP endpoint of a provisioned account.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub secure: bool,
}

/// A freshly provisioned sandbox account.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestAccount {
    pub credentials: Credentials,
    pub smtp: Endpoint,
    pub web: String,
}

#[derive(Serialize)]
struct AccountRequest {
    requestor: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct AccountResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    pass: Option<String>,
    #[serde(default)]
    smtp: Option<Endpoint>,
    #[serde(default)]
    web: Option<String>,
}

impl AccountResponse {
    fn into_account(self) -> Result<TestAccount, Error> {
        if self.status != "success" {
            return Err(Error::TestAccountRejected {
                reason: self.error.unwrap_or(self.status),
            });
        }

        let username = self
            .user
            .context(error::TestAccountRejectedSnafu { reason: "missing user name" })?;
        let password =
            self.pass.context(error::TestAccountRejectedSnafu { reason: "missing password" })?;

        Ok(TestAccount {
            credentials: Credentials { username, password },
            smtp: self.smtp.unwrap_or_else(|| Endpoint {
                host: SMTP_HOST.to_string(),
                port: SMTP_PORT,
                secure: false,
            }),
            web: self.web.unwrap_or_else(|| WEB_URL.to_string()),
        })
    }
}

/// Provisions a new sandbox account.
///
/// # Errors
///
/// Returns an error if the API cannot be reached or refuses the request.
pub async fn create_test_account(http: &reqwest::Client) -> Result<TestAccount, Error> {
    tracing::info!("Requesting Ethereal test account");

    let response = http
        .post(ACCOUNT_API_URL)
        .json(&AccountRequest {
            requestor: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        })
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .context(error::CreateTestAccountSnafu)?;

    response.json::<AccountResponse>().await.context(error::CreateTestAccountSnafu)?.into_account()
}

/// Extracts the preview link from an Ethereal SMTP reply such as
/// `250 Accepted [STATUS=new MSGID=abc.def]`.
#[must_use]
pub fn preview_url(web_url: &str, smtp_reply: &str) -> Option<String> {
    let start = smtp_reply.find('[')? + 1;
    let end = start + smtp_reply[start..].find(']')?;
    let message_id =
        smtp_reply[start..end].split_whitespace().find_map(|token| token.strip_prefix("MSGID="))?;

    Some(format!("{}/message/{message_id}", web_url.trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_url() {
        let url = preview_url(WEB_URL, "250 Accepted [STATUS=new MSGID=YZ5Qm.abc-123]");
        assert_eq!(url.as_deref(), Some("https://ethereal.email/message/YZ5Qm.abc-123"));

        let url = preview_url("https://ethereal.email/", "Accepted [MSGID=xyz STATUS=new]");
        assert_eq!(url.as_deref(), Some("https://ethereal.email/message/xyz"));
    }

    #[test]
    fn test_preview_url_without_message_id() {
        assert_eq!(preview_url(WEB_URL, "250 2.0.0 OK queued"), None);
        assert_eq!(preview_url(WEB_URL, "250 Accepted [STATUS=new]"), None);
        assert_eq!(preview_url(WEB_URL, "250 Accepted [MSGID=unterminated"), None);
    }

    #[test]
    fn test_account_response() {
        let response = AccountResponse {
            status: "success".to_string(),
            error: None,
            user: Some("kody@ethereal.email".to_string()),
            pass: Some("secret".to_string()),
            smtp: None,
            web: None,
        };
        let account = response.into_account().unwrap();

        assert_eq!(account.credentials.username, "kody@ethereal.email");
        assert_eq!(account.smtp.host, SMTP_HOST);
        assert_eq!(account.smtp.port, SMTP_PORT);
        assert_eq!(account.web, WEB_URL);
    }

    #[test]
    fn test_account_response_rejected() {
        let response = AccountResponse {
            status: "error".to_string(),
            error: Some("rate limited".to_string()),
            user: None,
            pass: None,
            smtp: None,
            web: None,
        };

        let err = response.into_account().unwrap_err();
        assert_eq!(err.to_string(), "Ethereal test account request was rejected: rate limited");
    }
}
