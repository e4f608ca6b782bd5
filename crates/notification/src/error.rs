use snafu::Snafu;

/// Errors that can occur in the notification crate.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// No mail transport was constructed at startup.
    #[snafu(display("Email transporter not initialized"))]
    TransportNotInitialized,

    /// An address could not be parsed into a mailbox.
    #[snafu(display("Invalid email address `{address}`, error: {source}"))]
    InvalidAddress {
        /// The rejected address.
        address: String,
        /// The underlying parse error.
        source: lettre::address::AddressError,
    },

    /// Failed to build the MIME message.
    #[snafu(display("Failed to build email message, error: {source}"))]
    BuildMessage {
        /// The underlying builder error.
        source: lettre::error::Error,
    },

    /// Failed to set up the SMTP client.
    #[snafu(display("Failed to build SMTP transport for `{host}`, error: {source}"))]
    BuildTransport {
        /// SMTP server host name.
        host: String,
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },

    /// The SMTP server could not be reached.
    #[snafu(display("{source}"))]
    VerifyConnection {
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },

    /// The SMTP server was reached but did not accept the connection.
    #[snafu(display("SMTP connection verification failed"))]
    ConnectionRejected,

    /// The SMTP server refused the message.
    #[snafu(display("{source}"))]
    SendMail {
        /// The underlying SMTP error.
        source: lettre::transport::smtp::Error,
    },

    /// Failure reported by a custom [`MailTransport`](crate::MailTransport).
    #[snafu(display("{message}"))]
    Transport {
        /// Human readable reason.
        message: String,
    },

    /// HTTP request to the Ethereal account API failed.
    #[snafu(display("Failed to create Ethereal test account, error: {source}"))]
    CreateTestAccount {
        /// The underlying reqwest error.
        source: reqwest::Error,
    },

    /// The Ethereal account API answered without credentials.
    #[snafu(display("Ethereal test account request was rejected: {reason}"))]
    TestAccountRejected {
        /// Reason reported by the API.
        reason: String,
    },
}
