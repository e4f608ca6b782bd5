//! Example: Send a notification to a disposable Ethereal mailbox.
//!
//! A test account is provisioned on the fly, the message never leaves the
//! sandbox. The preview link is printed in the logs.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example send_sandbox_notification
//! ```

use std::sync::Arc;

use notification::{
    smtp::{SmtpTransport, TransportConfig},
    DeliveryResult, Notification, Notifier, Priority,
};

#[tokio::main]
async fn main() -> Result<(), notification::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Creating sandbox transport");
    let transport = SmtpTransport::from_config(TransportConfig::Ethereal { credentials: None }).await?;

    let notifier = Notifier::new(
        Some(Arc::new(transport)),
        notification::sender_mailbox("noreply@mymindspace.com")?,
    );

    let notification = Notification {
        recipient_name: "Test User".to_string(),
        recipient_address: "user@example.com".parse().map_err(|source| {
            notification::Error::InvalidAddress { address: "user@example.com".to_string(), source }
        })?,
        content: "This is a test notification.\nHave a calm day.".to_string(),
        subject: "MyMindSpace Notification".to_string(),
        priority: Priority::Normal,
    };

    match notifier.send_notification(&notification).await {
        DeliveryResult::Delivered { message_id } => tracing::info!("✓ Email sent: {message_id}"),
        DeliveryResult::Failed { error } => tracing::error!("Email was not sent: {error}"),
    }

    Ok(())
}
