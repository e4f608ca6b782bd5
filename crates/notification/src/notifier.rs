use std::sync::Arc;

use lettre::message::Mailbox;

use crate::{
    template::{self, RenderOptions},
    Envelope, Error, MailTransport, Notification, Receipt,
};

/// Outcome of a single delivery attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DeliveryResult {
    Delivered { message_id: String },
    Failed { error: String },
}

impl DeliveryResult {
    #[inline]
    #[must_use]
    pub const fn is_delivered(&self) -> bool { matches!(self, Self::Delivered { .. }) }
}

/// Renders notifications and hands them to the configured transport.
///
/// A notifier without transport still answers every request, with a failure.
#[derive(Clone)]
pub struct Notifier {
    transport: Option<Arc<dyn MailTransport>>,
    sender: Mailbox,
    render_options: RenderOptions,
}

impl Notifier {
    #[inline]
    #[must_use]
    pub fn new(transport: Option<Arc<dyn MailTransport>>, sender: Mailbox) -> Self {
        Self { transport, sender, render_options: RenderOptions::default() }
    }

    #[inline]
    #[must_use]
    pub fn with_render_options(mut self, render_options: RenderOptions) -> Self {
        self.render_options = render_options;
        self
    }

    /// Whether a transport was configured.
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool { self.transport.is_some() }

    /// Composes the envelope for `notification`.
    #[must_use]
    pub fn compose(&self, notification: &Notification) -> Envelope {
        let Notification { recipient_name, content, subject, priority, .. } = notification;

        Envelope {
            from: self.sender.clone(),
            to: notification.recipient(),
            subject: subject.clone(),
            html: template::render_html(recipient_name, content, self.render_options),
            text: template::render_text(recipient_name, content),
            priority: (*priority).into(),
        }
    }

    /// Verifies the transport and sends `notification` once.
    ///
    /// Never fails: every error is logged and reported as
    /// [`DeliveryResult::Failed`].
    pub async fn send_notification(&self, notification: &Notification) -> DeliveryResult {
        match self.deliver(notification).await {
            Ok(Receipt { message_id, preview_url }) => {
                tracing::info!(
                    to = %notification.recipient_address,
                    message_id = %message_id,
                    "Email sent successfully"
                );
                if let Some(preview_url) = preview_url {
                    tracing::info!(%preview_url, "Sandbox message preview");
                }
                DeliveryResult::Delivered { message_id }
            }
            Err(error) => {
                tracing::error!(to = %notification.recipient_address, %error, "Email send error");
                DeliveryResult::Failed { error: error.to_string() }
            }
        }
    }

    async fn deliver(&self, notification: &Notification) -> Result<Receipt, Error> {
        let transport = self.transport.as_ref().ok_or(Error::TransportNotInitialized)?;

        transport.verify().await?;

        let envelope = self.compose(notification);
        transport.send(&envelope).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{Priority, TransportPriority};

    #[derive(Default)]
    struct RecordingTransport {
        reject_connection: bool,
        reject_message: Option<String>,
        sent: Mutex<Vec<Envelope>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn verify(&self) -> Result<(), Error> {
            if self.reject_connection {
                Err(Error::ConnectionRejected)
            } else {
                Ok(())
            }
        }

        async fn send(&self, envelope: &Envelope) -> Result<Receipt, Error> {
            if let Some(message) = &self.reject_message {
                return Err(Error::Transport { message: message.clone() });
            }
            self.sent.lock().unwrap().push(envelope.clone());
            Ok(Receipt { message_id: "<1@mymindspace.com>".to_string(), preview_url: None })
        }
    }

    fn notification(priority: Priority) -> Notification {
        Notification {
            recipient_name: "Test User".to_string(),
            recipient_address: "test@example.com".parse().unwrap(),
            content: "Hello\nthere".to_string(),
            subject: "Hi".to_string(),
            priority,
        }
    }

    fn notifier(transport: Option<Arc<dyn MailTransport>>) -> Notifier {
        Notifier::new(transport, crate::sender_mailbox("noreply@mymindspace.com").unwrap())
    }

    #[tokio::test]
    async fn test_send_notification_delivered() {
        let transport = Arc::new(RecordingTransport::default());
        let notifier = notifier(Some(transport.clone()));

        let result = notifier.send_notification(&notification(Priority::High)).await;
        assert_eq!(
            result,
            DeliveryResult::Delivered { message_id: "<1@mymindspace.com>".to_string() }
        );

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to.email.to_string(), "test@example.com");
        assert_eq!(sent[0].to.name.as_deref(), Some("Test User"));
        assert_eq!(sent[0].subject, "Hi");
        assert_eq!(sent[0].priority, TransportPriority::High);
        assert!(sent[0].html.contains("Hello<br>there"));
        assert!(sent[0].text.starts_with("Hello Test User,"));
    }

    #[tokio::test]
    async fn test_send_notification_without_transport() {
        let notifier = notifier(None);
        assert!(!notifier.is_ready());

        let result = notifier.send_notification(&notification(Priority::Normal)).await;
        assert_eq!(
            result,
            DeliveryResult::Failed { error: "Email transporter not initialized".to_string() }
        );
    }

    #[tokio::test]
    async fn test_send_notification_verify_failed() {
        let transport =
            Arc::new(RecordingTransport { reject_connection: true, ..Default::default() });
        let notifier = notifier(Some(transport.clone()));

        let result = notifier.send_notification(&notification(Priority::Normal)).await;
        assert_eq!(
            result,
            DeliveryResult::Failed { error: "SMTP connection verification failed".to_string() }
        );
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_notification_send_failed() {
        let transport = Arc::new(RecordingTransport {
            reject_message: Some("554 mailbox unavailable".to_string()),
            ..Default::default()
        });
        let notifier = notifier(Some(transport));

        let result = notifier.send_notification(&notification(Priority::Low)).await;
        assert!(!result.is_delivered());
        assert_eq!(result, DeliveryResult::Failed { error: "554 mailbox unavailable".to_string() });
    }

    #[test]
    fn test_compose_low_priority_is_normal() {
        let envelope = notifier(None).compose(&notification(Priority::Low));

        assert_eq!(envelope.priority, TransportPriority::Normal);
        assert_eq!(envelope.from.name.as_deref(), Some("MyMindSpace"));
    }

    #[test]
    fn test_compose_escapes_when_configured() {
        let notifier =
            notifier(None).with_render_options(RenderOptions { escape_html: true });
        let mut notification = notification(Priority::Normal);
        notification.recipient_name = "<Ann>".to_string();

        let envelope = notifier.compose(&notification);
        assert!(envelope.html.contains("Hello &lt;Ann&gt;,"));
        assert!(envelope.text.starts_with("Hello <Ann>,"));
    }
}
