// include the model for api input, output. EX: SendNotificationRequest,
// SendNotificationResponse....

mod validation;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use self::validation::{
    validate_notification, DEFAULT_SUBJECT, MAX_CONTENT_LENGTH, MAX_RECIPIENT_NAME_LENGTH,
    MAX_SUBJECT_LENGTH,
};

/// Body of `POST /notifications`.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    /// Recipient's email address
    #[schema(example = "user@example.com")]
    pub recipient_address: String,

    /// Recipient's display name, 1 to 100 characters
    #[schema(example = "Test User")]
    pub recipient_name: String,

    /// Message text, 1 to 5000 characters, line breaks allowed
    #[schema(example = "Remember to take a short break today.")]
    pub content: String,

    /// Subject line, up to 200 characters
    #[schema(example = "MyMindSpace Notification")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// One of `low`, `normal`, `high`
    #[schema(example = "normal")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,

    #[schema(example = "Email sent successfully")]
    pub message: String,

    #[schema(example = "<0b6e1d4c-93a4-4a4e-9c55-1f2a2f0d7a61@mymindspace.com>")]
    pub message_id: String,

    pub timestamp: String,
}

impl SendNotificationResponse {
    #[must_use]
    pub fn delivered(message_id: String, timestamp: String) -> Self {
        Self { success: true, message: "Email sent successfully".to_string(), message_id, timestamp }
    }
}

/// Whether a mail transport is available.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub enum ServiceActivity {
    Active,
    Inactive,
}

impl ServiceActivity {
    #[must_use]
    pub const fn from_ready(ready: bool) -> Self { if ready { Self::Active } else { Self::Inactive } }
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceStatus {
    pub success: bool,

    #[schema(example = "Email Notification Service")]
    pub service: String,

    pub status: ServiceActivity,

    #[schema(example = "gmail")]
    pub provider: String,

    pub timestamp: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "OK")]
    pub status: String,

    #[schema(example = "MyMindSpace Email Service")]
    pub service: String,

    pub timestamp: String,
}
