use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A JSON body sent with an explicit status code.
#[derive(Clone, Debug)]
pub struct JsonResponse<T> {
    status_code: StatusCode,
    body: T,
}

impl<T> JsonResponse<T> {
    #[inline]
    #[must_use]
    pub const fn new(status_code: StatusCode, body: T) -> Self { Self { status_code, body } }

    #[inline]
    #[must_use]
    pub const fn ok(body: T) -> Self { Self::new(StatusCode::OK, body) }

    #[inline]
    #[must_use]
    pub const fn status_code(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }
}

impl<T> IntoResponse for JsonResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response { (self.status_code, Json(self.body)).into_response() }
}

/// Error body shared by every endpoint.
///
/// `success` is omitted for routing errors, `details` carries validation
/// messages and `message` everything else.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub struct Error {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,

    pub error: ErrorType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Error {
    #[must_use]
    pub fn validation(details: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: ErrorType::Validation,
            details: Some(details.into()),
            message: None,
        }
    }

    #[must_use]
    pub fn email_send_failed(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: ErrorType::EmailSendFailed,
            details: None,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: ErrorType::Internal,
            details: None,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub const fn not_found() -> Self {
        Self { success: None, error: ErrorType::NotFound, details: None, message: None }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ToSchema)]
pub enum ErrorType {
    #[serde(rename = "Validation Error")]
    Validation,

    #[serde(rename = "Email Send Failed")]
    EmailSendFailed,

    #[serde(rename = "Internal Server Error")]
    Internal,

    #[serde(rename = "Endpoint not found")]
    NotFound,
}

#[macro_export]
macro_rules! json_response {
    (status: $status:expr,body: $body:expr) => {
        ::axum::response::IntoResponse::into_response($crate::response::JsonResponse::new(
            $status, $body,
        ))
    };

    (reason: $reason:expr,status: $status:expr,body: $body:expr) => {{
        if $status.is_server_error() {
            $crate::tracing::error!(
                status_code = $status.as_u16(),
                "Internal Server Error: {}",
                $reason
            );
        } else {
            $crate::tracing::warn!(status_code = $status.as_u16(), "Response Error: {}", $reason);
        }

        $crate::json_response! { status: $status, body: $body }
    }};
}
