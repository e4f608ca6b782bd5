use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mindspace_axum::{json_response, response};
use mindspace_mailer_core::INTERNAL_ERROR_MESSAGE;
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Validation { source: mindspace_mailer_core::error::Error },

    /// The body was read but is not usable as a notification payload.
    #[snafu(display("{source}"))]
    MalformedBody { source: JsonRejection },

    /// The body could not be read or is not JSON at all.
    #[snafu(display("Could not read request body, error: {source}"))]
    UnreadableBody { source: JsonRejection },

    #[snafu(display("{message}"))]
    DeliveryFailed { message: String },
}

impl From<mindspace_mailer_core::error::Error> for Error {
    fn from(source: mindspace_mailer_core::error::Error) -> Self { Self::Validation { source } }
}

// Only a missing JSON content type is the caller's fault. Syntax errors and
// bodies over the size limit are answered like any other unexpected fault.
impl From<JsonRejection> for Error {
    fn from(source: JsonRejection) -> Self {
        match source {
            JsonRejection::MissingJsonContentType(_) | JsonRejection::JsonDataError(_) => {
                Self::MalformedBody { source }
            }
            _ => Self::UnreadableBody { source },
        }
    }
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        match self {
            Self::Validation { source } => source.into_response(),
            Self::MalformedBody { ref source } => json_response! {
                reason: self,
                status: StatusCode::BAD_REQUEST,
                body: response::Error::validation(source.body_text())
            },
            Self::UnreadableBody { .. } => json_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: response::Error::internal(INTERNAL_ERROR_MESSAGE)
            },
            Self::DeliveryFailed { ref message } => json_response! {
                reason: self,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: response::Error::email_send_failed(message.as_str())
            },
        }
    }
}
