use std::fmt::{self, Display, Formatter};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mindspace_axum::{json_response, response};
use snafu::Snafu;

pub type Result<T> = std::result::Result<T, Error>;

/// A notification payload field, named the way callers see it in messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    /// JSON key.
    pub key: &'static str,
    /// Human readable name.
    pub label: &'static str,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.label) }
}

/// Validation failures. Only the first violated rule is ever reported.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Request body must be a JSON object"))]
    NotAnObject,

    #[snafu(display("{field} is required"))]
    MissingField { field: Field },

    #[snafu(display("{field} must be a string"))]
    NotAString { field: Field },

    #[snafu(display("{field} cannot be empty"))]
    EmptyField { field: Field },

    #[snafu(display("{field} cannot exceed {max} characters"))]
    FieldTooLong { field: Field, max: usize },

    #[snafu(display("Please provide a valid email address"))]
    InvalidEmail { address: String },

    #[snafu(display("Priority must be one of [low, normal, high]"))]
    InvalidPriority { value: String },

    #[snafu(display("\"{key}\" is not allowed"))]
    UnknownField { key: String },
}

impl IntoResponse for Error {
    // SAFETY: allow: high cognitive complexity caused by `tracing` macro
    #[allow(clippy::cognitive_complexity)]
    fn into_response(self) -> Response {
        json_response! {
            reason: self,
            status: StatusCode::BAD_REQUEST,
            body: response::Error::validation(self.to_string())
        }
    }
}
