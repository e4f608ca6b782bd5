use chrono::{SecondsFormat, Utc};

pub mod response;

#[doc(hidden)]
pub use tracing;

/// Current time as RFC 3339 in UTC with millisecond precision, e.g.
/// `2024-05-01T09:30:00.123Z`.
#[must_use]
pub fn timestamp() -> String { Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }
