use notification::{Address, Notification, Priority};
use serde_json::{Map, Value};
use snafu::OptionExt;

use crate::error::{self, Field, Result};

pub const DEFAULT_SUBJECT: &str = "MyMindSpace Notification";

pub const MAX_RECIPIENT_NAME_LENGTH: usize = 100;
pub const MAX_CONTENT_LENGTH: usize = 5000;
pub const MAX_SUBJECT_LENGTH: usize = 200;

const RECIPIENT_ADDRESS: Field = Field { key: "recipientAddress", label: "Recipient address" };
const RECIPIENT_NAME: Field = Field { key: "recipientName", label: "Recipient name" };
const CONTENT: Field = Field { key: "content", label: "Content" };
const SUBJECT: Field = Field { key: "subject", label: "Subject" };
const PRIORITY: Field = Field { key: "priority", label: "Priority" };

const FIELDS: [Field; 5] = [RECIPIENT_ADDRESS, RECIPIENT_NAME, CONTENT, SUBJECT, PRIORITY];

/// Checks a `POST /notifications` payload and applies defaults.
///
/// Fields are checked in declaration order, unknown keys last; the first
/// violation is returned.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_notification(payload: &Value) -> Result<Notification> {
    let object = payload.as_object().context(error::NotAnObjectSnafu)?;

    let recipient_address = email_address(required_string(object, RECIPIENT_ADDRESS)?)?;
    let recipient_name =
        bounded(required_string(object, RECIPIENT_NAME)?, RECIPIENT_NAME, MAX_RECIPIENT_NAME_LENGTH)?;
    let content = bounded(required_string(object, CONTENT)?, CONTENT, MAX_CONTENT_LENGTH)?;
    let subject = optional_string(object, SUBJECT)?
        .map(|subject| bounded(subject, SUBJECT, MAX_SUBJECT_LENGTH))
        .transpose()?
        .unwrap_or(DEFAULT_SUBJECT);
    let priority = optional_string(object, PRIORITY)?
        .map(|value| {
            Priority::from_name(value)
                .context(error::InvalidPrioritySnafu { value: value.to_string() })
        })
        .transpose()?
        .unwrap_or_default();

    if let Some(key) = object.keys().find(|key| FIELDS.iter().all(|field| field.key != key.as_str()))
    {
        return error::UnknownFieldSnafu { key: key.clone() }.fail();
    }

    Ok(Notification {
        recipient_name: recipient_name.to_string(),
        recipient_address,
        content: content.to_string(),
        subject: subject.to_string(),
        priority,
    })
}

fn optional_string<'a>(object: &'a Map<String, Value>, field: Field) -> Result<Option<&'a str>> {
    match object.get(field.key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.as_str())),
        Some(_) => error::NotAStringSnafu { field }.fail(),
    }
}

fn required_string(object: &Map<String, Value>, field: Field) -> Result<&str> {
    optional_string(object, field)?.context(error::MissingFieldSnafu { field })
}

fn bounded(value: &str, field: Field, max: usize) -> Result<&str> {
    if value.is_empty() {
        return error::EmptyFieldSnafu { field }.fail();
    }
    if value.chars().count() > max {
        return error::FieldTooLongSnafu { field, max }.fail();
    }
    Ok(value)
}

const MAX_ADDRESS_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_LABEL_LENGTH: usize = 63;

// Stricter than RFC 5322: no quoted local parts, no address literals, and the
// domain must be a hostname with at least two labels and an alphabetic TLD.
fn email_address(value: &str) -> Result<Address> {
    let invalid = || error::InvalidEmailSnafu { address: value.to_string() };

    let address = value.parse::<Address>().ok().with_context(invalid)?;
    let valid = value.len() <= MAX_ADDRESS_LENGTH
        && is_dot_atom(address.user())
        && is_hostname(address.domain());

    if valid {
        Ok(address)
    } else {
        invalid().fail()
    }
}

fn is_dot_atom(local_part: &str) -> bool {
    const ATOM_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

    local_part.len() <= MAX_LOCAL_PART_LENGTH
        && local_part.split('.').all(|atom| {
            !atom.is_empty()
                && atom.chars().all(|c| c.is_alphanumeric() || ATOM_SPECIALS.contains(c))
        })
}

fn is_hostname(domain: &str) -> bool {
    let labels = domain.split('.').collect::<Vec<_>>();
    let Some(tld) = labels.last() else { return false };

    labels.len() >= 2
        && tld.chars().count() >= 2
        && tld.chars().all(char::is_alphabetic)
        && labels.iter().all(|label| {
            (1..=MAX_LABEL_LENGTH).contains(&label.len())
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(payload: &Value) -> String { validate_notification(payload).unwrap_err().to_string() }

    fn valid_payload() -> Value {
        json!({
            "recipientAddress": "test@example.com",
            "recipientName": "Test User",
            "content": "Hello",
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut payload = valid_payload();
        payload[key] = value;
        payload
    }

    #[test]
    fn test_defaults_applied() {
        let notification = validate_notification(&valid_payload()).unwrap();

        assert_eq!(notification.recipient_address.to_string(), "test@example.com");
        assert_eq!(notification.recipient_name, "Test User");
        assert_eq!(notification.content, "Hello");
        assert_eq!(notification.subject, DEFAULT_SUBJECT);
        assert_eq!(notification.priority, Priority::Normal);
    }

    #[test]
    fn test_fully_populated() {
        let payload = json!({
            "recipientAddress": "test@example.com",
            "recipientName": "Test User",
            "content": "line one\nline two",
            "subject": "Hi",
            "priority": "high",
        });
        let notification = validate_notification(&payload).unwrap();

        assert_eq!(notification.subject, "Hi");
        assert_eq!(notification.priority, Priority::High);
        assert_eq!(notification.content, "line one\nline two");
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(message(&json!([1, 2])), "Request body must be a JSON object");
        assert_eq!(message(&json!("text")), "Request body must be a JSON object");
    }

    #[test]
    fn test_empty_object_reports_first_required_field() {
        assert_eq!(message(&json!({})), "Recipient address is required");
    }

    #[test]
    fn test_missing_fields_in_order() {
        assert_eq!(
            message(&json!({ "recipientAddress": "test@example.com" })),
            "Recipient name is required"
        );
        assert_eq!(
            message(&json!({ "recipientAddress": "test@example.com", "recipientName": "A" })),
            "Content is required"
        );
    }

    #[test]
    fn test_first_error_wins() {
        let payload = json!({
            "recipientAddress": "invalid-email",
            "recipientName": "",
            "content": "",
        });

        assert_eq!(message(&payload), "Please provide a valid email address");
    }

    #[test]
    fn test_invalid_email() {
        for address in [
            "invalid-email",
            "",
            "user@",
            "@example.com",
            "user@localhost",
            "a@b..c",
            "a@b.c",
            "x@1.2",
            "user@[127.0.0.1]",
            "\"john doe\"@example.com",
            "user@exa_mple.com",
            "user@-example.com",
            "user@example-.com",
            "a..b@example.com",
            ".user@example.com",
        ] {
            assert_eq!(
                message(&with("recipientAddress", json!(address))),
                "Please provide a valid email address",
                "{address}"
            );
        }
    }

    #[test]
    fn test_valid_email() {
        for address in [
            "test@example.com",
            "first.last+tag@sub.example.co.uk",
            "o'brien@example.com",
            "user@my-domain.io",
        ] {
            let notification = validate_notification(&with("recipientAddress", json!(address)))
                .unwrap_or_else(|err| panic!("{address}: {err}"));
            assert_eq!(notification.recipient_address.to_string(), address);
        }
    }

    #[test]
    fn test_email_length_limits() {
        let local_part = "x".repeat(65);
        assert_eq!(
            message(&with("recipientAddress", json!(format!("{local_part}@example.com")))),
            "Please provide a valid email address"
        );

        let label = "x".repeat(64);
        assert_eq!(
            message(&with("recipientAddress", json!(format!("user@{label}.com")))),
            "Please provide a valid email address"
        );

        let label = "x".repeat(63);
        let long_domain = [label.as_str(); 4].join(".");
        assert_eq!(
            message(&with("recipientAddress", json!(format!("user@{long_domain}.com")))),
            "Please provide a valid email address"
        );
    }

    #[test]
    fn test_non_string_values() {
        assert_eq!(message(&with("recipientAddress", json!(42))), "Recipient address must be a string");
        assert_eq!(message(&with("recipientName", Value::Null)), "Recipient name must be a string");
        assert_eq!(message(&with("subject", json!(true))), "Subject must be a string");
        assert_eq!(message(&with("priority", json!(1))), "Priority must be a string");
    }

    #[test]
    fn test_recipient_name_length() {
        assert_eq!(message(&with("recipientName", json!(""))), "Recipient name cannot be empty");
        assert_eq!(
            message(&with("recipientName", json!("x".repeat(101)))),
            "Recipient name cannot exceed 100 characters"
        );
        assert!(validate_notification(&with("recipientName", json!("x".repeat(100)))).is_ok());
    }

    #[test]
    fn test_content_length() {
        assert_eq!(message(&with("content", json!(""))), "Content cannot be empty");
        assert_eq!(
            message(&with("content", json!("x".repeat(5001)))),
            "Content cannot exceed 5000 characters"
        );
        assert!(validate_notification(&with("content", json!("x".repeat(5000)))).is_ok());
    }

    #[test]
    fn test_subject_length() {
        assert_eq!(message(&with("subject", json!(""))), "Subject cannot be empty");
        assert_eq!(
            message(&with("subject", json!("x".repeat(201)))),
            "Subject cannot exceed 200 characters"
        );
        assert!(validate_notification(&with("subject", json!("x".repeat(200)))).is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        let name = "é".repeat(100);
        let notification = validate_notification(&with("recipientName", json!(name))).unwrap();

        assert_eq!(notification.recipient_name.chars().count(), 100);
    }

    #[test]
    fn test_priority() {
        assert_eq!(
            validate_notification(&with("priority", json!("low"))).unwrap().priority,
            Priority::Low
        );
        assert_eq!(
            message(&with("priority", json!("urgent"))),
            "Priority must be one of [low, normal, high]"
        );
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(message(&with("cc", json!("x@example.com"))), "\"cc\" is not allowed");
    }

    #[test]
    fn test_known_field_errors_before_unknown_field() {
        let mut payload = with("cc", json!("x@example.com"));
        payload["content"] = json!("");

        assert_eq!(message(&payload), "Content cannot be empty");
    }
}
