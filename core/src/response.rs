//! Shape checks for the homework-status payload.
//!
//! # Design
//! The payload stays a `serde_json::Value` until it has been checked. Typed
//! deserialization would collapse "not a list" and "key absent" into one
//! error, and callers need to tell them apart.

use serde_json::Value;

use crate::error::{Error, ErrorKind};
use crate::status::HomeworkStatus;

/// Return the `homeworks` sequence of a decoded API response.
///
/// Only the container is checked; individual records are left to
/// `parse_status`. An empty list is valid.
pub fn check_response(response: &Value) -> Result<&[Value], Error> {
    let map = response
        .as_object()
        .ok_or_else(|| Error::malformed(format!("API response is not a mapping: {}", type_name(response))))?;
    let homeworks = map
        .get("homeworks")
        .ok_or_else(|| Error::missing_field("homeworks", "API response"))?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::malformed(format!("`homeworks` is not a list: {}", type_name(homeworks))))
}

/// Render the notification text for one homework record.
pub fn parse_status(homework: &Value) -> Result<String, Error> {
    let record = homework
        .as_object()
        .ok_or_else(|| Error::malformed(format!("homework record is not a mapping: {}", type_name(homework))))?;

    let name = string_field(record, "homework_name")?;
    let code = string_field(record, "status")?;
    let status = HomeworkStatus::from_code(code).ok_or_else(|| {
        Error::new(
            ErrorKind::UnknownStatus,
            format!("homework \"{name}\" has undocumented status \"{code}\""),
        )
    })?;

    Ok(format!(
        "Review status changed for \"{name}\". {}",
        status.verdict()
    ))
}

/// The server-side timestamp of the response, if it carries an integer one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

fn string_field<'a>(record: &'a serde_json::Map<String, Value>, field: &str) -> Result<&'a str, Error> {
    let value = record
        .get(field)
        .ok_or_else(|| Error::missing_field(field, "homework record"))?;
    value
        .as_str()
        .ok_or_else(|| Error::malformed(format!("`{field}` is not a string: {}", type_name(value))))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn check_response_returns_homeworks() {
        let response = json!({
            "homeworks": [{"homework_name": "proj1", "status": "approved"}],
            "current_date": 1000
        });
        let homeworks = check_response(&response).unwrap();
        assert_eq!(homeworks.len(), 1);
        assert_eq!(homeworks[0]["homework_name"], "proj1");
    }

    #[test]
    fn check_response_accepts_empty_list() {
        let response = json!({"homeworks": []});
        assert!(check_response(&response).unwrap().is_empty());
    }

    #[test]
    fn check_response_rejects_non_mapping() {
        for response in [json!([]), json!("homeworks"), json!(null), json!(42)] {
            let err = check_response(&response).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse, "{response}");
        }
    }

    #[test]
    fn check_response_requires_homeworks_key() {
        let err = check_response(&json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    // `current_date` alone used to satisfy the presence check; it must not.
    #[test]
    fn check_response_requires_homeworks_even_with_current_date() {
        let err = check_response(&json!({"current_date": 1000})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn check_response_rejects_non_list_homeworks() {
        for homeworks in [json!({}), json!("proj1"), json!(null), json!(1)] {
            let err = check_response(&json!({ "homeworks": homeworks })).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        }
    }

    #[test]
    fn parse_status_embeds_name_and_verdict() {
        for status in HomeworkStatus::ALL {
            let message = parse_status(&json!({"homework_name": "hw_bot", "status": status.code()})).unwrap();
            assert!(message.contains("hw_bot"), "{message}");
            assert!(message.contains(status.verdict()), "{message}");
        }
    }

    #[test]
    fn parse_status_formats_approved_message() {
        let message = parse_status(&json!({"homework_name": "proj1", "status": "approved"})).unwrap();
        assert_eq!(
            message,
            "Review status changed for \"proj1\". The work has been reviewed: the reviewer liked everything. Hooray!"
        );
    }

    #[test]
    fn parse_status_rejects_unknown_status() {
        let err = parse_status(&json!({"homework_name": "proj1", "status": "lost"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownStatus);
        assert!(err.detail().contains("lost"));
    }

    #[test]
    fn parse_status_requires_both_keys() {
        let err = parse_status(&json!({"status": "approved"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.detail().contains("homework_name"));

        let err = parse_status(&json!({"homework_name": "proj1"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert!(err.detail().contains("status"));
    }

    #[test]
    fn parse_status_rejects_wrong_types() {
        let err = parse_status(&json!(["proj1", "approved"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);

        let err = parse_status(&json!({"homework_name": 7, "status": "approved"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn current_date_reads_integers_only() {
        assert_eq!(current_date(&json!({"current_date": 1000})), Some(1000));
        assert_eq!(current_date(&json!({"current_date": "1000"})), None);
        assert_eq!(current_date(&json!({"homeworks": []})), None);
    }
}
