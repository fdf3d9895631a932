//! Request builder and response parser for the homework-status API.
//!
//! # Design
//! `PracticumClient` holds the endpoint and token and nothing else. The poll
//! loop calls `build_homework_statuses`, hands the request to its
//! `Transport`, then feeds the response to `parse_homework_statuses`. There
//! are no retries here; the next poll cycle is the retry.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, ErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Longest body prefix kept in the debug log for a non-200 response.
const LOGGED_BODY_LIMIT: usize = 512;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Keys whose presence in a 200 body means the service rejected the request.
const DENIAL_KEYS: [&str; 2] = ["code", "error"];

/// Stateless client for the homework-status endpoint.
#[derive(Debug, Clone)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET the statuses updated since `from_date` (unix seconds).
    pub fn build_homework_statuses(&self, from_date: i64) -> HttpRequest {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{separator}from_date={from_date}", self.endpoint),
            headers: vec![("Authorization".to_string(), format!("OAuth {}", self.token))],
            body: None,
        }
    }

    /// Decode a homework-status response.
    ///
    /// The returned value has not been shape-checked; see
    /// `response::check_response`.
    pub fn parse_homework_statuses(&self, response: HttpResponse) -> Result<Value, Error> {
        check_status(&response)?;
        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| Error::new(ErrorKind::InvalidJson, format!("homework statuses: {e}")))?;
        check_denial(&body)?;
        Ok(body)
    }
}

fn check_status(response: &HttpResponse) -> Result<(), Error> {
    if response.status == 200 {
        return Ok(());
    }
    // Detail depends on the status only; repeated failures are compared by it.
    debug!(status = response.status, body = %body_prefix(&response.body), "unexpected homework status response");
    Err(Error::new(
        ErrorKind::UnexpectedStatusCode,
        format!("endpoint returned HTTP {}", response.status),
    ))
}

fn body_prefix(body: &str) -> &str {
    let body = body.trim();
    match body.char_indices().nth(LOGGED_BODY_LIMIT) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

fn check_denial(body: &Value) -> Result<(), Error> {
    let Some(map) = body.as_object() else {
        return Ok(());
    };
    if !DENIAL_KEYS.iter().any(|key| map.contains_key(*key)) {
        return Ok(());
    }
    let fields: Vec<String> = DENIAL_KEYS
        .iter()
        .filter_map(|key| map.get(*key).map(|value| format!("{key}={}", display_value(value))))
        .collect();
    Err(Error::new(ErrorKind::ServiceDenied, fields.join(", ")))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PracticumClient {
        PracticumClient::new("http://localhost:3000/api/user_api/homework_statuses/", "secret")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_homework_statuses_produces_correct_request() {
        let req = client().build_homework_statuses(1_700_000_000);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/user_api/homework_statuses/?from_date=1700000000"
        );
        assert_eq!(req.header("authorization"), Some("OAuth secret"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_appends_to_existing_query() {
        let client = PracticumClient::new("http://localhost:3000/statuses/?lang=en", "secret");
        let req = client.build_homework_statuses(1000);
        assert_eq!(req.path, "http://localhost:3000/statuses/?lang=en&from_date=1000");
    }

    #[test]
    fn parse_success_returns_body() {
        let body = client()
            .parse_homework_statuses(response(
                200,
                r#"{"homeworks":[{"homework_name":"proj1","status":"approved"}],"current_date":1000}"#,
            ))
            .unwrap();
        assert_eq!(body["current_date"], 1000);
        assert_eq!(body["homeworks"][0]["status"], "approved");
    }

    #[test]
    fn parse_wrong_status() {
        let err = client()
            .parse_homework_statuses(response(503, "Service Unavailable"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedStatusCode);
        assert_eq!(err.detail(), "endpoint returned HTTP 503");
    }

    #[test]
    fn wrong_status_detail_ignores_body() {
        let page = |id: &str| format!("<html><!-- request {id} --><body>{}</body></html>", "x".repeat(5000));
        let first = client().parse_homework_statuses(response(503, &page("a1"))).unwrap_err();
        let second = client().parse_homework_statuses(response(503, &page("b2"))).unwrap_err();
        assert_eq!(first, second);
        assert!(first.to_string().len() < 100);
    }

    #[test]
    fn body_prefix_is_bounded() {
        let long = "é".repeat(LOGGED_BODY_LIMIT + 10);
        assert_eq!(body_prefix(&long).chars().count(), LOGGED_BODY_LIMIT);
        assert_eq!(body_prefix("  short \n"), "short");
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_homework_statuses(response(200, "not json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidJson);
    }

    #[test]
    fn parse_denial_embeds_both_fields() {
        let err = client()
            .parse_homework_statuses(response(
                200,
                r#"{"code":"UnknownError","error":"Wrong from_date format"}"#,
            ))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceDenied);
        assert!(err.detail().contains("UnknownError"));
        assert!(err.detail().contains("Wrong from_date format"));
    }

    #[test]
    fn parse_denial_with_single_key() {
        let err = client()
            .parse_homework_statuses(response(200, r#"{"code":"not_authenticated"}"#))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceDenied);
        assert_eq!(err.detail(), "code=not_authenticated");
    }

    #[test]
    fn parse_leaves_non_mapping_to_validator() {
        let body = client().parse_homework_statuses(response(200, "[]")).unwrap();
        assert!(body.is_array());
    }
}
