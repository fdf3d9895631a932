//! Error types for the polling core.
//!
//! # Design
//! Every recoverable failure is one `Error` carrying an `ErrorKind` and a
//! human-readable detail. The poll loop handles all kinds the same way
//! while tests still match on the category. Fatal
//! configuration problems live in `config::ConfigError` instead.

use std::fmt;

/// Failure category of a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transport could not complete the request.
    ConnectionFailure,

    /// The server answered with a status other than the expected one.
    UnexpectedStatusCode,

    /// The service answered 200 but the body reports a rejection.
    ServiceDenied,

    /// The body is not valid JSON.
    InvalidJson,

    /// The body or a record has the wrong shape.
    MalformedResponse,

    /// A required key is absent.
    MissingField,

    /// The homework status is not in the catalog.
    UnknownStatus,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::ConnectionFailure => "connection failure",
            ErrorKind::UnexpectedStatusCode => "unexpected status code",
            ErrorKind::ServiceDenied => "service denied the request",
            ErrorKind::InvalidJson => "invalid JSON",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::MissingField => "missing field",
            ErrorKind::UnknownStatus => "unknown homework status",
        };
        f.write_str(text)
    }
}

/// A categorized poll-cycle failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct Error {
    kind: ErrorKind,
    detail: String,
}

impl Error {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn connection(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConnectionFailure, detail)
    }

    pub fn missing_field(field: &str, context: &str) -> Self {
        Self::new(ErrorKind::MissingField, format!("{context} has no `{field}` key"))
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, detail)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}
