//! Error types for the table client.
//!
//! # Design
//! Every failure observed on the wire carries the same `HttpFailure` record;
//! the enum variant is only a narrower classification of it. Callers that do
//! not care about the variant can branch on `ApiError::status()` alone.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// A response body as the executor saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body of an `application/json` response that parsed successfully.
    Json(Value),
    /// Any other non-empty body, kept verbatim.
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }
}

/// The field set shared by every HTTP-family error.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub message: String,
    pub details: Option<Payload>,
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Discriminant of an `ApiError`, handy for logging and table-driven tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Http,
    Auth,
    NotFound,
    Validation,
    RateLimit,
    Network,
    Configuration,
    Encode,
    Decode,
}

/// Errors returned by `TableClient`, `TableRepository` and the pagination driver.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx status without a narrower classification, including the
    /// synthetic 408 produced on timeout.
    #[error("{0}")]
    Http(HttpFailure),

    /// 401 or 403.
    #[error("{0}")]
    Auth(HttpFailure),

    /// 404.
    #[error("{0}")]
    NotFound(HttpFailure),

    /// 422. `details` carries the upstream payload describing the bad input.
    #[error("{0}")]
    Validation(HttpFailure),

    /// 429.
    #[error("{0}")]
    RateLimit(HttpFailure),

    /// Transport-level failure, reported with a synthetic 503.
    #[error("{0}")]
    Network(HttpFailure),

    /// Invalid client construction or a pagination ceiling breach.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(String),

    /// A successful response did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Http(_) => ErrorKind::Http,
            ApiError::Auth(_) => ErrorKind::Auth,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::RateLimit(_) => ErrorKind::RateLimit,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Configuration(_) => ErrorKind::Configuration,
            ApiError::Encode(_) => ErrorKind::Encode,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// The wire-level fields, for every variant that has them.
    pub fn http(&self) -> Option<&HttpFailure> {
        match self {
            ApiError::Http(f)
            | ApiError::Auth(f)
            | ApiError::NotFound(f)
            | ApiError::Validation(f)
            | ApiError::RateLimit(f)
            | ApiError::Network(f) => Some(f),
            ApiError::Configuration(_) | ApiError::Encode(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.http().map(|f| f.status)
    }
}
