//! Error message normalization and status-to-kind classification.

use crate::error::{ApiError, HttpFailure, Payload};

/// Build a human-readable message from a failed response.
///
/// Recognizes the `{"error": {"type": T, "message": M}}` envelope and yields
/// `"T: M"`, or just `"M"` when no type is given. Anything else falls back to
/// `"{status} {status_text}"`.
pub fn normalize_message(status: u16, status_text: &str, body: Option<&Payload>) -> String {
    let error = body
        .and_then(Payload::as_json)
        .and_then(|v| v.get("error"))
        .filter(|e| e.is_object());

    if let Some(error) = error {
        let message = error.get("message").and_then(|m| m.as_str());
        let kind = error.get("type").and_then(|t| t.as_str());
        match (kind, message) {
            (Some(kind), Some(message)) => return format!("{kind}: {message}"),
            (None, Some(message)) => return message.to_string(),
            _ => {}
        }
    }

    format!("{status} {status_text}").trim().to_string()
}

/// Refine a generic HTTP failure into its specialized kind.
///
/// 408 deliberately stays generic: it is how timeouts are reported.
pub fn classify(failure: HttpFailure) -> ApiError {
    match failure.status {
        401 | 403 => ApiError::Auth(failure),
        404 => ApiError::NotFound(failure),
        422 => ApiError::Validation(failure),
        429 => ApiError::RateLimit(failure),
        _ => ApiError::Http(failure),
    }
}
