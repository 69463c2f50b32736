//! Single-request execution: auth headers, timeout, body parsing and
//! error classification.
//!
//! # Design
//! Each call owns its own `tokio::time::timeout`. Dropping the timeout
//! future on any exit path drops the timer with it, so no cancellation is
//! ever left pending and concurrent calls on one client never share a
//! deadline.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::{classify, normalize_message};
use crate::error::{ApiError, HttpFailure, Payload};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Status reported when the per-request deadline fires.
pub const TIMEOUT_STATUS: u16 = 408;

/// Status reported for transport-level failures.
pub const NETWORK_STATUS: u16 = 503;

/// What the executor needs from the client configuration.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions<'a> {
    pub token: &'a str,
    pub timeout: Duration,
}

/// Execute one request and return its parsed body.
///
/// `Ok(None)` means a successful response with an empty body.
pub async fn execute<T: Transport>(
    transport: &T,
    method: HttpMethod,
    url: &str,
    options: RequestOptions<'_>,
    body: Option<&Value>,
) -> Result<Option<Payload>, ApiError> {
    let request = build_request(method, url, options.token, body)?;
    let started = Instant::now();
    debug!(%method, url, "dispatching request");

    let response = match tokio::time::timeout(options.timeout, transport.send(request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(TransportError::Timeout)) | Err(_) => {
            let timeout_ms = options.timeout.as_millis() as u64;
            warn!(%method, url, timeout_ms, "request timed out");
            return Err(timeout_error(url, timeout_ms));
        }
        Ok(Err(err)) => {
            warn!(%method, url, error = %err, "transport failure");
            return Err(network_error(url, err));
        }
    };

    debug!(
        %method,
        url,
        status = response.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "response received"
    );
    interpret(url, response)
}

fn build_request(
    method: HttpMethod,
    url: &str,
    token: &str,
    body: Option<&Value>,
) -> Result<HttpRequest, ApiError> {
    let body = body
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url: url.to_string(),
        headers: vec![
            ("authorization".to_string(), format!("Bearer {token}")),
            ("content-type".to_string(), "application/json".to_string()),
        ],
        body,
    })
}

/// Turn a completed response into a payload or a classified error.
pub(crate) fn interpret(url: &str, response: HttpResponse) -> Result<Option<Payload>, ApiError> {
    let payload = parse_body(&response);

    if !response.is_success() {
        let message = normalize_message(response.status, &response.status_text, payload.as_ref());
        return Err(classify(HttpFailure {
            status: response.status,
            status_text: response.status_text,
            url: url.to_string(),
            message,
            details: payload,
        }));
    }

    Ok(payload)
}

/// JSON is only attempted when the content type says so. A JSON body that
/// fails to parse is kept as text, never reported as an error, so plain-text
/// error pages fall through to the status-line message.
fn parse_body(response: &HttpResponse) -> Option<Payload> {
    let is_json = response
        .header("content-type")
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        if let Ok(value) = serde_json::from_str::<Value>(&response.body) {
            return Some(Payload::Json(value));
        }
    }
    if response.body.is_empty() {
        None
    } else {
        Some(Payload::Text(response.body.clone()))
    }
}

fn timeout_error(url: &str, timeout_ms: u64) -> ApiError {
    ApiError::Http(HttpFailure {
        status: TIMEOUT_STATUS,
        status_text: "Request Timeout".to_string(),
        url: url.to_string(),
        message: format!("Request timed out after {timeout_ms}ms"),
        details: None,
    })
}

fn network_error(url: &str, err: TransportError) -> ApiError {
    let cause = err.to_string();
    ApiError::Network(HttpFailure {
        status: NETWORK_STATUS,
        status_text: "Service Unavailable".to_string(),
        url: url.to_string(),
        message: format!("Network error: {cause}"),
        details: Some(Payload::Text(cause)),
    })
}
