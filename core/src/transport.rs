//! Ureq-backed transport.
//!
//! ureq is blocking, so each request runs on tokio's blocking pool. The
//! agent carries the same deadline as the executor; if the executor's timer
//! fires first the in-flight call is abandoned and ureq's own timeout tears
//! the socket down shortly after.

use std::io::{self, Read as _};
use std::time::Duration;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// A [`Transport`] implementation backed by [`ureq`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Status codes are classified by the executor.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || run_blocking(&agent, request))
            .await
            .map_err(|e| TransportError::Other(format!("transport task failed: {e}")))?
    }
}

fn run_blocking(agent: &ureq::Agent, request: HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = http::Request::builder()
        .method(to_http_method(request.method))
        .uri(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let result = match request.body {
        Some(body) => {
            let req = builder
                .body(body.into_bytes())
                .map_err(|e| TransportError::Other(e.to_string()))?;
            agent.run(req)
        }
        None => {
            let req = builder
                .body(())
                .map_err(|e| TransportError::Other(e.to_string()))?;
            agent.run(req)
        }
    };

    match result {
        Ok(response) => convert_response(response),
        Err(ureq::Error::Timeout(_)) => Err(TransportError::Timeout),
        Err(ureq::Error::HostNotFound) => Err(TransportError::Connection("host not found".to_string())),
        Err(ureq::Error::Io(e)) => Err(TransportError::Connection(e.to_string())),
        Err(e) => Err(TransportError::Other(e.to_string())),
    }
}

fn to_http_method(method: HttpMethod) -> http::Method {
    match method {
        HttpMethod::Get => http::Method::GET,
        HttpMethod::Post => http::Method::POST,
        HttpMethod::Patch => http::Method::PATCH,
        HttpMethod::Delete => http::Method::DELETE,
    }
}

fn convert_response(response: http::Response<ureq::Body>) -> Result<HttpResponse, TransportError> {
    let (parts, body) = response.into_parts();

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    // Unlimited read; bytes that are not UTF-8 are replaced rather than
    // failing a response that already has a status.
    let mut bytes = Vec::new();
    body.into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| match e.kind() {
            io::ErrorKind::TimedOut => TransportError::Timeout,
            _ => TransportError::Connection(e.to_string()),
        })?;

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        // The http crate drops the server's reason phrase.
        status_text: parts.status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
