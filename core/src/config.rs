//! Client configuration.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

/// Root used when the caller does not override it.
pub const DEFAULT_API_ROOT: &str = "https://api.airtable.com/v0";

/// Per-request timeout used when the caller does not override it.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Settings bound into a `TableClient` at construction.
///
/// The token is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    token: String,
    base_id: String,
    api_root: String,
    timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_id: base_id.into(),
            api_root: DEFAULT_API_ROOT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Reject configurations that could never authenticate.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.token.trim().is_empty() {
            return Err(ApiError::Configuration("an API token is required".to_string()));
        }
        if self.base_id.trim().is_empty() {
            return Err(ApiError::Configuration("a base id is required".to_string()));
        }
        Ok(())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_id(&self) -> &str {
        &self.base_id
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("api_root", &self.api_root)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
