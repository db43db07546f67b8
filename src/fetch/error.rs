//! Fetch error types.

use thiserror::Error;

/// Explanation shown when the backend cannot be reached at all.
pub const NETWORK_HINT: &str = "Failed to fetch data from the API. The backend may be unreachable, \
the API base URL may be wrong, or the gateway may be rejecting cross-origin requests. \
Check connectivity and the gateway's CORS configuration.";

/// Errors raised while fetching records from the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error: status {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Body(String),
}

impl FetchError {
    /// Text stored in the view state for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(cause) => format!("{} ({})", NETWORK_HINT, cause),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_connect() || e.is_request() || e.is_timeout() {
            FetchError::Network(e.to_string())
        } else {
            FetchError::Body(e.to_string())
        }
    }
}

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid API base URL {url}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
