//! Instantly Error Types
//!
//! Error handling for the Instantly API client.

use thiserror::Error;

/// Main error type for Instantly operations
#[derive(Debug, Error)]
pub enum InstantlyError {
    /// Configuration errors (invalid host, API version, rate limit, config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request could not be built, sent, or its body read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode response from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A date, time, timezone or weekday key could not be converted
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The API answered with an embedded status other than "success"
    #[error("'{endpoint}' returned status '{status}'")]
    Status { endpoint: String, status: String },

    /// A lookup by unique key matched nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// A lookup by unique key matched more than one record
    #[error("Expected a single {what}, found {count}")]
    Ambiguous { what: String, count: usize },
}

impl InstantlyError {
    pub(crate) fn decode(endpoint: &str, source: serde_json::Error) -> Self {
        InstantlyError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// True for failures reported inside a successful HTTP response
    pub fn is_status(&self) -> bool {
        matches!(self, InstantlyError::Status { .. })
    }
}

impl From<reqwest::Error> for InstantlyError {
    fn from(err: reqwest::Error) -> Self {
        // Read URLs carry the API key in their query string.
        let err = err.without_url();
        if err.is_timeout() {
            InstantlyError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            InstantlyError::Transport(format!("Connection failed: {}", err))
        } else if err.is_body() || err.is_decode() {
            InstantlyError::Transport(format!("Failed to read response body: {}", err))
        } else {
            InstantlyError::Transport(err.to_string())
        }
    }
}

/// Result type alias for Instantly operations
pub type Result<T> = std::result::Result<T, InstantlyError>;
