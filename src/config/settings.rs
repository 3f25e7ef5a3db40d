//! Client Configuration
//!
//! Immutable, validated settings shared by every request of a client.

use crate::error::{InstantlyError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host used when none is configured
pub const DEFAULT_HOST: &str = "api.instantly.ai";

/// API version used when none is configured
pub const DEFAULT_API_VERSION: u32 = 1;

/// The platform allows at most 10 requests per second per key.
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;

/// Token bucket settings: `requests` tokens every `interval`, holding at most `burst`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    requests: u32,
    #[serde(rename = "interval_ms", with = "millis")]
    interval: Duration,
    #[serde(default = "default_burst")]
    burst: u32,
}

fn default_burst() -> u32 {
    1
}

impl RateLimit {
    /// `requests` calls per `interval`, evenly spaced
    pub fn new(requests: u32, interval: Duration) -> Self {
        Self {
            requests,
            interval,
            burst: default_burst(),
        }
    }

    /// `requests` calls per second
    pub fn per_second(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(1))
    }

    /// Allow up to `burst` calls back to back after an idle period
    pub fn with_burst(mut self, burst: u32) -> Self {
        self.burst = burst;
        self
    }

    /// Tokens added per interval
    pub fn requests(&self) -> u32 {
        self.requests
    }

    /// Length of one refill period
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Bucket capacity
    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Time between two tokens, rounded up to the next nanosecond
    pub fn emission_interval(&self) -> Duration {
        let requests = u128::from(self.requests.max(1));
        let nanos = self.interval.as_nanos().div_ceil(requests);
        u64::try_from(nanos)
            .map(Duration::from_nanos)
            .unwrap_or(Duration::MAX)
    }

    fn validate(&self) -> Result<()> {
        if self.requests == 0 {
            return Err(InstantlyError::Config(
                "rate limit must allow at least one request per interval".to_string(),
            ));
        }
        if self.interval.is_zero() {
            return Err(InstantlyError::Config(
                "rate limit interval must be longer than zero".to_string(),
            ));
        }
        if self.burst == 0 {
            return Err(InstantlyError::Config(
                "rate limit burst must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::per_second(DEFAULT_REQUESTS_PER_SECOND)
    }
}

/// Validated client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    host: String,
    api_version: u32,
    rate_limit: RateLimit,
}

impl ClientConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// API host with an optional port
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Version segment of the base URL
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Token bucket settings
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// `https://{host}/api/v{version}/`
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!("https://{}/api/v{}/", self.host, self.api_version);
        Url::parse(&raw).map_err(|e| InstantlyError::Config(format!("invalid base URL: {}", e)))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_version: DEFAULT_API_VERSION,
            rate_limit: RateLimit::default(),
        }
    }
}

/// Config files express the interval in whole milliseconds
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Builder for [`ClientConfig`]; all checks run in [`ClientConfigBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    host: Option<String>,
    api_version: Option<u32>,
    rate_limit: Option<RateLimit>,
}

impl ClientConfigBuilder {
    /// Override the API host, e.g. `api.instantly.ai` or `localhost:8080`
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the API version
    pub fn api_version(mut self, version: u32) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Override the rate limit
    pub fn rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Validate and produce the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let host = self.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
        validate_host(&host)?;

        let api_version = self.api_version.unwrap_or(DEFAULT_API_VERSION);
        if api_version == 0 {
            return Err(InstantlyError::Config(
                "API version must be 1 or greater".to_string(),
            ));
        }

        let rate_limit = self.rate_limit.unwrap_or_default();
        rate_limit.validate()?;

        Ok(ClientConfig {
            host,
            api_version,
            rate_limit,
        })
    }
}

/// Accept a bare URL authority: a host with an optional port.
fn validate_host(host: &str) -> Result<()> {
    let invalid = |reason: &str| InstantlyError::Config(format!("invalid host '{}': {}", host, reason));

    if host.is_empty() {
        return Err(invalid("host is empty"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    if host.contains("://") {
        return Err(invalid("must not include a scheme"));
    }
    if host.contains(['/', '?', '#', '@']) {
        return Err(invalid("must be a host with an optional port"));
    }

    let url = Url::parse(&format!("https://{}", host)).map_err(|e| invalid(&e.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("no host name"));
    }
    Ok(())
}
