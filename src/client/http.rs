//! HTTP Transport
//!
//! Builds endpoint URLs, attaches the API key, applies the rate limit and hands
//! the request to an [`HttpBackend`]. Reads put the key in the query string,
//! writes merge it into the top-level JSON body.

use crate::client::rate_limiter::RateLimiter;
use crate::config::ClientConfig;
use crate::error::{InstantlyError, Result};
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request, Url};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Longest body excerpt quoted in an HTTP status error
const ERROR_BODY_LIMIT: usize = 500;

/// Executes a fully built request and returns the response body
pub trait HttpBackend: Send + Sync {
    /// Send `request` and return the body of a 2xx response
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Bytes>>;
}

/// Default backend on top of `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    /// Create a backend with a pooled client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| InstantlyError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap a caller-configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpBackend for ReqwestBackend {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Bytes>> {
        async move {
            let response = self.client.execute(request).await?;
            let status = response.status();
            let body = response.bytes().await?;

            if !status.is_success() {
                let text = String::from_utf8_lossy(&body);
                let excerpt: String = text.chars().take(ERROR_BODY_LIMIT).collect();
                return Err(InstantlyError::Transport(format!(
                    "Request failed with status {}: {}",
                    status, excerpt
                )));
            }

            Ok(body)
        }
        .boxed()
    }
}

/// Rate-limited transport bound to one host, API version and key
pub struct HttpClient {
    base_url: Url,
    api_key: String,
    rate_limiter: RateLimiter,
    backend: Arc<dyn HttpBackend>,
}

impl HttpClient {
    /// Create a transport for the given configuration
    pub fn new(
        api_key: impl Into<String>,
        config: &ClientConfig,
        backend: Arc<dyn HttpBackend>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url()?,
            api_key: api_key.into(),
            rate_limiter: RateLimiter::new(config.rate_limit()),
            backend,
        })
    }

    /// `https://{host}/api/v{version}/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the rate limiter
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| InstantlyError::Transport(format!("Invalid endpoint path '{}': {}", path, e)))
    }

    /// Build the GET request for `path`, with `api_key` first and `params` after it in order
    pub fn build_read(&self, path: &str, params: &[(&str, &str)]) -> Result<Request> {
        let mut url = self.endpoint_url(path)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        Ok(Request::new(Method::GET, url))
    }

    /// Build the POST request for `path`, merging `api_key` into the body
    pub fn build_write<T>(&self, path: &str, body: &T) -> Result<Request>
    where
        T: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path)?;

        let mut object = match serde_json::to_value(body) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(serde_json::Value::Null) => serde_json::Map::new(),
            Ok(other) => {
                return Err(InstantlyError::Transport(format!(
                    "Request body for '{}' must be a JSON object, got {}",
                    path,
                    json_kind(&other)
                )))
            }
            Err(e) => {
                return Err(InstantlyError::Transport(format!(
                    "Failed to serialize request body for '{}': {}",
                    path, e
                )))
            }
        };
        object.insert(
            "api_key".to_string(),
            serde_json::Value::String(self.api_key.clone()),
        );

        let payload = serde_json::to_vec(&object).map_err(|e| {
            InstantlyError::Transport(format!("Failed to serialize request body for '{}': {}", path, e))
        })?;

        let mut request = Request::new(Method::POST, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *request.body_mut() = Some(payload.into());
        Ok(request)
    }

    /// GET `path` and return the raw body
    pub async fn read(&self, path: &str, params: &[(&str, &str)]) -> Result<Bytes> {
        let request = self.build_read(path, params)?;
        self.dispatch(path, request).await
    }

    /// POST `body` (plus `api_key`) to `path` and return the raw body
    pub async fn write<T>(&self, path: &str, body: &T) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        let request = self.build_write(path, body)?;
        self.dispatch(path, request).await
    }

    async fn dispatch(&self, path: &str, request: Request) -> Result<Bytes> {
        self.rate_limiter.acquire().await;
        tracing::debug!(method = %request.method(), endpoint = path, "dispatching request");

        let body = self.backend.execute(request).await?;
        tracing::debug!(endpoint = path, bytes = body.len(), "received response");
        Ok(body)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
