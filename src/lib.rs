//! Instantly - async client for the Instantly outreach API
//!
//! One typed method per endpoint for campaigns, leads, accounts and
//! blocklists. Every call goes through a shared, rate-limited transport that
//! attaches the API key and checks the `status` string the API embeds in its
//! responses.
//!
//! ```no_run
//! use instantly::{InstantlyClient, RateLimit};
//!
//! # async fn run() -> instantly::Result<()> {
//! let client = InstantlyClient::builder("my-api-key")
//!     .rate_limit(RateLimit::per_second(5))
//!     .build()?;
//!
//! for campaign in client.list_campaigns().await? {
//!     println!("{} {}", campaign.id, campaign.name);
//! }
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::{
    Account, AccountName, AccountPayload, AccountVitals, AccountVitalsReport, AddLeadsResult,
    BlocklistUpdate, Campaign, CampaignCount, CampaignLead, CampaignSchedule, CampaignSummary,
    Lead, LeadStatus, Timing, WarmupAdvanced, WarmupSettings,
};
pub use client::{HttpBackend, HttpClient, RateLimiter, ReqwestBackend};
pub use config::{ClientConfig, ClientConfigBuilder, ConfigLoader, RateLimit};
pub use error::{InstantlyError, Result};

use api::status::{decode_checked, StatusResponse};

/// The main Instantly client
#[derive(Debug)]
pub struct InstantlyClient {
    /// Settings the client was built with
    config: ClientConfig,

    /// Rate-limited transport
    http: HttpClient,
}

impl InstantlyClient {
    /// Create a client with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a client from validated settings
    pub fn with_config(api_key: impl Into<String>, config: ClientConfig) -> Result<Self> {
        Self::builder(api_key).config(config).build()
    }

    /// Create a client from config files and `INSTANTLY_*` environment variables
    pub fn from_env() -> Result<Self> {
        let (api_key, config) = ConfigLoader::new()?.into_parts()?;
        Self::with_config(api_key, config)
    }

    /// Start building a client
    pub fn builder(api_key: impl Into<String>) -> InstantlyClientBuilder {
        InstantlyClientBuilder {
            api_key: api_key.into(),
            config: ClientConfig::builder(),
            backend: None,
        }
    }

    /// Get the client settings
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Check the API key, returning the workspace name
    pub async fn authenticate(&self) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct Workspace {
            workspace_name: String,
        }

        let workspace: Workspace = self.read("authenticate", &[]).await?;
        Ok(workspace.workspace_name)
    }

    /// GET `endpoint`, check the embedded status and decode the body
    pub(crate) async fn read<R>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let body = self.http.read(endpoint, params).await?;
        decode_checked(endpoint, &body)
    }

    /// POST `payload` to `endpoint`, check the embedded status and decode the body
    pub(crate) async fn write<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.http.write(endpoint, payload).await?;
        decode_checked(endpoint, &body)
    }

    /// POST to an endpoint that only answers with a status
    pub(crate) async fn write_for_status<T>(&self, endpoint: &str, payload: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let _: StatusResponse = self.write(endpoint, payload).await?;
        Ok(())
    }
}

/// Builder for [`InstantlyClient`]
pub struct InstantlyClientBuilder {
    api_key: String,
    config: ClientConfigBuilder,
    backend: Option<Arc<dyn HttpBackend>>,
}

impl InstantlyClientBuilder {
    /// Override the API host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config = self.config.host(host);
        self
    }

    /// Override the API version (must be at least 1)
    pub fn api_version(mut self, version: u32) -> Self {
        self.config = self.config.api_version(version);
        self
    }

    /// Override the rate limit
    pub fn rate_limit(mut self, rate_limit: RateLimit) -> Self {
        self.config = self.config.rate_limit(rate_limit);
        self
    }

    /// Replace all settings with an already validated configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = ClientConfig::builder()
            .host(config.host())
            .api_version(config.api_version())
            .rate_limit(config.rate_limit());
        self
    }

    /// Send requests through a caller-configured reqwest client
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.backend(Arc::new(ReqwestBackend::with_client(client)))
    }

    /// Send requests through a custom backend
    pub fn backend(mut self, backend: Arc<dyn HttpBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validate the settings and create the client
    pub fn build(self) -> Result<InstantlyClient> {
        let config = self.config.build()?;
        let backend = match self.backend {
            Some(backend) => backend,
            None => Arc::new(ReqwestBackend::new()?),
        };
        let http = HttpClient::new(self.api_key, &config, backend)?;

        tracing::debug!(
            base_url = http.base_url().as_str(),
            requests = config.rate_limit().requests(),
            interval_ms = config.rate_limit().interval().as_millis() as u64,
            "created Instantly client"
        );

        Ok(InstantlyClient { config, http })
    }
}
