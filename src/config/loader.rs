//! Configuration Loader
//!
//! Assembles client settings from config files and environment variables.

use crate::config::settings::{ClientConfig, RateLimit};
use crate::error::{InstantlyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "INSTANTLY_API_KEY";

/// Environment variable overriding the host
pub const HOST_ENV: &str = "INSTANTLY_HOST";

/// Environment variable overriding the API version
pub const API_VERSION_ENV: &str = "INSTANTLY_API_VERSION";

/// Environment variable pointing at an extra config file
pub const CONFIG_PATH_ENV: &str = "INSTANTLY_CONFIG_PATH";

/// On-disk configuration; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: ConfigFile,
}

impl ConfigLoader {
    /// Load from the default file locations, then apply environment overrides
    pub fn new() -> Result<Self> {
        // A missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let mut loader = Self::default();
        loader.load_from_default_paths()?;
        loader.apply_env();
        Ok(loader)
    }

    /// Load a specific config file, ignoring the environment
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut loader = Self::default();
        loader.load_from_file(path)?;
        Ok(loader)
    }

    fn load_from_default_paths(&mut self) -> Result<()> {
        for path in Self::get_config_paths() {
            if path.exists() {
                self.load_from_file(&path)?;
            }
        }
        Ok(())
    }

    /// Config paths in increasing priority
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".instantly").join("config.json"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("instantly").join("config.json"));
        }

        paths.push(PathBuf::from("instantly.json"));

        if let Ok(custom_path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(custom_path));
        }

        paths
    }

    fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            InstantlyError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| {
            InstantlyError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        self.merge(file);
        Ok(())
    }

    fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `INSTANTLY_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.file.api_key = Some(key);
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.file.host = Some(host);
        }
        if let Some(version) = lookup(API_VERSION_ENV) {
            match version.trim().parse() {
                Ok(version) => self.file.api_version = Some(version),
                Err(_) => tracing::warn!(
                    value = %version,
                    "ignoring {} that is not a positive integer",
                    API_VERSION_ENV
                ),
            }
        }
    }

    /// Merge another source into this one; fields set in `other` win
    pub fn merge(&mut self, other: ConfigFile) {
        if other.api_key.is_some() {
            self.file.api_key = other.api_key;
        }
        if other.host.is_some() {
            self.file.host = other.host;
        }
        if other.api_version.is_some() {
            self.file.api_version = other.api_version;
        }
        if other.rate_limit.is_some() {
            self.file.rate_limit = other.rate_limit;
        }
    }

    /// The API key, if any source provided one
    pub fn api_key(&self) -> Option<&str> {
        self.file.api_key.as_deref()
    }

    /// Validate the merged settings
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut builder = ClientConfig::builder();
        if let Some(host) = &self.file.host {
            builder = builder.host(host.clone());
        }
        if let Some(version) = self.file.api_version {
            builder = builder.api_version(version);
        }
        if let Some(rate_limit) = self.file.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }
        builder.build()
    }

    /// Split into the API key and validated settings
    pub fn into_parts(self) -> Result<(String, ClientConfig)> {
        let config = self.client_config()?;
        let api_key = self.file.api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            InstantlyError::Config(format!(
                "No API key configured. Set {} or add \"api_key\" to instantly.json",
                API_KEY_ENV
            ))
        })?;
        Ok((api_key, config))
    }
}
