//! Response Status
//!
//! The API reports many failures as HTTP 200 with a `status` string in the
//! body. Anything other than `"success"` is an application error.

use crate::error::{InstantlyError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The value the API uses for a successful call
pub const SUCCESS: &str = "success";

/// Body of endpoints that only report a status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusResponse {
    /// Fail unless the status is absent or `"success"`
    pub fn ensure_success(&self, endpoint: &str) -> Result<()> {
        ensure_success(endpoint, self.status.as_deref())
    }
}

/// Fail when a status is present and is not `"success"`
pub fn ensure_success(endpoint: &str, status: Option<&str>) -> Result<()> {
    match status {
        Some(status) if status != SUCCESS => {
            tracing::warn!(endpoint, status, "API reported failure");
            Err(InstantlyError::Status {
                endpoint: endpoint.to_string(),
                status: status.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Decode a response body, failing on an embedded status before matching the shape
pub(crate) fn decode_checked<R>(endpoint: &str, body: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    let value: Value =
        serde_json::from_slice(body).map_err(|e| InstantlyError::decode(endpoint, e))?;
    ensure_success(endpoint, value.get("status").and_then(Value::as_str))?;
    serde_json::from_value(value).map_err(|e| InstantlyError::decode(endpoint, e))
}

/// Counts arrive as numbers or numeric strings depending on the endpoint
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
        Missing(()),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) if s.trim().is_empty() => Ok(0),
        Count::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a count, got '{}'", s))),
        Count::Missing(()) => Ok(0),
    }
}
