//! Blocklist API

use crate::api::status::lenient_count;
use crate::error::Result;
use crate::InstantlyClient;
use serde::{Deserialize, Serialize};

/// Outcome of adding entries to the workspace blocklist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub entries_added: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub already_in_blocklist: u64,
    #[serde(default)]
    pub blocklist_id: String,
}

#[derive(Debug, Serialize)]
struct BlocklistPayload<'a> {
    entries: &'a [String],
}

impl InstantlyClient {
    /// Block emails or whole domains
    pub async fn add_entries_to_blocklist(&self, entries: &[String]) -> Result<BlocklistUpdate> {
        self.write("blocklist/add", &BlocklistPayload { entries })
            .await
    }
}
