//! Account API
//!
//! Sending accounts: listing, DNS vitals checks and warmup control.

use crate::api::status::lenient_count;
use crate::error::Result;
use crate::InstantlyClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sending account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub timestamp_created: DateTime<Utc>,
    pub timestamp_updated: DateTime<Utc>,
    #[serde(default)]
    pub payload: Option<AccountPayload>,
}

/// Account settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPayload {
    pub name: AccountName,
    pub warmup: WarmupSettings,
    pub imap_host: String,
    #[serde(deserialize_with = "lenient_count")]
    pub imap_port: u64,
    pub smtp_host: String,
    #[serde(deserialize_with = "lenient_count")]
    pub smtp_port: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub daily_limit: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub sending_gap: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupSettings {
    #[serde(deserialize_with = "lenient_count")]
    pub limit: u64,
    pub advanced: WarmupAdvanced,
    #[serde(deserialize_with = "lenient_count")]
    pub increment: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub reply_rate: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmupAdvanced {
    pub warm_ctd: bool,
    #[serde(deserialize_with = "lenient_count")]
    pub open_rate: u64,
    pub weekday_only: bool,
    #[serde(deserialize_with = "lenient_count")]
    pub important_rate: u64,
    pub read_emulation: bool,
    #[serde(deserialize_with = "lenient_count")]
    pub spam_save_rate: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub random_range_min: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub random_range_max: u64,
}

#[derive(Debug, Deserialize)]
struct ListAccountsResponse {
    #[serde(default)]
    accounts: Vec<Account>,
}

/// DNS health of one account's domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountVitals {
    pub domain: String,
    pub mx: bool,
    pub spf: bool,
    pub dkim: bool,
    pub dmarc: bool,
}

impl AccountVitals {
    /// Every record checked out
    pub fn is_healthy(&self) -> bool {
        self.mx && self.spf && self.dkim && self.dmarc
    }
}

/// Result of a vitals check, split by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountVitalsReport {
    #[serde(default)]
    pub success_list: Vec<AccountVitals>,
    #[serde(default)]
    pub failure_list: Vec<AccountVitals>,
}


#[derive(Debug, Serialize)]
struct VitalsPayload<'a> {
    accounts: &'a [String],
}

#[derive(Debug, Serialize)]
struct WarmupPayload<'a> {
    email: &'a str,
}

impl InstantlyClient {
    /// List sending accounts, `limit` at a time after skipping `skip`
    pub async fn list_accounts(&self, limit: u32, skip: u32) -> Result<Vec<Account>> {
        let limit = limit.to_string();
        let skip = skip.to_string();

        let response: ListAccountsResponse = self
            .read("account/list", &[("limit", limit.as_str()), ("skip", skip.as_str())])
            .await?;
        Ok(response.accounts)
    }

    /// Check MX, SPF, DKIM and DMARC for the given account emails
    pub async fn check_account_vitals(&self, accounts: &[String]) -> Result<AccountVitalsReport> {
        self.write("account/test/vitals", &VitalsPayload { accounts })
            .await
    }

    /// Start warming up a sending account
    pub async fn enable_warmup(&self, email: &str) -> Result<()> {
        self.write_for_status("account/warmup/enable", &WarmupPayload { email })
            .await
    }

    /// Stop warming up a sending account
    pub async fn pause_warmup(&self, email: &str) -> Result<()> {
        self.write_for_status("account/warmup/pause", &WarmupPayload { email })
            .await
    }
}
