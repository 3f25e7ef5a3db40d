//! Campaign API
//!
//! Campaign listing, naming, sending accounts, schedules, launch/pause and
//! analytics.

use crate::api::schedule::{CampaignSchedule, SetSchedulesPayload};
use crate::api::status::lenient_count;
use crate::error::Result;
use crate::InstantlyClient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Analytics endpoints take dates as `MM-DD-YYYY`
const ANALYTICS_DATE_FORMAT: &str = "%m-%d-%Y";

/// A campaign as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CampaignNameResponse {
    campaign_name: String,
}

#[derive(Debug, Serialize)]
struct SetCampaignNamePayload<'a> {
    campaign_id: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct SetCampaignAccountsPayload<'a> {
    campaign_id: &'a str,
    account_list: &'a [String],
}

#[derive(Debug, Serialize)]
struct CampaignAccountPayload<'a> {
    campaign_id: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct CampaignIdPayload<'a> {
    campaign_id: &'a str,
}

/// Lead totals for a campaign
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub campaign_id: String,
    pub campaign_name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_leads: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub contacted: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads_who_read: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads_who_replied: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub bounced: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unsubscribed: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completed: u64,
}

/// Email activity for a campaign over a date range
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignCount {
    pub campaign_id: String,
    pub campaign_name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_emails_sent: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub emails_read: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub new_leads_contacted: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads_replied: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads_read: u64,
}

/// The count endpoint answers with one entry per campaign
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CampaignCountResponse {
    One(CampaignCount),
    Many(Vec<CampaignCount>),
}

impl InstantlyClient {
    /// List all campaigns in the workspace
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        self.read("campaign/list", &[]).await
    }

    /// Get a campaign's name
    pub async fn get_campaign_name(&self, campaign_id: &str) -> Result<String> {
        let response: CampaignNameResponse = self
            .read("campaign/get/name", &[("campaign_id", campaign_id)])
            .await?;
        Ok(response.campaign_name)
    }

    /// Rename a campaign
    pub async fn set_campaign_name(&self, campaign_id: &str, name: &str) -> Result<()> {
        self.write_for_status(
            "campaign/set/name",
            &SetCampaignNamePayload { campaign_id, name },
        )
        .await
    }

    /// Emails of the accounts sending for a campaign
    pub async fn get_campaign_accounts(&self, campaign_id: &str) -> Result<Vec<String>> {
        self.read("campaign/get/accounts", &[("campaign_id", campaign_id)])
            .await
    }

    /// Replace the sending accounts of a campaign
    pub async fn set_campaign_accounts(
        &self,
        campaign_id: &str,
        account_emails: &[String],
    ) -> Result<()> {
        self.write_for_status(
            "campaign/set/accounts",
            &SetCampaignAccountsPayload {
                campaign_id,
                account_list: account_emails,
            },
        )
        .await
    }

    /// Add one sending account to a campaign
    pub async fn add_sending_account(&self, campaign_id: &str, email: &str) -> Result<()> {
        self.write_for_status(
            "campaign/add/account",
            &CampaignAccountPayload { campaign_id, email },
        )
        .await
    }

    /// Remove one sending account from a campaign
    pub async fn remove_sending_account(&self, campaign_id: &str, email: &str) -> Result<()> {
        self.write_for_status(
            "campaign/remove/account",
            &CampaignAccountPayload { campaign_id, email },
        )
        .await
    }

    /// Replace a campaign's sending schedules
    pub async fn set_campaign_schedule(
        &self,
        campaign_id: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        schedules: &[CampaignSchedule],
    ) -> Result<()> {
        let payload = SetSchedulesPayload::new(campaign_id, start_date, end_date, schedules);
        self.write_for_status("campaign/set/schedules", &payload)
            .await
    }

    /// Start sending a campaign
    pub async fn launch_campaign(&self, campaign_id: &str) -> Result<()> {
        self.write_for_status("campaign/launch", &CampaignIdPayload { campaign_id })
            .await
    }

    /// Stop sending a campaign
    pub async fn pause_campaign(&self, campaign_id: &str) -> Result<()> {
        self.write_for_status("campaign/pause", &CampaignIdPayload { campaign_id })
            .await
    }

    /// Lead totals for a campaign
    pub async fn get_campaign_summary(&self, campaign_id: &str) -> Result<CampaignSummary> {
        self.read("campaign/summary", &[("campaign_id", campaign_id)])
            .await
    }

    /// Email activity for a campaign from `start_date`, optionally up to `end_date`
    pub async fn get_campaign_count(
        &self,
        campaign_id: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<CampaignCount> {
        let start = start_date.format(ANALYTICS_DATE_FORMAT).to_string();
        let end = end_date.map(|d| d.format(ANALYTICS_DATE_FORMAT).to_string());

        let mut params = vec![("campaign_id", campaign_id), ("start_date", start.as_str())];
        if let Some(end) = &end {
            params.push(("end_date", end.as_str()));
        }

        let endpoint = "analytics/campaign/count";
        let response: CampaignCountResponse = self.read(endpoint, &params).await?;
        match response {
            CampaignCountResponse::One(count) => Ok(count),
            CampaignCountResponse::Many(counts) => {
                crate::api::single(counts, "campaign count", campaign_id)
            }
        }
    }
}
