//! Lead API
//!
//! Adding, looking up, deleting and updating leads inside campaigns.

use crate::api::status::lenient_count;
use crate::error::Result;
use crate::InstantlyClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A lead to upload into a campaign
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Extra template variables
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_variables: HashMap<String, String>,
}

impl Lead {
    /// Create a lead with only an email address
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    /// Set first name
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Set last name
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Set company name
    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    /// Set the personalization line
    pub fn with_personalization(mut self, personalization: impl Into<String>) -> Self {
        self.personalization = Some(personalization.into());
        self
    }

    /// Set phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set website
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Set a custom template variable
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_variables.insert(name.into(), value.into());
        self
    }
}

/// Outcome of an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLeadsResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_sent: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub leads_uploaded: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub already_in_campaign: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub invalid_email_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub duplicate_email_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub remaining_in_plan: u64,
}

/// A lead as stored in a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignLead {
    pub id: String,

    #[serde(rename = "timestamp_created")]
    pub timestamp: DateTime<Utc>,

    /// Campaign id
    pub campaign: String,

    #[serde(default)]
    pub campaign_name: String,

    /// Numeric lead state as reported by the API
    #[serde(default)]
    pub status: i64,

    /// Lead email
    pub contact: String,

    #[serde(default)]
    pub email_opened: bool,

    #[serde(default)]
    pub email_replied: bool,

    #[serde(default)]
    pub lead_data: serde_json::Map<String, serde_json::Value>,
}

/// Statuses a lead can be moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    Active,
    Completed,
    Unsubscribed,
    Interested,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
    #[serde(rename = "Meeting Completed")]
    MeetingCompleted,
    Closed,
    #[serde(rename = "Out of Office")]
    OutOfOffice,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "Wrong Person")]
    WrongPerson,
}

impl LeadStatus {
    /// The label the API expects
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Active => "Active",
            LeadStatus::Completed => "Completed",
            LeadStatus::Unsubscribed => "Unsubscribed",
            LeadStatus::Interested => "Interested",
            LeadStatus::MeetingBooked => "Meeting Booked",
            LeadStatus::MeetingCompleted => "Meeting Completed",
            LeadStatus::Closed => "Closed",
            LeadStatus::OutOfOffice => "Out of Office",
            LeadStatus::NotInterested => "Not Interested",
            LeadStatus::WrongPerson => "Wrong Person",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct AddLeadsPayload<'a> {
    campaign_id: &'a str,
    leads: &'a [Lead],
}

#[derive(Debug, Serialize)]
struct DeleteLeadsPayload<'a> {
    campaign_id: &'a str,
    delete_all_from_company: bool,
    delete_list: &'a [String],
}

#[derive(Debug, Serialize)]
struct UpdateLeadStatusPayload<'a> {
    campaign_id: &'a str,
    email: &'a str,
    new_status: LeadStatus,
}

#[derive(Debug, Serialize)]
struct LeadVariablesPayload<'a, V: Serialize> {
    campaign_id: &'a str,
    email: &'a str,
    variables: V,
}

impl InstantlyClient {
    /// Upload leads into a campaign
    pub async fn add_leads_to_campaign(
        &self,
        campaign_id: &str,
        leads: &[Lead],
    ) -> Result<AddLeadsResult> {
        self.write("lead/add", &AddLeadsPayload { campaign_id, leads })
            .await
    }

    /// Look up the single lead with `email` in a campaign
    pub async fn get_lead_from_campaign(
        &self,
        campaign_id: &str,
        email: &str,
    ) -> Result<CampaignLead> {
        let leads: Vec<CampaignLead> = self
            .read(
                "lead/get",
                &[("campaign_id", campaign_id), ("email", email)],
            )
            .await?;
        crate::api::single(leads, "lead", email)
    }

    /// Delete leads by email, or every lead sharing their company domain
    pub async fn delete_leads_from_campaign(
        &self,
        campaign_id: &str,
        delete_all_from_company: bool,
        emails: &[String],
    ) -> Result<()> {
        self.write_for_status(
            "lead/delete",
            &DeleteLeadsPayload {
                campaign_id,
                delete_all_from_company,
                delete_list: emails,
            },
        )
        .await
    }

    /// Move a lead to another status
    pub async fn update_lead_status(
        &self,
        campaign_id: &str,
        email: &str,
        status: LeadStatus,
    ) -> Result<()> {
        self.write_for_status(
            "lead/update/status",
            &UpdateLeadStatusPayload {
                campaign_id,
                email,
                new_status: status,
            },
        )
        .await
    }

    /// Merge `variables` into a lead's data
    pub async fn update_lead_variables(
        &self,
        campaign_id: &str,
        email: &str,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        self.write_for_status(
            "lead/data/update",
            &LeadVariablesPayload {
                campaign_id,
                email,
                variables,
            },
        )
        .await
    }

    /// Replace a lead's data with `variables`
    pub async fn set_lead_variables(
        &self,
        campaign_id: &str,
        email: &str,
        variables: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        self.write_for_status(
            "lead/data/set",
            &LeadVariablesPayload {
                campaign_id,
                email,
                variables,
            },
        )
        .await
    }

    /// Remove the named variables from a lead's data
    pub async fn delete_lead_variables(
        &self,
        campaign_id: &str,
        email: &str,
        variables: &[String],
    ) -> Result<()> {
        self.write_for_status(
            "lead/data/delete",
            &LeadVariablesPayload {
                campaign_id,
                email,
                variables,
            },
        )
        .await
    }
}
