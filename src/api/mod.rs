//! API Module
//!
//! Request/response types and the per-endpoint methods of [`crate::InstantlyClient`].

pub mod account;
pub mod blocklist;
pub mod campaign;
pub mod lead;
pub mod schedule;
pub mod status;

pub use account::{
    Account, AccountName, AccountPayload, AccountVitals, AccountVitalsReport, WarmupAdvanced,
    WarmupSettings,
};
pub use blocklist::BlocklistUpdate;
pub use campaign::{Campaign, CampaignCount, CampaignSummary};
pub use lead::{AddLeadsResult, CampaignLead, Lead, LeadStatus};
pub use schedule::{CampaignSchedule, Timing};
pub use status::{StatusResponse, SUCCESS};

use crate::error::{InstantlyError, Result};

/// Expect exactly one record for a lookup by unique key
pub(crate) fn single<T>(mut items: Vec<T>, what: &str, key: &str) -> Result<T> {
    match items.len() {
        0 => Err(InstantlyError::NotFound(format!("no {} found for '{}'", what, key))),
        1 => Ok(items.remove(0)),
        count => Err(InstantlyError::Ambiguous {
            what: what.to_string(),
            count,
        }),
    }
}
