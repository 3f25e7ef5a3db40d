//! List campaigns with their lead totals.
//!
//! Reads `INSTANTLY_API_KEY` (and the optional `INSTANTLY_HOST` /
//! `INSTANTLY_API_VERSION`) from the environment, a `.env` file or
//! `~/.instantly/config.json`.
//!
//! ```sh
//! RUST_LOG=instantly=debug cargo run --example list_campaigns
//! ```

use instantly::InstantlyClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let client = InstantlyClient::from_env()?;

    let workspace = client.authenticate().await?;
    println!("Workspace: {}", workspace);

    let campaigns = client.list_campaigns().await?;
    if campaigns.is_empty() {
        println!("No campaigns");
        return Ok(());
    }

    for campaign in campaigns {
        let summary = client.get_campaign_summary(&campaign.id).await?;
        println!(
            "{:<38} {:<30} leads={} contacted={} replied={}",
            campaign.id,
            campaign.name,
            summary.total_leads,
            summary.contacted,
            summary.leads_who_replied
        );
    }

    Ok(())
}
