use clap::Args;
use color_eyre::eyre::Result;
use console::style;
use hoist_core::ContractApi;

use crate::client::TenderlyClient;
use crate::config::AuthConfig;

/// Show the account the access key belongs to
#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn run(self) -> Result<()> {
        let auth = AuthConfig::load()?;
        let client = TenderlyClient::new(&auth)?;

        let principal = client.who_am_i().await?;
        println!(
            "{} Connected as {} ({})",
            style("✓").green(),
            style(&principal).cyan(),
            style(&auth.api_url).dim()
        );

        Ok(())
    }
}
