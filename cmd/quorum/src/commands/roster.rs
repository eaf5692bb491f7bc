//! Roster listing command.

use clap::Args;

use super::{create_client, load_config};
use crate::Cli;

/// List the enrolled roster.
#[derive(Args)]
pub struct RosterCommand {}

impl RosterCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = load_config(cli)?;
        let client = create_client(&config)?;

        let features = client.roster().list().await?;
        if features.is_empty() {
            println!("no enrolled voices in group {}", client.group_id());
            return Ok(());
        }
        for feature in &features {
            println!("{}\t{}", feature.feature_id, feature.feature_info);
        }
        Ok(())
    }
}
