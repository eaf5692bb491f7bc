//! Single-clip identification command.

use anyhow::Context as _;
use clap::Args;

use super::{create_client, load_config, print_verbose};
use crate::Cli;

/// Identify the speaker of one audio clip against the roster.
#[derive(Args)]
pub struct IdentifyCommand {
    /// Audio clip (16 kHz mono 16-bit WAV)
    clip: String,
}

impl IdentifyCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = load_config(cli)?;
        let client = create_client(&config)?;

        let clip = std::fs::read(&self.clip)
            .with_context(|| format!("cannot read clip '{}'", self.clip))?;
        print_verbose(cli, &format!("clip is {} bytes", clip.len()));

        let policy = config.policy.unwrap_or_default();
        match client.identify(&clip, &policy).await? {
            Some(id) if id.rescued => println!(
                "{} (score {:.3}, accepted on lead over runner-up)",
                id.name, id.score
            ),
            Some(id) => println!("{} (score {:.3})", id.name, id.score),
            None => println!("no confident match"),
        }
        Ok(())
    }
}
