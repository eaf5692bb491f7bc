//! Quorum CLI - speaker-label correction against an enrolled voice roster.

use clap::{Parser, Subcommand};

mod commands;

use commands::{CorrectCommand, IdentifyCommand, RosterCommand};

/// Quorum CLI - speaker-label correction for diarized transcripts.
///
/// Diarization numbers its speakers ("Speaker 1", "Speaker 2") without
/// knowing who they are. This tool resolves those labels against a roster
/// of enrolled voices: per-cluster elections over sampled utterances,
/// then an outlier pass for individually misattributed utterances.
///
/// Credentials and engine tuning are read from a YAML config file.
#[derive(Parser)]
#[command(name = "quorum")]
#[command(about = "Speaker-label correction against an enrolled voice roster")]
#[command(version)]
pub struct Cli {
    /// Config file (default is quorum.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Correct speaker labels in a transcript
    Correct(CorrectCommand),
    /// Identify the speaker of a single audio clip
    Identify(IdentifyCommand),
    /// List enrolled roster voices
    Roster(RosterCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    match &cli.command {
        Commands::Correct(cmd) => cmd.run(&cli).await,
        Commands::Identify(cmd) => cmd.run(&cli).await,
        Commands::Roster(cmd) => cmd.run(&cli).await,
    }
}
