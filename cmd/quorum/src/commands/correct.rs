//! Transcript correction command.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;
use quorum_correct::{Corrector, Resolution, RosterIdentifier, WavFileSource};
use quorum_transcript::Transcript;
use tokio_util::sync::CancellationToken;

use super::{create_client, load_config, print_success, print_verbose, print_warning};
use crate::Cli;

/// Correct diarized speaker labels against the enrolled roster.
#[derive(Args)]
pub struct CorrectCommand {
    /// Transcript JSON file produced by diarization
    transcript: String,

    /// Source recording (16 kHz mono 16-bit WAV)
    audio: String,
}

impl CorrectCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = load_config(cli)?;
        let client = create_client(&config)?;

        let content = std::fs::read_to_string(&self.transcript)
            .with_context(|| format!("cannot read transcript '{}'", self.transcript))?;
        let mut transcript = Transcript::from_json(&content)
            .with_context(|| format!("cannot parse transcript '{}'", self.transcript))?;
        print_verbose(cli, &format!("loaded {} utterances", transcript.len()));

        let source = WavFileSource::open(&self.audio)
            .with_context(|| format!("cannot open audio '{}'", self.audio))?;

        let corrector = Corrector::new(
            Arc::new(RosterIdentifier::new(client)),
            Arc::new(source),
            config.engine,
        );

        // Ctrl-C finishes the run gracefully with whatever has been
        // resolved so far.
        let cancel = CancellationToken::new();
        tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    print_warning("interrupted, finishing with what is already resolved");
                    cancel.cancel();
                }
            }
        });

        let report = corrector.run(&mut transcript.utterances, &cancel).await?;

        for decision in &report.decisions {
            match &decision.resolution {
                Resolution::Mapped {
                    name,
                    vote_ratio,
                    avg_score,
                    ..
                } => print_verbose(
                    cli,
                    &format!(
                        "{} -> {} (ratio {:.2}, avg {:.2}, {} round(s))",
                        decision.label, name, vote_ratio, avg_score, decision.rounds
                    ),
                ),
                Resolution::Unchanged(reason) => {
                    print_verbose(cli, &format!("{} kept: {:?}", decision.label, reason))
                }
            }
        }

        let output = transcript.to_json()?;
        match cli.output.as_deref() {
            Some(path) => {
                std::fs::write(path, &output)
                    .with_context(|| format!("cannot write '{}'", path))?;
                print_verbose(cli, &format!("wrote corrected transcript to {}", path));
            }
            None => println!("{}", output),
        }

        print_success(&format!(
            "{} of {} clusters resolved, {} merged, {} utterances flipped",
            report.stats.clusters_resolved,
            report.decisions.len(),
            report.stats.merge_count,
            report.stats.correction_count,
        ));
        Ok(())
    }
}
