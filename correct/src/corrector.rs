//! The correction pipeline: elections, mapping, outlier scan.

use std::mem;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use quorum_transcript::{
    IdentityMapping, RunStatistics, Utterance, cluster_indices, cluster_labels,
};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::CorrectorConfig;
use crate::election::{ClusterDecision, ClusterVoter, Resolution};
use crate::error::{CorrectError, Result};
use crate::identify::{AttemptRunner, SpeakerIdentifier};
use crate::outlier::OutlierCorrector;
use crate::source::SegmentSource;

/// Everything a finished run reports besides the corrected transcript
/// itself.
#[derive(Debug)]
pub struct RunReport {
    /// Label-to-identity mapping the run applied; unresolved clusters map
    /// to themselves.
    pub mapping: IdentityMapping,
    /// Run counters.
    pub stats: RunStatistics,
    /// Per-cluster election outcomes, in first-appearance label order.
    pub decisions: Vec<ClusterDecision>,
}

/// Speaker-label correction engine.
///
/// One instance is reusable across runs; all per-run state lives inside
/// [`run`].
///
/// [`run`]: Corrector::run
pub struct Corrector {
    identifier: Arc<dyn SpeakerIdentifier>,
    source: Arc<dyn SegmentSource>,
    config: CorrectorConfig,
    extract_gate: Arc<Semaphore>,
}

impl Corrector {
    pub fn new(
        identifier: Arc<dyn SpeakerIdentifier>,
        source: Arc<dyn SegmentSource>,
        config: CorrectorConfig,
    ) -> Self {
        let extract_gate = Arc::new(Semaphore::new(config.extract_workers.max(1)));
        Self {
            identifier,
            source,
            config,
            extract_gate,
        }
    }

    /// Corrects speaker labels in place.
    ///
    /// Three phases: a per-cluster election, application of the elected
    /// mapping, then an outlier scan over the relabeled transcript.
    /// Cancelling the token stops scheduling new work and returns normally
    /// with whatever was resolved up to that point; an empty transcript is
    /// the only error and is raised before anything is mutated.
    pub async fn run(
        &self,
        utterances: &mut [Utterance],
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        if utterances.is_empty() {
            return Err(CorrectError::EmptyTranscript);
        }

        let labels = cluster_labels(utterances);
        tracing::info!(
            utterances = utterances.len(),
            clusters = labels.len(),
            "correction started"
        );

        let runner = AttemptRunner::new(
            self.identifier.clone(),
            self.source.clone(),
            self.extract_gate.clone(),
        );
        let decisions = self
            .hold_elections(&runner, utterances, &labels, cancel)
            .await;

        let mut stats = RunStatistics::default();
        let mut mapping = IdentityMapping::new();
        for decision in &decisions {
            match &decision.resolution {
                Resolution::Mapped {
                    name,
                    vote_ratio,
                    avg_score,
                    ..
                } => {
                    tracing::info!(
                        label = %decision.label,
                        identity = %name,
                        vote_ratio,
                        avg_score,
                        rounds = decision.rounds,
                        "cluster resolved"
                    );
                    stats.clusters_resolved += 1;
                    mapping.insert(&decision.label, name);
                }
                Resolution::Unchanged(reason) => {
                    tracing::info!(label = %decision.label, ?reason, "cluster kept its label");
                    mapping.insert(&decision.label, &decision.label);
                }
            }
        }
        stats.merge_count = mapping.merge_count();

        apply_mapping(utterances, &mapping);

        let scan = OutlierCorrector::new(&runner, &self.config, cancel)
            .scan(utterances)
            .await;
        stats.outliers_checked = scan.checked;
        stats.correction_count = scan.corrected;

        tracing::info!(
            resolved = stats.clusters_resolved,
            merged = stats.merge_count,
            flipped = stats.correction_count,
            "correction finished"
        );
        Ok(RunReport {
            mapping,
            stats,
            decisions,
        })
    }

    /// Runs every cluster's election, at most `election_workers` at a
    /// time, and returns the decisions in label order.
    async fn hold_elections(
        &self,
        runner: &AttemptRunner,
        utterances: &[Utterance],
        labels: &[String],
        cancel: &CancellationToken,
    ) -> Vec<ClusterDecision> {
        let voter = ClusterVoter::new(runner, &self.config, cancel);
        let workers = self.config.election_workers.max(1);

        let mut decisions: Vec<ClusterDecision> = stream::iter(labels.iter().map(|label| {
            let voter = &voter;
            async move {
                let cluster = cluster_indices(utterances, label);
                voter.elect(utterances, label, &cluster).await
            }
        }))
        .buffer_unordered(workers)
        .collect()
        .await;

        // Completion order is arbitrary; report in label order.
        decisions.sort_by_key(|d| labels.iter().position(|l| *l == d.label));
        decisions
    }
}

/// Rewrites every label through the mapping, keeping the machine label on
/// renamed utterances.
fn apply_mapping(utterances: &mut [Utterance], mapping: &IdentityMapping) {
    for u in utterances.iter_mut() {
        let resolved = mapping.resolve(&u.speaker);
        if resolved != u.speaker {
            let resolved = resolved.to_string();
            u.original_speaker = Some(mem::replace(&mut u.speaker, resolved));
        }
    }
}
