//! Per-cluster elections.

use std::time::Duration;

use quorum_transcript::Utterance;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;

use crate::config::CorrectorConfig;
use crate::identify::{AttemptOutcome, AttemptRunner, SkipReason};
use crate::sampler::{Sampler, cluster_rng};
use crate::tally::VoteTally;

// ================== Decision types ==================

/// How a cluster election ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The cluster maps to a roster identity.
    Mapped {
        name: String,
        vote_ratio: f32,
        avg_score: f32,
        via: AcceptReason,
    },
    /// The cluster keeps its machine label.
    Unchanged(RejectReason),
}

/// Which acceptance rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptReason {
    /// Vote share and average score both cleared their thresholds.
    Majority,
    /// The average score alone was high enough to confirm the leader.
    Confirm,
}

/// Why a cluster kept its machine label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectReason {
    /// The final round recorded no votes at all.
    NoVotes,
    /// A leader emerged but cleared no acceptance rule.
    WeakEvidence { vote_ratio: f32, avg_score: f32 },
}

/// Outcome of one cluster election.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterDecision {
    /// Machine label the election was held for.
    pub label: String,
    pub resolution: Resolution,
    /// Final-round tally the resolution was computed from.
    pub tally: VoteTally,
    /// Voting rounds actually held.
    pub rounds: u32,
    /// True when every allowed round ran without the votes converging.
    pub exhausted: bool,
    /// Skipped attempts accumulated across all rounds.
    pub failures: FailureCounts,
}

/// Attempt-failure counters for one election.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureCounts {
    pub no_audio: usize,
    pub low_confidence: usize,
    pub exceptions: usize,
}

impl FailureCounts {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoAudio => self.no_audio += 1,
            SkipReason::LowConfidence => self.low_confidence += 1,
            SkipReason::Exception => self.exceptions += 1,
        }
    }
}

// ================== Voter ==================

/// Elects a roster identity for one cluster by repeated sampling.
///
/// Each round draws a fresh sample, identifies every pick and tallies the
/// votes. Rounds repeat until the leader's share reaches the consistency
/// threshold or the retry budget runs out; the last round's tally alone
/// decides the outcome. A cancelled token stops the election and lets the
/// best tally so far stand as final.
pub struct ClusterVoter<'a> {
    runner: &'a AttemptRunner,
    config: &'a CorrectorConfig,
    cancel: &'a CancellationToken,
}

impl<'a> ClusterVoter<'a> {
    pub fn new(
        runner: &'a AttemptRunner,
        config: &'a CorrectorConfig,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            runner,
            config,
            cancel,
        }
    }

    /// Runs the election for `label` over `cluster`, a list of positions
    /// into `utterances`.
    pub async fn elect(
        &self,
        utterances: &[Utterance],
        label: &str,
        cluster: &[usize],
    ) -> ClusterDecision {
        let sampler = Sampler::new(self.config.sample_count, self.config.min_sample_duration_ms);
        let mut rng = cluster_rng(self.config.seed, label);
        let mut failures = FailureCounts::default();
        let mut tally = VoteTally::new();
        let mut rounds = 0;
        let mut exhausted = false;

        // One initial round plus up to `max_retries` resamples.
        let rounds_allowed = self.config.max_retries + 1;
        for round in 1..=rounds_allowed {
            if self.cancel.is_cancelled() {
                break;
            }
            if round > 1 {
                tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            }

            tally = self
                .vote_round(utterances, &sampler, cluster, &mut rng, &mut failures)
                .await;
            rounds = round;

            let consistency = tally.consistency();
            if consistency >= self.config.consistency_threshold {
                tracing::debug!(label, round, consistency, "votes converged");
                break;
            }
            if round == rounds_allowed {
                exhausted = true;
                tracing::debug!(label, rounds = round, "retry budget exhausted");
            } else {
                tracing::debug!(label, round, consistency, "votes split, retrying");
            }
        }

        let resolution = self.resolve(&tally);
        ClusterDecision {
            label: label.to_string(),
            resolution,
            tally,
            rounds,
            exhausted,
            failures,
        }
    }

    async fn vote_round(
        &self,
        utterances: &[Utterance],
        sampler: &Sampler,
        cluster: &[usize],
        rng: &mut StdRng,
        failures: &mut FailureCounts,
    ) -> VoteTally {
        let mut tally = VoteTally::new();
        let sample = sampler.sample(utterances, cluster, rng);
        for (pos, &index) in sample.iter().enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }
            if pos > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.vote_call_delay_ms)).await;
            }
            let u = &utterances[index];
            match self.runner.run(u.start_ms, u.end_ms).await {
                AttemptOutcome::Vote(id) => {
                    tracing::debug!(
                        identity = %id.name,
                        score = id.score,
                        start_ms = u.start_ms,
                        "vote"
                    );
                    tally.record(id.name, id.score);
                }
                AttemptOutcome::Skipped(reason) => failures.record(reason),
            }
        }
        tally
    }

    /// Applies the acceptance rules to the final tally.
    fn resolve(&self, tally: &VoteTally) -> Resolution {
        let Some(leader) = tally.leader() else {
            return Resolution::Unchanged(RejectReason::NoVotes);
        };
        let vote_ratio = leader.count as f32 / tally.total() as f32;
        let avg_score = leader.avg_score;

        if vote_ratio >= self.config.vote_ratio_threshold && avg_score >= self.config.min_avg_score
        {
            return Resolution::Mapped {
                name: leader.name,
                vote_ratio,
                avg_score,
                via: AcceptReason::Majority,
            };
        }
        if avg_score >= self.config.confirm_score {
            return Resolution::Mapped {
                name: leader.name,
                vote_ratio,
                avg_score,
                via: AcceptReason::Confirm,
            };
        }
        Resolution::Unchanged(RejectReason::WeakEvidence {
            vote_ratio,
            avg_score,
        })
    }
}
