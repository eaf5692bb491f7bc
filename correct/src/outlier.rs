//! Second-pass scan for individually mislabeled utterances.

use std::time::Duration;

use quorum_transcript::{CorrectionRecord, Utterance};
use tokio_util::sync::CancellationToken;

use crate::config::CorrectorConfig;
use crate::identify::{AttemptOutcome, AttemptRunner};

/// Counters from one outlier scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Utterances long enough to be re-identified.
    pub checked: usize,
    /// Utterances flipped to a different identity.
    pub corrected: usize,
}

/// Re-identifies long utterances one at a time and flips the ones the
/// roster contradicts decisively.
///
/// Elections fix wholesale label swaps; this pass catches the stray
/// utterance diarization attached to the wrong cluster. Each utterance
/// gets exactly one attempt, and only a score at or above
/// `correction_score` justifies overriding the cluster result.
pub struct OutlierCorrector<'a> {
    runner: &'a AttemptRunner,
    config: &'a CorrectorConfig,
    cancel: &'a CancellationToken,
}

impl<'a> OutlierCorrector<'a> {
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

    /// Scans the transcript in place, attaching a [`CorrectionRecord`] to
    /// every utterance it flips.
    pub async fn scan(&self, utterances: &mut [Utterance]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        for u in utterances.iter_mut() {
            if self.cancel.is_cancelled() {
                break;
            }
            if u.duration_ms() < self.config.min_check_duration_ms {
                continue;
            }
            if outcome.checked > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.scan_call_delay_ms)).await;
            }
            outcome.checked += 1;

            let AttemptOutcome::Vote(id) = self.runner.run(u.start_ms, u.end_ms).await else {
                continue;
            };
            if id.name != u.speaker && id.score >= self.config.correction_score {
                tracing::info!(
                    start_ms = u.start_ms,
                    from = %u.speaker,
                    to = %id.name,
                    score = id.score,
                    "outlier flipped"
                );
                u.correction = Some(CorrectionRecord {
                    original: u.speaker.clone(),
                    corrected: id.name.clone(),
                    score: id.score,
                });
                u.speaker = id.name;
                outcome.corrected += 1;
            }
        }
        outcome
    }
}
