//! Single identification attempts: extract audio, call the roster,
//! classify the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use quorum_voiceprint::{Client, Identification, IdentifyPolicy};
use tokio::sync::Semaphore;

use crate::source::SegmentSource;

/// Clips shorter than this are presumed to carry no usable speech and are
/// skipped without a backend call.
pub const MIN_CLIP_BYTES: usize = 1000;

// ================== Identifier seam ==================

/// Scores a clip against the enrolled roster.
///
/// The engine depends on this trait rather than on the HTTP client
/// directly, so elections can run against scripted identifiers in tests.
#[async_trait]
pub trait SpeakerIdentifier: Send + Sync {
    /// Returns the best roster match for the clip, or `None` when every
    /// candidate is rejected.
    async fn identify(&self, clip: &[u8]) -> quorum_voiceprint::Result<Option<Identification>>;
}

/// [`SpeakerIdentifier`] backed by the feature-search API.
pub struct RosterIdentifier {
    client: Client,
    policy: IdentifyPolicy,
}

impl RosterIdentifier {
    /// Wraps a client in voting mode: every call returns the top roster
    /// candidate, and thresholding is left to the vote aggregation.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            policy: IdentifyPolicy::unconditional(),
        }
    }

    /// Wraps a client with an explicit decision policy.
    pub fn with_policy(client: Client, policy: IdentifyPolicy) -> Self {
        Self { client, policy }
    }
}

#[async_trait]
impl SpeakerIdentifier for RosterIdentifier {
    async fn identify(&self, clip: &[u8]) -> quorum_voiceprint::Result<Option<Identification>> {
        self.client.identify(clip, &self.policy).await
    }
}

// ================== Attempt outcomes ==================

/// Why an attempt produced no vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No clip for the range, or one too short to carry speech.
    NoAudio,
    /// The backend matched nobody with enough confidence.
    LowConfidence,
    /// Transport or API failure; logged and counted, never fatal.
    Exception,
}

/// Outcome of one identification attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// A usable vote.
    Vote(Identification),
    /// No vote; the reason feeds the failure counters.
    Skipped(SkipReason),
}

// ================== Attempt runner ==================

/// Runs one identification attempt end to end.
///
/// Extraction happens on the blocking pool behind a shared semaphore so a
/// wide election cannot pile up decode work; the permit is released before
/// the network call so the gate bounds only extraction.
pub struct AttemptRunner {
    identifier: Arc<dyn SpeakerIdentifier>,
    source: Arc<dyn SegmentSource>,
    extract_gate: Arc<Semaphore>,
}

impl AttemptRunner {
    pub fn new(
        identifier: Arc<dyn SpeakerIdentifier>,
        source: Arc<dyn SegmentSource>,
        extract_gate: Arc<Semaphore>,
    ) -> Self {
        Self {
            identifier,
            source,
            extract_gate,
        }
    }

    /// Extracts `start_ms..end_ms` and identifies the speaker.
    ///
    /// Never fails: extraction and transport problems degrade to
    /// [`AttemptOutcome::Skipped`], so a bad segment costs one vote rather
    /// than the run.
    pub async fn run(&self, start_ms: i64, end_ms: i64) -> AttemptOutcome {
        let clip = {
            let _permit = match self.extract_gate.acquire().await {
                Ok(permit) => permit,
                Err(_) => return AttemptOutcome::Skipped(SkipReason::Exception),
            };
            let source = self.source.clone();
            match tokio::task::spawn_blocking(move || source.extract(start_ms, end_ms)).await {
                Ok(Ok(clip)) => clip,
                Ok(Err(err)) => {
                    tracing::debug!(start_ms, end_ms, error = %err, "no usable audio");
                    return AttemptOutcome::Skipped(SkipReason::NoAudio);
                }
                Err(err) => {
                    tracing::warn!(start_ms, end_ms, error = %err, "extraction worker failed");
                    return AttemptOutcome::Skipped(SkipReason::Exception);
                }
            }
        };

        if clip.len() < MIN_CLIP_BYTES {
            tracing::debug!(start_ms, end_ms, bytes = clip.len(), "clip too short, skipping");
            return AttemptOutcome::Skipped(SkipReason::NoAudio);
        }

        match self.identifier.identify(&clip).await {
            Ok(Some(id)) => AttemptOutcome::Vote(id),
            Ok(None) => AttemptOutcome::Skipped(SkipReason::LowConfidence),
            Err(err) => {
                tracing::warn!(start_ms, end_ms, error = %err, "identification failed");
                AttemptOutcome::Skipped(SkipReason::Exception)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ClipError;

    struct NeverIdentifier;

    #[async_trait]
    impl SpeakerIdentifier for NeverIdentifier {
        async fn identify(
            &self,
            _clip: &[u8],
        ) -> quorum_voiceprint::Result<Option<Identification>> {
            panic!("identifier must not be called for unusable clips");
        }
    }

    struct TinySource;

    impl SegmentSource for TinySource {
        fn extract(&self, _start_ms: i64, _end_ms: i64) -> Result<Vec<u8>, ClipError> {
            Ok(vec![0; 61])
        }
    }

    struct MissingSource;

    impl SegmentSource for MissingSource {
        fn extract(&self, start_ms: i64, end_ms: i64) -> Result<Vec<u8>, ClipError> {
            Err(ClipError::Unavailable { start_ms, end_ms })
        }
    }

    struct PanickingSource;

    impl SegmentSource for PanickingSource {
        fn extract(&self, _start_ms: i64, _end_ms: i64) -> Result<Vec<u8>, ClipError> {
            panic!("decoder blew up");
        }
    }

    fn runner(source: impl SegmentSource + 'static) -> AttemptRunner {
        AttemptRunner::new(
            Arc::new(NeverIdentifier),
            Arc::new(source),
            Arc::new(Semaphore::new(1)),
        )
    }

    #[tokio::test]
    async fn short_clip_skips_without_a_backend_call() {
        let outcome = runner(TinySource).run(0, 5000).await;
        assert_eq!(outcome, AttemptOutcome::Skipped(SkipReason::NoAudio));
    }

    #[tokio::test]
    async fn unavailable_range_skips_as_no_audio() {
        let outcome = runner(MissingSource).run(0, 5000).await;
        assert_eq!(outcome, AttemptOutcome::Skipped(SkipReason::NoAudio));
    }

    #[tokio::test]
    async fn extraction_panic_degrades_to_exception() {
        let outcome = runner(PanickingSource).run(0, 5000).await;
        assert_eq!(outcome, AttemptOutcome::Skipped(SkipReason::Exception));
    }
}
