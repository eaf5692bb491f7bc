//! Engine-level error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CorrectError>;

/// Fatal correction-run failure.
///
/// Everything that can go wrong on a single identification attempt (an
/// unreadable clip, a rejected match, a transport failure) is absorbed into
/// the vote statistics instead of surfacing here; the run only fails on
/// input it cannot work with at all.
#[derive(Debug, Error)]
pub enum CorrectError {
    /// The transcript has no utterances.
    #[error("transcript has no utterances")]
    EmptyTranscript,
}
