//! Vote-based speaker-label correction.
//!
//! ASR diarization numbers its speakers ("Speaker 1", "Speaker 2") without
//! knowing who they are. Given a roster of enrolled voices, this crate
//! resolves those machine labels to identities in three phases:
//!
//! 1. **Elections**: every cluster samples its longest utterances,
//!    identifies each pick against the roster and tallies the votes.
//!    Consistent results win immediately, split ones retry with fresh
//!    samples.
//! 2. **Mapping**: accepted identities rewrite their cluster's labels;
//!    clusters without convincing evidence keep their machine label.
//! 3. **Outlier scan**: long utterances are re-identified one by one and
//!    flipped when the roster contradicts the cluster result decisively.
//!
//! Identification mishaps (silent clips, rejected matches, transport
//! failures) cost single votes, never the run.

mod config;
mod corrector;
mod election;
mod error;
mod identify;
mod outlier;
mod sampler;
mod source;
mod tally;


pub use config::CorrectorConfig;
pub use corrector::{Corrector, RunReport};
pub use election::{AcceptReason, ClusterDecision, FailureCounts, RejectReason, Resolution};
pub use error::{CorrectError, Result};
pub use identify::{MIN_CLIP_BYTES, RosterIdentifier, SpeakerIdentifier};
pub use source::{ClipError, SegmentSource, WavFileSource};
pub use tally::{Leader, VoteTally};

pub use quorum_voiceprint::{Identification, IdentifyPolicy};
