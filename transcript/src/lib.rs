//! Transcript data model for speaker-label correction.
//!
//! An ASR transcript is an ordered list of [`Utterance`]s, each carrying a
//! machine-assigned speaker label ("Speaker 1", "Speaker 2", ...). Correction
//! rewrites those labels in place and leaves an audit trail: cluster-level
//! renames preserve the machine label in `original_speaker`, per-utterance
//! flips attach a [`CorrectionRecord`].
//!
//! Clusters are derived, never stored: [`cluster_labels`] and
//! [`cluster_indices`] recompute the grouping from the current labels, so the
//! view stays consistent after any rename.

mod cluster;
mod mapping;
mod model;
mod stats;

pub use cluster::{cluster_indices, cluster_labels};
pub use mapping::IdentityMapping;
pub use model::{CorrectionRecord, Transcript, Utterance};
pub use stats::RunStatistics;
