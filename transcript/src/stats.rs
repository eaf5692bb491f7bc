//! Run-level counters reported alongside the corrected transcript.

use serde::Serialize;

/// Counters for one correction run, reset per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Labels collapsed into an identity already claimed by another label.
    pub merge_count: usize,
    /// Utterances individually flipped by the outlier scan.
    pub correction_count: usize,
    /// Utterances long enough to be submitted to the outlier scan.
    pub outliers_checked: usize,
    /// Labels that resolved to a roster identity.
    pub clusters_resolved: usize,
}
