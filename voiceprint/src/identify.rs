//! Identification decision rule over ranked roster candidates.

use serde::{Deserialize, Serialize};

// ================== Candidates ==================

/// One ranked candidate from a roster lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable feature id within the group.
    pub feature_id: String,
    /// Display name recorded at enrollment.
    pub name: String,
    /// Similarity score in [0, 1].
    pub score: f32,
}

/// An accepted identification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    /// Winning identity name.
    pub name: String,
    /// Winning score.
    pub score: f32,
    /// True when the match was accepted below the absolute threshold
    /// because it was far ahead of the runner-up.
    pub rescued: bool,
}

// ================== Policy ==================

/// Thresholds turning a ranked candidate list into an accept/reject
/// decision.
///
/// Three outcomes, checked in order against the top score `s1` and the
/// runner-up score `s2`:
///
/// 1. `s1 >= confidence_threshold`: accept directly.
/// 2. `s1 >= min_accept_score` and `s1 - s2 >= gap_threshold`: accept with
///    `rescued = true`; a clear runaway winner in a closed roster is
///    trustworthy even when its absolute score is mediocre ("gap rescue",
///    built for short clips).
/// 3. Otherwise reject.
///
/// A `confidence_threshold` of zero disables gating entirely and always
/// returns the top candidate; see [`IdentifyPolicy::unconditional`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdentifyPolicy {
    /// Absolute score at which a match is accepted outright.
    pub confidence_threshold: f32,
    /// Floor below which even a runaway winner is rejected.
    pub min_accept_score: f32,
    /// Minimum lead over the runner-up for a gap rescue.
    pub gap_threshold: f32,
    /// Candidates to request from the roster; at least 2 so the gap is
    /// always observable.
    pub top_k: u32,
}

impl Default for IdentifyPolicy {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.60,
            min_accept_score: 0.35,
            gap_threshold: 0.20,
            top_k: 2,
        }
    }
}

impl IdentifyPolicy {
    /// Policy that always returns the top candidate, whatever its score.
    ///
    /// This is the mode the correction engine runs for every voting and
    /// outlier call: thresholding happens downstream, on aggregated votes
    /// rather than single lookups, so the gating in [`decide`] is bypassed
    /// along that path. Stricter call sites (the CLI's single-clip
    /// identification, for one) use the thresholded default instead.
    ///
    /// [`decide`]: IdentifyPolicy::decide
    pub fn unconditional() -> Self {
        Self {
            confidence_threshold: 0.0,
            min_accept_score: 0.0,
            gap_threshold: 0.0,
            top_k: 2,
        }
    }

    /// True when gating is disabled and the top candidate always wins.
    pub fn is_unconditional(&self) -> bool {
        self.confidence_threshold <= 0.0
    }

    /// Applies the decision rule to a ranked candidate list.
    ///
    /// `candidates` must be sorted by descending score. Returns `None` for
    /// an empty list or a rejection.
    pub fn decide(&self, candidates: &[Candidate]) -> Option<Identification> {
        let top1 = candidates.first()?;
        let s1 = top1.score;
        let s2 = candidates.get(1).map(|c| c.score).unwrap_or(0.0);

        if self.is_unconditional() || s1 >= self.confidence_threshold {
            return Some(Identification {
                name: top1.name.clone(),
                score: s1,
                rescued: false,
            });
        }

        if s1 >= self.min_accept_score && (s1 - s2) >= self.gap_threshold {
            return Some(Identification {
                name: top1.name.clone(),
                score: s1,
                rescued: true,
            });
        }

        None
    }
}
