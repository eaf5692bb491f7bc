//! Per-cluster utterance sampling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use quorum_transcript::Utterance;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Picks the utterances a voting round will identify.
///
/// Long utterances carry more speech and identify more reliably, so
/// sampling prefers those of at least `min_duration_ms`; a cluster with
/// none falls back to its whole membership rather than sitting the vote
/// out. Draws are uniform without replacement.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    count: usize,
    min_duration_ms: i64,
}

impl Sampler {
    pub fn new(count: usize, min_duration_ms: i64) -> Self {
        Self {
            count,
            min_duration_ms,
        }
    }

    /// Samples up to `count` distinct positions from `indices` (positions
    /// into `utterances`).
    pub fn sample(
        &self,
        utterances: &[Utterance],
        indices: &[usize],
        rng: &mut StdRng,
    ) -> Vec<usize> {
        let eligible: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| utterances[i].duration_ms() >= self.min_duration_ms)
            .collect();
        let pool: &[usize] = if eligible.is_empty() { indices } else { &eligible };
        pool.choose_multiple(rng, self.count).copied().collect()
    }
}

/// Stable per-cluster RNG: the run seed mixed with a hash of the label.
///
/// Every cluster draws from its own stream, so a seeded run samples the
/// same utterances no matter how concurrent elections interleave.
pub(crate) fn cluster_rng(seed: Option<u64>, label: &str) -> StdRng {
    match seed {
        Some(seed) => {
            let mut hasher = DefaultHasher::new();
            label.hash(&mut hasher);
            StdRng::seed_from_u64(seed ^ hasher.finish())
        }
        None => StdRng::from_entropy(),
    }
}
