//! Engine tuning knobs.

use serde::{Deserialize, Serialize};

/// Tuning for a correction run.
///
/// Every field carries a serde default, so a config file only needs to
/// name the knobs it changes. The defaults are the tuning the engine
/// ships with; tests override the delays to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectorConfig {
    /// Utterances sampled from a cluster per voting round.
    pub sample_count: usize,
    /// Minimum utterance length eligible for voting samples, in ms.
    pub min_sample_duration_ms: i64,
    /// Minimum utterance length the outlier scan will re-check, in ms.
    pub min_check_duration_ms: i64,
    /// Resampling retries after a cluster's initial voting round.
    pub max_retries: u32,
    /// Leader share of the votes at which retrying stops early.
    pub consistency_threshold: f32,
    /// Minimum leader share for a majority acceptance.
    pub vote_ratio_threshold: f32,
    /// Minimum leader average score accompanying a majority acceptance.
    pub min_avg_score: f32,
    /// Leader average score that accepts on its own, majority or not.
    pub confirm_score: f32,
    /// Identification score at which the outlier scan flips a label.
    pub correction_score: f32,
    /// Pause between identification calls within a voting round, in ms.
    pub vote_call_delay_ms: u64,
    /// Pause before a fresh voting round, in ms.
    pub retry_delay_ms: u64,
    /// Pause between outlier-scan calls, in ms.
    pub scan_call_delay_ms: u64,
    /// Clusters whose elections run concurrently.
    pub election_workers: usize,
    /// Concurrent audio extractions across the whole run.
    pub extract_workers: usize,
    /// Fixed sampling seed; sampling is random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            sample_count: 5,
            min_sample_duration_ms: 4000,
            min_check_duration_ms: 2000,
            max_retries: 5,
            consistency_threshold: 0.7,
            vote_ratio_threshold: 0.6,
            min_avg_score: 0.40,
            confirm_score: 0.50,
            correction_score: 0.90,
            vote_call_delay_ms: 500,
            retry_delay_ms: 1000,
            scan_call_delay_ms: 300,
            election_workers: 2,
            extract_workers: 4,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = CorrectorConfig::default();
        assert_eq!(config.sample_count, 5);
        assert_eq!(config.min_sample_duration_ms, 4000);
        assert_eq!(config.min_check_duration_ms, 2000);
        assert_eq!(config.max_retries, 5);
        assert!((config.consistency_threshold - 0.7).abs() < 1e-6);
        assert!((config.vote_ratio_threshold - 0.6).abs() < 1e-6);
        assert!((config.min_avg_score - 0.40).abs() < 1e-6);
        assert!((config.confirm_score - 0.50).abs() < 1e-6);
        assert!((config.correction_score - 0.90).abs() < 1e-6);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: CorrectorConfig =
            serde_yaml::from_str("sample_count: 7\nconsistency_threshold: 0.9\nseed: 42\n")
                .unwrap();
        assert_eq!(config.sample_count, 7);
        assert!((config.consistency_threshold - 0.9).abs() < 1e-6);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.election_workers, 2);
    }
}
