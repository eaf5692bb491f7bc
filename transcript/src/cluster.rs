//! Derived cluster views over a transcript.
//!
//! A cluster is the set of utterances currently sharing one speaker label.
//! Labels change during correction, so clusters are always recomputed from
//! the utterance list instead of being cached anywhere.

use crate::model::Utterance;

/// Distinct speaker labels in first-appearance order.
pub fn cluster_labels(utterances: &[Utterance]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for utt in utterances {
        if !labels.iter().any(|l| l == &utt.speaker) {
            labels.push(utt.speaker.clone());
        }
    }
    labels
}

/// Indices of the utterances currently labeled `label`.
pub fn cluster_indices(utterances: &[Utterance], label: &str) -> Vec<usize> {
    utterances
        .iter()
        .enumerate()
        .filter(|(_, utt)| utt.speaker == label)
        .map(|(i, _)| i)
        .collect()
}
