//! Label-to-identity mapping produced by the election stage.

use std::collections::BTreeMap;

use serde::Serialize;

/// Final `speaker_label -> identity` relation covering every label seen in
/// the transcript. A label without strong evidence maps to itself, so
/// resolving through the mapping is always total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IdentityMapping {
    entries: BTreeMap<String, String>,
}

impl IdentityMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the resolution for one label, replacing any previous entry.
    pub fn insert(&mut self, label: impl Into<String>, identity: impl Into<String>) {
        self.entries.insert(label.into(), identity.into());
    }

    /// Resolved identity for `label`; the label itself when there is no
    /// entry (fail-open).
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.entries.get(label).map(String::as_str).unwrap_or(label)
    }

    /// True when `label` resolves to itself.
    pub fn is_identity(&self, label: &str) -> bool {
        self.resolve(label) == label
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(label, identity)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge bookkeeping: every identity claimed by more than one label
    /// contributes `claimants - 1` to the total. Fail-open self-maps are
    /// not claims and never count.
    pub fn merge_count(&self) -> usize {
        let mut claims: BTreeMap<&str, usize> = BTreeMap::new();
        for (label, identity) in &self.entries {
            if label == identity {
                continue;
            }
            *claims.entry(identity.as_str()).or_insert(0) += 1;
        }
        claims.values().filter(|&&c| c > 1).map(|&c| c - 1).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_label_maps_to_itself() {
        let mapping = IdentityMapping::new();
        assert_eq!(mapping.resolve("Speaker 1"), "Speaker 1");
        assert!(mapping.is_identity("Speaker 1"));
    }

    #[test]
    fn resolved_label_maps_to_identity() {
        let mut mapping = IdentityMapping::new();
        mapping.insert("Speaker 1", "Alice");
        assert_eq!(mapping.resolve("Speaker 1"), "Alice");
        assert!(!mapping.is_identity("Speaker 1"));
    }

    #[test]
    fn merge_counts_multi_claimed_identities() {
        let mut mapping = IdentityMapping::new();
        mapping.insert("Speaker 1", "Alice");
        mapping.insert("Speaker 2", "Alice");
        mapping.insert("Speaker 3", "Alice");
        mapping.insert("Speaker 4", "Bob");
        mapping.insert("Speaker 5", "Speaker 5");
        // Alice claimed by three labels: 3 - 1 = 2 merges.
        assert_eq!(mapping.merge_count(), 2);
    }

    #[test]
    fn self_maps_do_not_merge() {
        let mut mapping = IdentityMapping::new();
        mapping.insert("Speaker 1", "Speaker 1");
        mapping.insert("Speaker 2", "Speaker 2");
        assert_eq!(mapping.merge_count(), 0);
    }

    #[test]
    fn self_map_sharing_a_claimed_name_does_not_merge() {
        // A label left as-is happens to spell an identity another label
        // resolved to; only the real claim counts.
        let mut mapping = IdentityMapping::new();
        mapping.insert("Bob", "Bob");
        mapping.insert("Speaker 2", "Bob");
        assert_eq!(mapping.merge_count(), 0);

        // A second genuine claimant still registers one merge.
        mapping.insert("Speaker 3", "Bob");
        assert_eq!(mapping.merge_count(), 1);
    }
}
