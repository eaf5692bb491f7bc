//! Vote accumulation for one election round.

use std::collections::BTreeMap;

/// Votes for one cluster, keyed by identity name.
///
/// A tally is built fresh per voting round; a retry re-votes from scratch
/// instead of topping up the previous round.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTally {
    scores: BTreeMap<String, Vec<f32>>,
}

/// The identity currently ahead in a tally.
#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub name: String,
    pub count: usize,
    pub avg_score: f32,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one vote.
    pub fn record(&mut self, name: impl Into<String>, score: f32) {
        self.scores.entry(name.into()).or_default().push(score);
    }

    /// Total votes recorded.
    pub fn total(&self) -> usize {
        self.scores.values().map(Vec::len).sum()
    }

    /// Votes for one identity.
    pub fn count(&self, name: &str) -> usize {
        self.scores.get(name).map(Vec::len).unwrap_or(0)
    }

    /// Mean score of the votes for one identity; zero when it has none.
    pub fn avg_score(&self, name: &str) -> f32 {
        match self.scores.get(name) {
            Some(scores) if !scores.is_empty() => {
                scores.iter().sum::<f32>() / scores.len() as f32
            }
            _ => 0.0,
        }
    }

    /// The leading identity: most votes, ties broken by higher average
    /// score, then by lexicographically smaller name.
    pub fn leader(&self) -> Option<Leader> {
        self.scores
            .iter()
            .map(|(name, scores)| Leader {
                name: name.clone(),
                count: scores.len(),
                avg_score: scores.iter().sum::<f32>() / scores.len() as f32,
            })
            .max_by(|a, b| {
                a.count
                    .cmp(&b.count)
                    .then(a.avg_score.total_cmp(&b.avg_score))
                    .then(b.name.cmp(&a.name))
            })
    }

    /// Leader share of the total vote; zero for an empty tally.
    pub fn consistency(&self) -> f32 {
        match self.leader() {
            Some(leader) => leader.count as f32 / self.total() as f32,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_has_most_votes() {
        let mut tally = VoteTally::new();
        tally.record("Alice", 0.7);
        tally.record("Alice", 0.6);
        tally.record("Bob", 0.9);

        let leader = tally.leader().unwrap();
        assert_eq!(leader.name, "Alice");
        assert_eq!(leader.count, 2);
        assert!((leader.avg_score - 0.65).abs() < 1e-6);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn count_tie_breaks_on_average_score() {
        let mut tally = VoteTally::new();
        tally.record("Alice", 0.5);
        tally.record("Alice", 0.9);
        tally.record("Bob", 0.6);
        tally.record("Bob", 0.6);

        assert_eq!(tally.leader().unwrap().name, "Alice");
    }

    #[test]
    fn full_tie_breaks_on_name() {
        let mut tally = VoteTally::new();
        tally.record("Bob", 0.5);
        tally.record("Alice", 0.5);

        assert_eq!(tally.leader().unwrap().name, "Alice");
    }

    #[test]
    fn consistency_is_leader_share() {
        let mut tally = VoteTally::new();
        for _ in 0..3 {
            tally.record("Alice", 0.8);
        }
        tally.record("Bob", 0.8);
        tally.record("Carol", 0.8);

        assert!((tally.consistency() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn empty_tally_has_no_leader() {
        let tally = VoteTally::new();
        assert!(tally.leader().is_none());
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.consistency(), 0.0);
    }

    #[test]
    fn per_identity_lookups() {
        let mut tally = VoteTally::new();
        tally.record("Alice", 0.4);
        tally.record("Alice", 0.6);

        assert_eq!(tally.count("Alice"), 2);
        assert_eq!(tally.count("Bob"), 0);
        assert!((tally.avg_score("Alice") - 0.5).abs() < 1e-6);
        assert_eq!(tally.avg_score("Bob"), 0.0);
    }
}
