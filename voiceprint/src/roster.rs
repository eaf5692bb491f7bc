//! Roster operations: 1:N clip lookup and feature listing.

use std::sync::Arc;

use crate::error::Result;
use crate::http::HttpClient;
use crate::identify::Candidate;
use crate::protocol::{self, FeatureEntry, SearchResult};

/// Service for querying the voiceprint group.
pub struct RosterService {
    http: Arc<HttpClient>,
    app_id: String,
    group_id: String,
}

impl RosterService {
    pub(crate) fn new(http: Arc<HttpClient>, app_id: String, group_id: String) -> Self {
        Self {
            http,
            app_id,
            group_id,
        }
    }

    /// Searches the group for the `top_k` candidates most similar to the
    /// clip (mono 16 kHz 16-bit PCM WAV).
    ///
    /// Returns candidates in descending score order; an empty list means the
    /// roster produced no usable match.
    pub async fn search(&self, clip: &[u8], top_k: u32) -> Result<Vec<Candidate>> {
        let request = protocol::search_request(
            self.http.service_segment(),
            &self.app_id,
            &self.group_id,
            top_k,
            clip,
        );
        let envelope = self.http.post(&request).await?;
        let result: SearchResult = envelope.decode_section("searchFeaRes")?;

        let mut candidates: Vec<Candidate> = result
            .score_list
            .into_iter()
            .map(|entry| {
                let name = if entry.feature_info.is_empty() {
                    entry.feature_id.clone()
                } else {
                    entry.feature_info
                };
                Candidate {
                    feature_id: entry.feature_id,
                    name,
                    score: entry.score,
                }
            })
            .collect();
        // Servers return descending order; enforce it anyway.
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(
            group = %self.group_id,
            candidates = candidates.len(),
            top_score = candidates.first().map(|c| c.score).unwrap_or(0.0),
            "roster search complete"
        );

        Ok(candidates)
    }

    /// Lists the features enrolled in the group.
    pub async fn list(&self) -> Result<Vec<FeatureEntry>> {
        let request = protocol::query_feature_list_request(
            self.http.service_segment(),
            &self.app_id,
            &self.group_id,
        );
        let envelope = self.http.post(&request).await?;
        let entries: Vec<FeatureEntry> = envelope.decode_section("queryFeatureListRes")?;
        Ok(entries)
    }
}
