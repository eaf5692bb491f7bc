//! Core transcript records.

use serde::{Deserialize, Serialize};

// ================== Transcript ==================

/// A full transcript: the ordered utterances produced by one ASR pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    /// Creates a transcript from a list of utterances.
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self { utterances }
    }

    /// Parses a transcript from JSON.
    ///
    /// Accepts either a bare utterance array or an object with an
    /// `utterances` field, since upstream ASR pipelines ship both shapes.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        if value.is_array() {
            Ok(Self {
                utterances: serde_json::from_value(value)?,
            })
        } else {
            serde_json::from_value(value)
        }
    }

    /// Serializes the transcript to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Number of utterances.
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    /// True when the transcript holds no utterances.
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}

// ================== Utterance ==================

/// One ASR-segmented unit of speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Start time in milliseconds.
    pub start_ms: i64,
    /// End time in milliseconds.
    pub end_ms: i64,
    /// Recognized text.
    pub text: String,
    /// Current speaker label: machine-assigned on input ("Speaker 1"),
    /// a resolved roster identity after correction.
    pub speaker: String,
    /// Machine label this utterance carried before a cluster-level rename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_speaker: Option<String>,
    /// Present only when the outlier scan flipped this utterance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<CorrectionRecord>,
}

impl Utterance {
    /// Creates an utterance with the given time range, text and label.
    pub fn new(
        start_ms: i64,
        end_ms: i64,
        text: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
            speaker: speaker.into(),
            original_speaker: None,
            correction: None,
        }
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

// ================== Correction Record ==================

/// Audit record attached to an utterance the outlier scan flipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// Label before the flip (the cluster-resolved identity).
    pub original: String,
    /// Identity the flip assigned.
    pub corrected: String,
    /// Identification score that justified the flip.
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_from_time_range() {
        let utt = Utterance::new(1500, 5200, "hello", "Speaker 1");
        assert_eq!(utt.duration_ms(), 3700);
    }

    #[test]
    fn parses_bare_array() {
        let json = r#"[
            {"start_ms": 0, "end_ms": 4200, "text": "hi", "speaker": "Speaker 1"},
            {"start_ms": 4200, "end_ms": 9000, "text": "hey", "speaker": "Speaker 2"}
        ]"#;
        let transcript = Transcript::from_json(json).unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.utterances[1].speaker, "Speaker 2");
    }

    #[test]
    fn parses_wrapped_object() {
        let json = r#"{"utterances": [
            {"start_ms": 0, "end_ms": 4200, "text": "hi", "speaker": "Speaker 1"}
        ]}"#;
        let transcript = Transcript::from_json(json).unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.utterances[0].text, "hi");
    }

    #[test]
    fn audit_fields_absent_until_set() {
        let utt = Utterance::new(0, 3000, "morning", "Speaker 1");
        let json = serde_json::to_string(&utt).unwrap();
        assert!(!json.contains("original_speaker"));
        assert!(!json.contains("correction"));
    }

    #[test]
    fn audit_fields_round_trip() {
        let mut utt = Utterance::new(0, 3000, "morning", "Alice");
        utt.original_speaker = Some("Speaker 1".to_string());
        utt.correction = Some(CorrectionRecord {
            original: "Alice".to_string(),
            corrected: "Bob".to_string(),
            score: 0.92,
        });
        let json = serde_json::to_string(&utt).unwrap();
        let back: Utterance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, utt);
    }
}
