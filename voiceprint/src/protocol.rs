//! Wire types for the feature-search API.
//!
//! Requests are a three-part JSON envelope (`header` / `parameter` /
//! `payload`); the function to invoke and its options live under the
//! service segment key (the API path's last segment) inside `parameter`.
//! Responses mirror the shape, with the interesting part base64-encoded
//! inside `payload.<func>Res.text`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};

// ================== Request Assembly ==================

/// Result-section options shared by every function (`utf8`/`raw`/`json`).
fn result_options() -> Value {
    json!({
        "encoding": "utf8",
        "compress": "raw",
        "format": "json"
    })
}

/// Audio payload resource: base64 clip plus its fixed PCM parameters.
/// The service accepts mono 16 kHz 16-bit audio only.
fn audio_resource(audio: &[u8]) -> Value {
    json!({
        "encoding": "raw",
        "sample_rate": 16000,
        "channels": 1,
        "bit_depth": 16,
        "status": 3,
        "audio": BASE64.encode(audio)
    })
}

/// Envelope for `searchFea`: 1:N lookup of a clip against the group.
pub(crate) fn search_request(
    segment: &str,
    app_id: &str,
    group_id: &str,
    top_k: u32,
    audio: &[u8],
) -> Value {
    json!({
        "header": {
            "app_id": app_id,
            "status": 3
        },
        "parameter": {
            segment: {
                "func": "searchFea",
                "groupId": group_id,
                "topK": top_k,
                "searchFeaRes": result_options()
            }
        },
        "payload": {
            "resource": audio_resource(audio)
        }
    })
}

/// Envelope for `queryFeatureList`: enumerates the group's enrolled features.
/// No audio payload.
pub(crate) fn query_feature_list_request(segment: &str, app_id: &str, group_id: &str) -> Value {
    json!({
        "header": {
            "app_id": app_id,
            "status": 3
        },
        "parameter": {
            segment: {
                "func": "queryFeatureList",
                "groupId": group_id,
                "queryFeatureListRes": result_options()
            }
        }
    })
}

// ================== Response Types ==================

/// Response header carried by every reply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseHeader {
    /// Business status code; 0 is success.
    #[serde(default)]
    pub code: i32,
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// Session id for support lookups.
    #[serde(default)]
    pub sid: String,
}

/// Full response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub(crate) header: ResponseHeader,
    #[serde(default)]
    pub(crate) payload: Value,
}

impl Envelope {
    /// Decodes `payload.<section>.text` (base64 JSON) into `T`.
    pub(crate) fn decode_section<T: serde::de::DeserializeOwned>(&self, section: &str) -> Result<T> {
        let text = self.payload[section]["text"]
            .as_str()
            .ok_or_else(|| Error::MalformedResponse(format!("missing {section}.text")))?;
        let bytes = BASE64.decode(text)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Decoded `searchFeaRes` text.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResult {
    #[serde(default, rename = "scoreList")]
    pub(crate) score_list: Vec<ScoreEntry>,
}

/// One ranked roster hit.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScoreEntry {
    #[serde(default, rename = "featureId")]
    pub(crate) feature_id: String,
    #[serde(default, rename = "featureInfo")]
    pub(crate) feature_info: String,
    #[serde(default)]
    pub(crate) score: f32,
}

/// One enrolled roster feature, as listed by `queryFeatureList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEntry {
    /// Stable feature id within the group.
    #[serde(default, rename = "featureId")]
    pub feature_id: String,
    /// Display info recorded at enrollment, normally the person's name.
    #[serde(default, rename = "featureInfo")]
    pub feature_info: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_shape() {
        let req = search_request("s1aa729d0", "app-1", "group-1", 2, b"RIFFxxxx");
        assert_eq!(req["header"]["app_id"], "app-1");
        assert_eq!(req["parameter"]["s1aa729d0"]["func"], "searchFea");
        assert_eq!(req["parameter"]["s1aa729d0"]["groupId"], "group-1");
        assert_eq!(req["parameter"]["s1aa729d0"]["topK"], 2);
        let resource = &req["payload"]["resource"];
        assert_eq!(resource["sample_rate"], 16000);
        assert_eq!(resource["channels"], 1);
        assert_eq!(resource["bit_depth"], 16);
        assert_eq!(
            resource["audio"].as_str().unwrap(),
            BASE64.encode(b"RIFFxxxx")
        );
    }

    #[test]
    fn list_request_has_no_payload() {
        let req = query_feature_list_request("s1aa729d0", "app-1", "group-1");
        assert_eq!(
            req["parameter"]["s1aa729d0"]["func"],
            "queryFeatureList"
        );
        assert!(req.get("payload").is_none());
    }

    #[test]
    fn parameter_key_follows_the_segment() {
        let req = search_request("s9999zzzz", "app-1", "group-1", 2, b"RIFF");
        assert_eq!(req["parameter"]["s9999zzzz"]["func"], "searchFea");
        assert!(req["parameter"]["s1aa729d0"].is_null());
    }

    #[test]
    fn decodes_base64_section() {
        let inner = json!({
            "scoreList": [
                {"featureId": "f1", "featureInfo": "Alice", "score": 0.83},
                {"featureId": "f2", "featureInfo": "Bob", "score": 0.41}
            ]
        });
        let text = BASE64.encode(serde_json::to_vec(&inner).unwrap());
        let envelope: Envelope = serde_json::from_value(json!({
            "header": {"code": 0, "message": "success", "sid": "ase000"},
            "payload": {"searchFeaRes": {"text": text}}
        }))
        .unwrap();

        let result: SearchResult = envelope.decode_section("searchFeaRes").unwrap();
        assert_eq!(result.score_list.len(), 2);
        assert_eq!(result.score_list[0].feature_info, "Alice");
        assert!((result.score_list[1].score - 0.41).abs() < 1e-6);
    }

    #[test]
    fn missing_section_is_malformed() {
        let envelope: Envelope = serde_json::from_value(json!({
            "header": {"code": 0, "message": "success", "sid": ""},
            "payload": {}
        }))
        .unwrap();
        let err = envelope
            .decode_section::<SearchResult>("searchFeaRes")
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
