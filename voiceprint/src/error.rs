//! Error types for the voice feature-search client.

use thiserror::Error;

/// Result type alias for feature-search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for feature-search API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by the feature-search service.
    #[error("voiceprint api: {message} (code={code}, sid={sid})")]
    Api {
        code: i32,
        message: String,
        sid: String,
        http_status: u16,
    },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 payload decoding error.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Response is missing an expected payload section.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new API error without a session id.
    pub fn api(code: i32, message: impl Into<String>, http_status: u16) -> Self {
        Error::Api {
            code,
            message: message.into(),
            sid: String::new(),
            http_status,
        }
    }

    /// Returns true if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Api { http_status, .. } => *http_status == 401 || *http_status == 403,
            _ => false,
        }
    }

    /// Returns true if this is a rate limit error.
    ///
    /// Covers HTTP 429 plus the service's daily/per-second/concurrency
    /// flow-control codes (11201, 11202, 11203).
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Error::Api {
                code, http_status, ..
            } => *http_status == 429 || matches!(code, 11201 | 11202 | 11203),
            _ => false,
        }
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { http_status, .. } => *http_status >= 500,
            _ => false,
        }
    }

    /// Returns true if the request can be retried.
    pub fn is_retryable(&self) -> bool {
        self.is_rate_limit() || self.is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_by_http_status() {
        assert!(Error::api(0, "denied", 401).is_auth_error());
        assert!(Error::api(0, "denied", 403).is_auth_error());
        assert!(!Error::api(0, "denied", 500).is_auth_error());
    }

    #[test]
    fn flow_control_codes_are_retryable() {
        assert!(Error::api(11201, "daily quota", 200).is_retryable());
        assert!(Error::api(11202, "qps limit", 200).is_retryable());
        assert!(Error::api(0, "overloaded", 503).is_retryable());
        assert!(!Error::api(10313, "invalid appid", 200).is_retryable());
    }
}
