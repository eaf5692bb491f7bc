//! Signed HTTP transport for the feature-search API.

use std::time::Duration;

use reqwest::{
    Client as ReqwestClient, Response,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;

use crate::auth;
use crate::error::{Error, Result};
use crate::protocol::Envelope;

/// HTTP client carrying the signing credentials.
#[derive(Debug)]
pub(crate) struct HttpClient {
    client: ReqwestClient,
    host: String,
    path: String,
    segment: String,
    api_key: String,
    api_secret: String,
    max_retries: u32,
}

impl HttpClient {
    /// Creates a new HTTP client.
    pub(crate) fn new(
        host: String,
        path: String,
        api_key: String,
        api_secret: String,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        // The service id keys the request envelopes and is the path's last
        // segment, so a custom path carries its own envelope key.
        let segment = path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            client,
            host,
            path,
            segment,
            api_key,
            api_secret,
            max_retries,
        })
    }

    /// Service id keying the request envelopes, derived from the path.
    pub(crate) fn service_segment(&self) -> &str {
        &self.segment
    }

    /// POSTs one request envelope with retry support.
    pub(crate) async fn post(&self, body: &Value) -> Result<Envelope> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ...
                let backoff = Duration::from_secs(1 << (attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            match self.do_post(body).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) => {
                    if e.is_retryable() {
                        tracing::warn!(attempt, error = %e, "feature-search call failed, retrying");
                        last_err = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Config("max retries exceeded".to_string())))
    }

    /// Performs a single signed POST.
    async fn do_post(&self, body: &Value) -> Result<Envelope> {
        let url = format!("https://{}{}", self.host, self.path);
        // Fresh signature per attempt; signed dates go stale.
        let query = auth::signed_query(&self.host, &self.path, &self.api_key, &self.api_secret);

        let response = self
            .client
            .post(&url)
            .query(&query)
            .headers(self.default_headers())
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("quorum-voiceprint-rust/1.0"),
        );
        headers
    }

    /// Handles the API response, surfacing business errors in the header.
    async fn handle_response(&self, response: Response) -> Result<Envelope> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(self.parse_error(&body, status.as_u16()));
        }

        let envelope: Envelope = serde_json::from_slice(&body)?;
        if envelope.header.code != 0 {
            return Err(Error::Api {
                code: envelope.header.code,
                message: envelope.header.message,
                sid: envelope.header.sid,
                http_status: status.as_u16(),
            });
        }

        Ok(envelope)
    }

    /// Parses an error response body.
    fn parse_error(&self, body: &[u8], http_status: u16) -> Error {
        if let Ok(envelope) = serde_json::from_slice::<Envelope>(body) {
            if envelope.header.code != 0 || !envelope.header.message.is_empty() {
                return Error::Api {
                    code: envelope.header.code,
                    message: envelope.header.message,
                    sid: envelope.header.sid,
                    http_status,
                };
            }
        }

        Error::Api {
            code: http_status as i32,
            message: String::from_utf8_lossy(body).to_string(),
            sid: String::new(),
            http_status,
        }
    }
}
