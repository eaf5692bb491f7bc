//! Feature-search API client.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::identify::{Identification, IdentifyPolicy};
use crate::roster::RosterService;

/// Default API host.
pub const DEFAULT_HOST: &str = "api.xf-yun.com";

/// Default API path; the final segment doubles as the parameter key in
/// request envelopes.
pub const DEFAULT_PATH: &str = "/v1/private/s1aa729d0";

/// Default maximum number of retries.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Feature-search API client.
///
/// # Example
///
/// ```rust,no_run
/// use quorum_voiceprint::Client;
///
/// # fn main() -> quorum_voiceprint::Result<()> {
/// let client = Client::builder("your-app-id")
///     .api_key("your-api-key")
///     .api_secret("your-api-secret")
///     .group_id("meeting-room")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    http: Arc<HttpClient>,
    app_id: String,
    group_id: String,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder(app_id: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(app_id)
    }

    /// Returns the configured app ID.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the configured voiceprint group.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Returns the roster service (raw lookups and listing).
    pub fn roster(&self) -> RosterService {
        RosterService::new(self.http.clone(), self.app_id.clone(), self.group_id.clone())
    }

    /// Identifies a clip against the roster under `policy`.
    ///
    /// Returns `Ok(None)` when the roster has no candidates for the clip or
    /// the policy rejects the best one; errors are transport/API failures
    /// only.
    pub async fn identify(
        &self,
        clip: &[u8],
        policy: &IdentifyPolicy,
    ) -> Result<Option<Identification>> {
        // At least top-2 so the gap stays observable.
        let top_k = policy.top_k.max(2);
        let candidates = self.roster().search(clip, top_k).await?;
        Ok(policy.decide(&candidates))
    }
}

/// Builder for creating a feature-search API client.
pub struct ClientBuilder {
    app_id: String,
    api_key: Option<String>,
    api_secret: Option<String>,
    group_id: Option<String>,
    host: String,
    path: String,
    max_retries: u32,
    timeout: Duration,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: None,
            api_secret: None,
            group_id: None,
            host: DEFAULT_HOST.to_string(),
            path: DEFAULT_PATH.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the API key used in the authorization descriptor.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API secret used to sign requests.
    pub fn api_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Sets the voiceprint group (roster) to search in.
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    /// Sets a custom API host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets a custom API path. The final path segment becomes the parameter
    /// key in request envelopes.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the maximum number of retries for transient errors.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<Client> {
        if self.app_id.is_empty() {
            return Err(Error::Config("app_id must be non-empty".to_string()));
        }
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("api_key must be provided".to_string()))?;
        let api_secret = self
            .api_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("api_secret must be provided".to_string()))?;
        let group_id = self
            .group_id
            .filter(|g| !g.is_empty())
            .ok_or_else(|| Error::Config("group_id must be provided".to_string()))?;

        let http = HttpClient::new(
            self.host,
            self.path,
            api_key,
            api_secret,
            self.max_retries,
            self.timeout,
        )?;

        Ok(Client {
            http: Arc::new(http),
            app_id: self.app_id,
            group_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_credentials() {
        let err = Client::builder("app").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Client::builder("app").api_key("k").build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Client::builder("")
            .api_key("k")
            .api_secret("s")
            .group_id("g")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn build_with_full_credentials() {
        let client = Client::builder("app")
            .api_key("k")
            .api_secret("s")
            .group_id("g")
            .max_retries(1)
            .build()
            .unwrap();
        assert_eq!(client.app_id(), "app");
        assert_eq!(client.group_id(), "g");
    }

    #[test]
    fn custom_path_rekeys_the_envelopes() {
        let client = Client::builder("app")
            .api_key("k")
            .api_secret("s")
            .group_id("g")
            .path("/v2/private/s9999zzzz")
            .build()
            .unwrap();
        assert_eq!(client.http.service_segment(), "s9999zzzz");
    }
}
