//! HTTP lookup against store-style JSON endpoints

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::error::FetchError;
use crate::version::registry::{Endpoint, RemoteRelease, VersionSource};

/// Lookup payload: either a store listing or a single bare entry
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LookupResponse {
    Listing { results: Vec<LookupEntry> },
    Single(LookupEntry),
}

#[derive(Debug, Deserialize)]
struct LookupEntry {
    version: Option<String>,
    #[serde(alias = "mandatoryVersion")]
    mandatory_version: Option<String>,
    #[serde(rename = "currentVersionReleaseDate")]
    released_at: Option<DateTime<Utc>>,
}

impl From<LookupEntry> for RemoteRelease {
    fn from(entry: LookupEntry) -> Self {
        RemoteRelease {
            version: entry.version,
            mandatory_version: entry.mandatory_version,
            released_at: entry.released_at,
        }
    }
}

/// [`VersionSource`] issuing one GET per lookup
pub struct HttpVersionSource {
    client: reqwest::Client,
}

impl HttpVersionSource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("release-alert/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn parse_body(body: &str) -> Result<Option<RemoteRelease>, FetchError> {
        let response: LookupResponse =
            serde_json::from_str(body).map_err(|e| FetchError::Format(e.to_string()))?;

        let entry = match response {
            LookupResponse::Listing { results } => results.into_iter().next(),
            LookupResponse::Single(entry) => Some(entry),
        };

        Ok(entry.map(RemoteRelease::from))
    }
}

#[async_trait::async_trait]
impl VersionSource for HttpVersionSource {
    async fn fetch_release(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Option<RemoteRelease>, FetchError> {
        let url = endpoint.url();
        debug!("Looking up latest release at {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("Lookup returned status {}: {}", status, url);
            return Err(FetchError::Transport(format!("Unexpected status: {}", status)));
        }

        let body = response.text().await?;
        Self::parse_body(&body).inspect_err(|e| warn!("Failed to parse lookup response: {}", e))
    }
}
