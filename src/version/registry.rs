//! Source trait for looking up the latest published release

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Utc};

use crate::version::error::FetchError;

/// Where a lookup is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Host-supplied endpoint, tried first
    Custom(String),
    /// Public store lookup
    Default(String),
}

impl Endpoint {
    pub fn url(&self) -> &str {
        match self {
            Endpoint::Custom(url) | Endpoint::Default(url) => url,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Endpoint::Custom(_))
    }
}

/// Release descriptor returned by a lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRelease {
    pub version: Option<String>,
    /// Installed versions below this must upgrade
    pub mandatory_version: Option<String>,
    pub released_at: Option<DateTime<Utc>>,
}

impl RemoteRelease {
    pub fn new(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Default::default()
        }
    }

    pub fn with_mandatory_version(mut self, mandatory_version: &str) -> Self {
        self.mandatory_version = Some(mandatory_version.to_string());
        self
    }

    pub fn with_released_at(mut self, released_at: DateTime<Utc>) -> Self {
        self.released_at = Some(released_at);
        self
    }
}

/// Fetches the latest release descriptor for the configured app
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Look up the latest release at `endpoint`
    ///
    /// # Returns
    /// * `Ok(Some(release))` - The first lookup result
    /// * `Ok(None)` - The lookup succeeded but listed no results
    /// * `Err(FetchError)` - Transport failure or malformed payload
    async fn fetch_release(&self, endpoint: &Endpoint) -> Result<Option<RemoteRelease>, FetchError>;
}
