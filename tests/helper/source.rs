//! Lookup source test utilities

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use release_alert::config::EngineConfig;
use release_alert::version::engine::UpdateEngine;
use release_alert::version::error::FetchError;
use release_alert::version::localize::BundledLocalizer;
use release_alert::version::registry::{Endpoint, RemoteRelease, VersionSource};
use release_alert::version::store::KeyValueStore;

type Response = Result<Option<RemoteRelease>, FetchError>;

/// Source replaying queued responses and recording requested endpoints.
///
/// Once the queue is drained the last response is repeated.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Response>>,
    last: Mutex<Option<Response>>,
    requests: Mutex<Vec<Endpoint>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: Response) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_release(self, release: RemoteRelease) -> Self {
        self.respond(Ok(Some(release)))
    }

    pub fn requests(&self) -> Vec<Endpoint> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionSource for ScriptedSource {
    async fn fetch_release(&self, endpoint: &Endpoint) -> Response {
        self.requests.lock().unwrap().push(endpoint.clone());

        let next = self.responses.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(response) = next {
            *last = Some(response);
        }
        last.clone().unwrap_or(Ok(None))
    }
}

/// Fixed reference instant for scenarios
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Build an engine over the given source and store
pub fn create_engine(
    config: EngineConfig,
    installed: &str,
    source: Arc<ScriptedSource>,
    store: Arc<dyn KeyValueStore>,
) -> UpdateEngine {
    UpdateEngine::new(config, installed, source, store, Arc::new(BundledLocalizer)).unwrap()
}
