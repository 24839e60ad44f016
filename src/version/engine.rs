//! Update check orchestration.
//!
//! One run walks `Idle -> Fetching -> Evaluating -> Deciding` and ends in a
//! [`RunOutcome`]. Runs are serialized: a run requested while another is in
//! flight returns [`RunOutcome::Busy`] without touching state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::version::decision::{AlertDecision, Prompt, SuppressReason, UserAction};
use crate::version::error::{ConfigError, FetchError};
use crate::version::localize::{Localizer, MessageKey};
use crate::version::policy::{
    AlertPolicyConfig, AlertStrength, resolve_frequency, resolve_strength,
};
use crate::version::registry::{Endpoint, RemoteRelease, VersionSource};
use crate::version::semver::{SemanticVersion, compare};
use crate::version::skip::{is_skipped, record_skip};
use crate::version::state::CheckState;
use crate::version::store::KeyValueStore;
use crate::version::throttle::{CheckFrequency, days_elapsed, is_due};

/// How a check run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Last lookup is too recent for the requested frequency
    NotDue,
    /// Another run is in flight
    Busy,
    /// The lookup listed no releases
    NoUpdate,
    /// Lookup failed or its result was unusable; diagnostic only. A result
    /// that arrived but lacked a usable version still records the check time.
    FetchFailed(FetchError),
    Decided(AlertDecision),
}

impl RunOutcome {
    pub fn decision(&self) -> Option<&AlertDecision> {
        match self {
            RunOutcome::Decided(decision) => Some(decision),
            _ => None,
        }
    }
}

pub struct UpdateEngine {
    config: EngineConfig,
    policy: AlertPolicyConfig,
    installed: SemanticVersion,
    source: Arc<dyn VersionSource>,
    store: Arc<dyn KeyValueStore>,
    localizer: Arc<dyn Localizer>,
    state: Mutex<CheckState>,
}

impl UpdateEngine {
    /// Create an engine for the app at `installed_version`.
    ///
    /// Loads persisted state from `store` once; fails if the config has no
    /// app identifier.
    pub fn new(
        config: EngineConfig,
        installed_version: &str,
        source: Arc<dyn VersionSource>,
        store: Arc<dyn KeyValueStore>,
        localizer: Arc<dyn Localizer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = CheckState::load(store.as_ref());
        debug!("Loaded check state: {:?}", state);

        Ok(Self {
            policy: config.policy(),
            installed: SemanticVersion::parse(installed_version),
            config,
            source,
            store,
            localizer,
            state: Mutex::new(state),
        })
    }

    /// Snapshot of the current check state
    pub async fn state(&self) -> CheckState {
        self.state.lock().await.clone()
    }

    /// Run a check now, gated by `frequency` against the last lookup
    pub async fn run_check(&self, frequency: CheckFrequency) -> RunOutcome {
        self.run_check_at(frequency, Utc::now()).await
    }

    /// Run a check as if the current time were `now`
    pub async fn run_check_at(&self, frequency: CheckFrequency, now: DateTime<Utc>) -> RunOutcome {
        let Ok(mut state) = self.state.try_lock() else {
            info!("Ignoring check request: another check is in flight");
            return RunOutcome::Busy;
        };

        if !is_due(state.last_check, frequency, now) {
            debug!("Skipping lookup: last check at {:?}", state.last_check);
            return RunOutcome::NotDue;
        }

        let release = match self.lookup().await {
            Ok(release) => release,
            Err(e) => {
                warn!("Update check failed: {}", e);
                return RunOutcome::FetchFailed(e);
            }
        };

        state.mark_checked(self.store.as_ref(), now);

        let Some(release) = release else {
            info!("Lookup returned no results for {}", self.config.app_identifier);
            return RunOutcome::NoUpdate;
        };

        self.evaluate(&mut state, release, now)
    }

    /// Look up the latest release, falling back once from the custom endpoint
    /// to the default one
    async fn lookup(&self) -> Result<Option<RemoteRelease>, FetchError> {
        let endpoint = self.config.first_endpoint();

        match self.fetch(&endpoint).await {
            Err(e) if endpoint.is_custom() => {
                warn!(
                    "Custom endpoint {} failed ({}); retrying default lookup",
                    endpoint.url(),
                    e
                );
                self.fetch(&self.config.default_endpoint()).await
            }
            result => result,
        }
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Result<Option<RemoteRelease>, FetchError> {
        let release = self.source.fetch_release(endpoint).await?;

        match release {
            Some(release) if release.version.is_none() && release.mandatory_version.is_none() => {
                Err(FetchError::Format("lookup result has no version".to_string()))
            }
            release => Ok(release),
        }
    }

    fn evaluate(
        &self,
        state: &mut CheckState,
        release: RemoteRelease,
        now: DateTime<Utc>,
    ) -> RunOutcome {
        if let Some(mandatory) = release.mandatory_version {
            if compare(&self.installed, &SemanticVersion::parse(&mandatory)).is_newer() {
                info!(
                    "Installed {} is below mandatory version {}",
                    self.installed, mandatory
                );
                state.mark_prompted(self.store.as_ref(), now);
                return RunOutcome::Decided(show(AlertStrength::Force, mandatory));
            }
            debug!("Mandatory version {} already satisfied", mandatory);
        }

        let Some(version) = release.version else {
            warn!("Lookup result has a mandatory version but no version");
            return RunOutcome::FetchFailed(FetchError::Format(
                "lookup result has no version".to_string(),
            ));
        };

        let delta = compare(&self.installed, &SemanticVersion::parse(&version));
        let Some(fragment) = delta.fragment() else {
            debug!("Remote {} is not newer than {} ({:?})", version, self.installed, delta);
            return RunOutcome::Decided(AlertDecision::Suppressed(SuppressReason::BelowThreshold));
        };

        if let Some(released_at) = release.released_at {
            if days_elapsed(released_at, now) < self.config.release_delay_days {
                info!("Version {} released at {} is too recent", version, released_at);
                return RunOutcome::Decided(AlertDecision::Suppressed(
                    SuppressReason::ReleaseTooRecent,
                ));
            }
        }

        let strength = resolve_strength(fragment, &self.policy);
        info!(
            "Version {} is a {} update; alert strength {}",
            version,
            fragment,
            strength.as_str()
        );

        if strength == AlertStrength::Silent {
            return RunOutcome::Decided(AlertDecision::SilentNotify {
                message_key: MessageKey::UpdateAvailableMessage,
                version,
            });
        }

        if is_skipped(&version, state.skipped_version.as_deref()) {
            info!("Version {} was skipped by the user", version);
            return RunOutcome::Decided(AlertDecision::Suppressed(SuppressReason::UserSkipped));
        }

        if !is_due(state.last_prompt, resolve_frequency(fragment, &self.policy), now) {
            debug!("Prompt throttled: last prompt at {:?}", state.last_prompt);
            return RunOutcome::Decided(AlertDecision::Suppressed(SuppressReason::Throttled));
        }

        state.mark_prompted(self.store.as_ref(), now);
        RunOutcome::Decided(show(strength, version))
    }

    /// Record the user's response to a shown prompt for `version`
    pub async fn report(&self, action: UserAction, version: &str) {
        let mut state = self.state.lock().await;

        match action {
            UserAction::Skipped => record_skip(&mut state, self.store.as_ref(), version),
            UserAction::Updated => info!("User chose to update to {}", version),
            UserAction::Deferred => info!("User deferred update to {}", version),
        }
    }

    /// Localized texts for `decision`
    pub fn prompt(&self, decision: &AlertDecision, host_locale: Option<&str>) -> Option<Prompt> {
        decision.render(
            self.localizer.as_ref(),
            self.config.locale(host_locale),
            self.config.app_name(),
        )
    }
}

fn show(strength: AlertStrength, version: String) -> AlertDecision {
    AlertDecision::Show {
        strength,
        message_key: MessageKey::UpdateAvailableMessage,
        version,
    }
}
