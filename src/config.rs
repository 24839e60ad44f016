use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::version::error::ConfigError;
use crate::version::policy::{AlertPolicyConfig, AlertPolicySettings};
use crate::version::registry::Endpoint;

// =============================================================================
// Constants
// =============================================================================

/// Public store lookup used when no custom endpoint is configured or it fails
pub const DEFAULT_LOOKUP_URL: &str = "https://itunes.apple.com/lookup";

/// Timeout for lookup requests in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Default minimum interval between checks and between prompts
pub const DEFAULT_CHECK_FREQUENCY_DAYS: u32 = 1;

/// Default days a release must be public before anyone is prompted
pub const DEFAULT_RELEASE_DELAY_DAYS: u32 = 1;

/// Placeholder replaced by the app identifier in custom endpoint templates
pub const APP_ID_PLACEHOLDER: &str = "{app_id}";

/// Engine configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Store identifier of the app (bundle id); required
    pub app_identifier: String,
    /// Name substituted into messages; defaults to the identifier
    pub app_name: Option<String>,
    /// Two-letter store region appended to the default lookup
    pub region_code: Option<String>,
    /// Tried before the default lookup; `{app_id}` is substituted
    pub custom_endpoint_template: Option<String>,
    /// Overrides the host locale for display text
    pub forced_locale: Option<String>,
    pub alert_policy: AlertPolicySettings,
    pub release_delay_days: u32,
    pub debug_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_identifier: String::new(),
            app_name: None,
            region_code: None,
            custom_endpoint_template: None,
            forced_locale: None,
            alert_policy: AlertPolicySettings::default(),
            release_delay_days: DEFAULT_RELEASE_DELAY_DAYS,
            debug_logging: false,
        }
    }
}

impl EngineConfig {
    pub fn new(app_identifier: &str) -> Self {
        Self {
            app_identifier: app_identifier.to_string(),
            ..Default::default()
        }
    }

    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Invalid(format!("{}: {}", path.display(), e)))
    }

    /// Fail fast on settings the engine cannot run without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_identifier.trim().is_empty() {
            return Err(ConfigError::MissingAppIdentifier);
        }
        Ok(())
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(&self.app_identifier)
    }

    /// Locale for display text: forced locale wins over the host's
    pub fn locale<'a>(&'a self, host_locale: Option<&'a str>) -> Option<&'a str> {
        self.forced_locale.as_deref().or(host_locale)
    }

    pub fn policy(&self) -> AlertPolicyConfig {
        self.alert_policy.resolve()
    }

    pub fn custom_endpoint(&self) -> Option<Endpoint> {
        self.custom_endpoint_template.as_ref().map(|template| {
            Endpoint::Custom(template.replace(APP_ID_PLACEHOLDER, &self.app_identifier))
        })
    }

    pub fn default_endpoint(&self) -> Endpoint {
        let mut url = format!("{}?bundleId={}", DEFAULT_LOOKUP_URL, self.app_identifier);
        if let Some(region) = &self.region_code {
            url.push_str("&country=");
            url.push_str(region);
        }
        Endpoint::Default(url)
    }

    /// Endpoint of the first lookup attempt
    pub fn first_endpoint(&self) -> Endpoint {
        self.custom_endpoint()
            .unwrap_or_else(|| self.default_endpoint())
    }
}

/// Returns the path to the data directory for release-alert.
/// Uses $XDG_DATA_HOME/release-alert if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-alert,
/// or ./release-alert if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the state database file.
pub fn db_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the path to the log directory.
pub fn log_path() -> PathBuf {
    data_dir().join("logs")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-alert")
}

fn log_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// Install the global subscriber writing to a daily rolling file.
///
/// `RUST_LOG` takes precedence over `debug`. Keep the returned guard alive
/// for as long as logs should be flushed.
pub fn init_logging(log_dir: &Path, debug: bool) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::daily(log_dir, "release-alert.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Ignore failures from a subscriber already being installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(debug))
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    Ok(guard)
}
