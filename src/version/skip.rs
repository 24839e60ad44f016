//! "Skip this version" marker

use tracing::info;

use crate::version::state::CheckState;
use crate::version::store::KeyValueStore;

/// Whether prompts for `remote_version` were skipped by the user.
///
/// Exact string match against the stored marker; "2.0" and "2.0.0.0" are
/// different versions here.
pub fn is_skipped(remote_version: &str, stored: Option<&str>) -> bool {
    stored == Some(remote_version)
}

/// Replace the skipped version; no history is kept
pub fn record_skip(state: &mut CheckState, store: &dyn KeyValueStore, version: &str) {
    info!("User skipped version {}", version);
    state.set_skipped_version(store, version);
}
