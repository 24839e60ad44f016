//! Persisted check state: throttle clocks and the skipped version

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, warn};

use crate::version::store::KeyValueStore;

/// Keys under which [`CheckState`] fields are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    LastCheck,
    LastPrompt,
    SkippedVersion,
}

impl StateKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::LastCheck => "last_check_at",
            StateKey::LastPrompt => "last_prompt_at",
            StateKey::SkippedVersion => "skipped_version",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckState {
    /// When the remote lookup last succeeded
    pub last_check: Option<DateTime<Utc>>,
    /// When a prompt was last shown
    pub last_prompt: Option<DateTime<Utc>>,
    /// Version the user asked to skip; only ever overwritten
    pub skipped_version: Option<String>,
}

impl CheckState {
    /// Load state from `store`.
    ///
    /// Read failures and unparseable timestamps load as absent, which at worst
    /// makes the next check or prompt due early.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let read = |key: StateKey| {
            store
                .get(key.as_str())
                .inspect_err(|e| error!("Failed to read {}: {}", key.as_str(), e))
                .ok()
                .flatten()
        };

        Self {
            last_check: read(StateKey::LastCheck)
                .and_then(|v| parse_instant(StateKey::LastCheck, &v)),
            last_prompt: read(StateKey::LastPrompt)
                .and_then(|v| parse_instant(StateKey::LastPrompt, &v)),
            skipped_version: read(StateKey::SkippedVersion),
        }
    }

    /// Record a successful lookup and write it through
    pub fn mark_checked(&mut self, store: &dyn KeyValueStore, now: DateTime<Utc>) {
        self.last_check = Some(now);
        write(store, StateKey::LastCheck, &format_instant(now));
    }

    /// Record a shown prompt and write it through
    pub fn mark_prompted(&mut self, store: &dyn KeyValueStore, now: DateTime<Utc>) {
        self.last_prompt = Some(now);
        write(store, StateKey::LastPrompt, &format_instant(now));
    }

    pub(crate) fn set_skipped_version(&mut self, store: &dyn KeyValueStore, version: &str) {
        self.skipped_version = Some(version.to_string());
        write(store, StateKey::SkippedVersion, version);
    }
}

fn write(store: &dyn KeyValueStore, key: StateKey, value: &str) {
    let _ = store
        .set(key.as_str(), value)
        .inspect_err(|e| error!("Failed to persist {}: {}", key.as_str(), e));
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(key: StateKey, value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .inspect_err(|e| warn!("Ignoring unparseable {} {:?}: {}", key.as_str(), value, e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::error::StoreError;
    use crate::version::store::{MemoryStore, MockKeyValueStore};
    use chrono::TimeZone;

    #[test]
    fn load_from_empty_store_is_default() {
        let store = MemoryStore::new();
        assert_eq!(CheckState::load(&store), CheckState::default());
    }

    #[test]
    fn marks_are_written_through_and_reload() {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let mut state = CheckState::load(&store);
        state.mark_checked(&store, now);
        state.mark_prompted(&store, now);
        state.set_skipped_version(&store, "2.0.0.0");

        assert_eq!(CheckState::load(&store), state);
        assert_eq!(
            store.get("last_check_at").unwrap(),
            Some("2024-03-01T12:00:00.000Z".to_string())
        );
    }

    #[test]
    fn load_ignores_unparseable_timestamps() {
        let store = MemoryStore::new();
        store.set("last_check_at", "yesterday").unwrap();
        store.set("skipped_version", "1.2.3").unwrap();

        let state = CheckState::load(&store);

        assert_eq!(state.last_check, None);
        assert_eq!(state.skipped_version, Some("1.2.3".to_string()));
    }

    #[test]
    fn load_treats_read_errors_as_absent() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(StoreError::LockPoisoned));

        assert_eq!(CheckState::load(&store), CheckState::default());
    }

    #[test]
    fn write_failures_still_update_memory() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .times(1)
            .returning(|_, _| Err(StoreError::LockPoisoned));

        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut state = CheckState::default();
        state.mark_prompted(&store, now);

        assert_eq!(state.last_prompt, Some(now));
    }
}
