//! Time gating for the remote lookup and for prompts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How often a gated action may run.
///
/// Serialized as `0` for [`CheckFrequency::EveryTime`] and as the day count
/// otherwise, so configuration files can say `"checkFrequencyDays": 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckFrequency {
    EveryTime,
    Days(u32),
}

impl CheckFrequency {
    pub fn from_days(days: u32) -> Self {
        if days == 0 {
            CheckFrequency::EveryTime
        } else {
            CheckFrequency::Days(days)
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            CheckFrequency::EveryTime => 0,
            CheckFrequency::Days(days) => *days,
        }
    }
}

impl Default for CheckFrequency {
    fn default() -> Self {
        CheckFrequency::Days(crate::config::DEFAULT_CHECK_FREQUENCY_DAYS)
    }
}

impl Serialize for CheckFrequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.days())
    }
}

impl<'de> Deserialize<'de> for CheckFrequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(CheckFrequency::from_days)
    }
}

/// Whole days elapsed between `last` and `now`.
///
/// A clock that moved backwards yields `u32::MAX` so the caller treats the
/// action as overdue instead of blocked.
pub fn days_elapsed(last: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    if now < last {
        return u32::MAX;
    }
    u32::try_from(now.signed_duration_since(last).num_days()).unwrap_or(u32::MAX)
}

/// Whether an action last performed at `last` may run again at `now`
pub fn is_due(last: Option<DateTime<Utc>>, frequency: CheckFrequency, now: DateTime<Utc>) -> bool {
    let Some(last) = last else {
        return true;
    };

    match frequency {
        CheckFrequency::EveryTime => true,
        CheckFrequency::Days(days) => days_elapsed(last, now) >= days,
    }
}
