//! Per-fragment alert policy: how strongly to prompt and how often

use serde::{Deserialize, Serialize};

use crate::version::decision::ActionLabel;
use crate::version::semver::Fragment;
use crate::version::throttle::CheckFrequency;

/// How insistent the upgrade prompt is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertStrength {
    /// Only "update" is offered
    Force,
    /// "update" or "next time"
    #[default]
    Option,
    /// "update", "next time" or "skip this version"
    Skip,
    /// No UI; the host is handed the message only
    Silent,
}

impl AlertStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStrength::Force => "force",
            AlertStrength::Option => "option",
            AlertStrength::Skip => "skip",
            AlertStrength::Silent => "silent",
        }
    }

    /// Buttons the presentation layer may show for this strength
    pub fn actions(&self) -> &'static [ActionLabel] {
        match self {
            AlertStrength::Force => &[ActionLabel::Update],
            AlertStrength::Option => &[ActionLabel::Update, ActionLabel::NextTime],
            AlertStrength::Skip => &[
                ActionLabel::Update,
                ActionLabel::NextTime,
                ActionLabel::Skip,
            ],
            AlertStrength::Silent => &[],
        }
    }
}

/// Strength and prompt frequency for one fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FragmentPolicy {
    pub alert_strength: AlertStrength,
    #[serde(rename = "checkFrequencyDays")]
    pub check_frequency: CheckFrequency,
}

impl FragmentPolicy {
    pub fn new(alert_strength: AlertStrength, check_frequency: CheckFrequency) -> Self {
        Self {
            alert_strength,
            check_frequency,
        }
    }
}

/// Resolved policy table, one entry per fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertPolicyConfig {
    pub major: FragmentPolicy,
    pub minor: FragmentPolicy,
    pub patch: FragmentPolicy,
    pub revision: FragmentPolicy,
}

impl AlertPolicyConfig {
    /// Same policy for every fragment
    pub fn uniform(policy: FragmentPolicy) -> Self {
        Self {
            major: policy,
            minor: policy,
            patch: policy,
            revision: policy,
        }
    }

    pub fn policy(&self, fragment: Fragment) -> &FragmentPolicy {
        match fragment {
            Fragment::Major => &self.major,
            Fragment::Minor => &self.minor,
            Fragment::Patch => &self.patch,
            Fragment::Revision => &self.revision,
        }
    }

    fn policy_mut(&mut self, fragment: Fragment) -> &mut FragmentPolicy {
        match fragment {
            Fragment::Major => &mut self.major,
            Fragment::Minor => &mut self.minor,
            Fragment::Patch => &mut self.patch,
            Fragment::Revision => &mut self.revision,
        }
    }

    /// Replace the policy of a single fragment
    pub fn with_fragment(mut self, fragment: Fragment, policy: FragmentPolicy) -> Self {
        *self.policy_mut(fragment) = policy;
        self
    }
}

/// User-facing policy settings as they appear in the configuration file.
///
/// `default` fans out to all four fragments; per-fragment entries are layered
/// on top of it by [`AlertPolicySettings::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertPolicySettings {
    pub default: Option<FragmentPolicy>,
    pub major: Option<FragmentPolicy>,
    pub minor: Option<FragmentPolicy>,
    pub patch: Option<FragmentPolicy>,
    pub revision: Option<FragmentPolicy>,
}

impl AlertPolicySettings {
    fn override_for(&self, fragment: Fragment) -> Option<FragmentPolicy> {
        match fragment {
            Fragment::Major => self.major,
            Fragment::Minor => self.minor,
            Fragment::Patch => self.patch,
            Fragment::Revision => self.revision,
        }
    }

    /// Merge into a complete table: built-in defaults, then `default`, then
    /// each per-fragment override.
    pub fn resolve(&self) -> AlertPolicyConfig {
        let base = AlertPolicyConfig::uniform(self.default.unwrap_or_default());
        Fragment::ALL.into_iter().fold(base, |config, fragment| {
            match self.override_for(fragment) {
                Some(policy) => config.with_fragment(fragment, policy),
                None => config,
            }
        })
    }
}

pub fn resolve_strength(fragment: Fragment, config: &AlertPolicyConfig) -> AlertStrength {
    config.policy(fragment).alert_strength
}

pub fn resolve_frequency(fragment: Fragment, config: &AlertPolicyConfig) -> CheckFrequency {
    config.policy(fragment).check_frequency
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(AlertStrength::Force, vec![ActionLabel::Update])]
    #[case(AlertStrength::Option, vec![ActionLabel::Update, ActionLabel::NextTime])]
    #[case(AlertStrength::Skip, vec![ActionLabel::Update, ActionLabel::NextTime, ActionLabel::Skip])]
    #[case(AlertStrength::Silent, vec![])]
    fn actions_are_gated_by_strength(
        #[case] strength: AlertStrength,
        #[case] expected: Vec<ActionLabel>,
    ) {
        assert_eq!(strength.actions(), expected.as_slice());
    }

    #[test]
    fn resolve_without_settings_uses_builtin_defaults() {
        let config = AlertPolicySettings::default().resolve();

        for fragment in Fragment::ALL {
            assert_eq!(resolve_strength(fragment, &config), AlertStrength::Option);
            assert_eq!(resolve_frequency(fragment, &config), CheckFrequency::Days(1));
        }
    }

    #[test]
    fn resolve_applies_overrides_after_global_default() {
        let settings = AlertPolicySettings {
            default: Some(FragmentPolicy::new(AlertStrength::Skip, CheckFrequency::Days(7))),
            major: Some(FragmentPolicy::new(AlertStrength::Force, CheckFrequency::EveryTime)),
            revision: Some(FragmentPolicy::new(AlertStrength::Silent, CheckFrequency::Days(30))),
            ..Default::default()
        };

        let config = settings.resolve();

        assert_eq!(resolve_strength(Fragment::Major, &config), AlertStrength::Force);
        assert_eq!(resolve_frequency(Fragment::Major, &config), CheckFrequency::EveryTime);
        assert_eq!(resolve_strength(Fragment::Minor, &config), AlertStrength::Skip);
        assert_eq!(resolve_frequency(Fragment::Patch, &config), CheckFrequency::Days(7));
        assert_eq!(resolve_strength(Fragment::Revision, &config), AlertStrength::Silent);
        assert_eq!(resolve_frequency(Fragment::Revision, &config), CheckFrequency::Days(30));
    }

    #[test]
    fn settings_deserialize_from_camel_case_object() {
        let settings = serde_json::from_value::<AlertPolicySettings>(json!({
            "default": { "alertStrength": "skip", "checkFrequencyDays": 3 },
            "minor": { "alertStrength": "force" }
        }))
        .unwrap();

        assert_eq!(
            settings,
            AlertPolicySettings {
                default: Some(FragmentPolicy::new(AlertStrength::Skip, CheckFrequency::Days(3))),
                minor: Some(FragmentPolicy::new(AlertStrength::Force, CheckFrequency::Days(1))),
                ..Default::default()
            }
        );
    }
}
