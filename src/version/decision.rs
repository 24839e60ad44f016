//! Values handed to and received from the presentation layer

use crate::version::localize::{Localizer, MessageKey, fill_template};
use crate::version::policy::AlertStrength;

/// Why a run ended without prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Prompted too recently for the fragment's frequency
    Throttled,
    /// The user asked to skip this exact version
    UserSkipped,
    /// Remote version is not newer than the installed one
    BelowThreshold,
    /// Release is younger than the configured delay
    ReleaseTooRecent,
}

impl SuppressReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuppressReason::Throttled => "throttled",
            SuppressReason::UserSkipped => "user_skipped",
            SuppressReason::BelowThreshold => "below_threshold",
            SuppressReason::ReleaseTooRecent => "release_too_recent",
        }
    }
}

/// Final decision of one check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDecision {
    Show {
        strength: AlertStrength,
        message_key: MessageKey,
        version: String,
    },
    /// Hand the message to the host without showing UI
    SilentNotify {
        message_key: MessageKey,
        version: String,
    },
    Suppressed(SuppressReason),
}

impl AlertDecision {
    /// Remote version this decision is about, if any
    pub fn version(&self) -> Option<&str> {
        match self {
            AlertDecision::Show { version, .. } | AlertDecision::SilentNotify { version, .. } => {
                Some(version)
            }
            AlertDecision::Suppressed(_) => None,
        }
    }

    /// Localized texts for the presentation layer.
    ///
    /// `None` for suppressed decisions. Silent notifications carry a message
    /// but no actions.
    pub fn render(
        &self,
        localizer: &dyn Localizer,
        locale: Option<&str>,
        app_name: &str,
    ) -> Option<Prompt> {
        let (strength, message_key, version) = match self {
            AlertDecision::Show {
                strength,
                message_key,
                version,
            } => (*strength, *message_key, version),
            AlertDecision::SilentNotify {
                message_key,
                version,
            } => (AlertStrength::Silent, *message_key, version),
            AlertDecision::Suppressed(_) => return None,
        };

        let text = |key: MessageKey| fill_template(&localizer.text(key, locale), app_name, version);

        Some(Prompt {
            title: text(MessageKey::UpdateAvailableTitle),
            message: text(message_key),
            actions: strength
                .actions()
                .iter()
                .map(|action| (*action, text(action.message_key())))
                .collect(),
        })
    }
}

/// Button the presentation layer may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionLabel {
    Update,
    NextTime,
    Skip,
}

impl ActionLabel {
    pub fn message_key(&self) -> MessageKey {
        match self {
            ActionLabel::Update => MessageKey::UpdateButton,
            ActionLabel::NextTime => MessageKey::NextTimeButton,
            ActionLabel::Skip => MessageKey::SkipButton,
        }
    }

    /// What the host reports back when the user presses this button
    pub fn user_action(&self) -> UserAction {
        match self {
            ActionLabel::Update => UserAction::Updated,
            ActionLabel::NextTime => UserAction::Deferred,
            ActionLabel::Skip => UserAction::Skipped,
        }
    }
}

/// Localized prompt ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub actions: Vec<(ActionLabel, String)>,
}

/// The user's response to a shown prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Updated,
    Deferred,
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::localize::BundledLocalizer;

    /// Echoes the requested locale so tests can see what was passed through
    struct LocaleEcho;

    impl Localizer for LocaleEcho {
        fn text(&self, _key: MessageKey, locale: Option<&str>) -> String {
            format!("{{app}} {{version}} {}", locale.unwrap_or("none"))
        }
    }

    fn show(strength: AlertStrength) -> AlertDecision {
        AlertDecision::Show {
            strength,
            message_key: MessageKey::UpdateAvailableMessage,
            version: "3.0.0.0".to_string(),
        }
    }

    #[test]
    fn render_show_fills_message_and_labels() {
        let prompt = show(AlertStrength::Skip)
            .render(&BundledLocalizer, None, "Notes")
            .unwrap();

        assert_eq!(prompt.title, "Update Available");
        assert!(prompt.message.contains("Notes"));
        assert!(prompt.message.contains("3.0.0.0"));
        assert_eq!(
            prompt.actions,
            vec![
                (ActionLabel::Update, "Update".to_string()),
                (ActionLabel::NextTime, "Next time".to_string()),
                (ActionLabel::Skip, "Skip this version".to_string()),
            ]
        );
    }

    #[test]
    fn render_force_offers_only_update() {
        let prompt = show(AlertStrength::Force)
            .render(&BundledLocalizer, Some("fr"), "Notes")
            .unwrap();

        assert_eq!(
            prompt.actions,
            vec![(ActionLabel::Update, "Mettre à jour".to_string())]
        );
    }

    #[test]
    fn render_passes_locale_to_localizer() {
        let decision = AlertDecision::SilentNotify {
            message_key: MessageKey::UpdateAvailableMessage,
            version: "1.1.0.0".to_string(),
        };
        let prompt = decision.render(&LocaleEcho, Some("ja"), "Notes").unwrap();

        assert_eq!(prompt.message, "Notes 1.1.0.0 ja");
        assert!(prompt.actions.is_empty());
    }

    #[test]
    fn render_suppressed_returns_none() {
        let decision = AlertDecision::Suppressed(SuppressReason::Throttled);
        assert!(decision.render(&BundledLocalizer, None, "Notes").is_none());
        assert_eq!(decision.version(), None);
    }

    #[test]
    fn action_labels_map_to_user_actions() {
        assert_eq!(ActionLabel::Skip.user_action(), UserAction::Skipped);
        assert_eq!(ActionLabel::NextTime.user_action(), UserAction::Deferred);
        assert_eq!(ActionLabel::Update.user_action(), UserAction::Updated);
    }
}
